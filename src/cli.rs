use crate::config::load_config;
use crate::ir::{DotPlotSpec, RowReversal};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::{parse_data_shorthand, parse_grid, parse_row_list, parse_spec};
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dotplot", version, about = "Render proportional dot plots to SVG or PNG")]
pub struct Args {
    /// Dot plot document (JSON or JSON5) or '-' for stdin
    #[arg(
        short = 'i',
        long = "input",
        conflicts_with = "data",
        required_unless_present = "data"
    )]
    pub input: Option<PathBuf>,

    /// Inline classes, e.g. "Yes=40:#2ca02c,No=60:#d62728"
    #[arg(short = 'd', long = "data")]
    pub data: Option<String>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Grid shape as ROWSxCOLS
    #[arg(short = 'g', long = "grid")]
    pub grid: Option<String>,

    /// Alternate the direction of every other row
    #[arg(long = "snake", conflicts_with = "reverse_rows")]
    pub snake: bool,

    /// Comma separated rows (0 = bottom) drawn right to left
    #[arg(long = "reverse-rows")]
    pub reverse_rows: Option<String>,

    #[arg(short = 't', long = "title")]
    pub title: Option<String>,

    #[arg(long = "caption")]
    pub caption: Option<String>,

    /// Draw a bracket and label next to each class
    #[arg(short = 'l', long = "labels")]
    pub labels: bool,

    /// Dot marker area in square points
    #[arg(long = "dot-size")]
    pub dot_size: Option<f32>,

    /// Write the computed layout as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let spec = apply_overrides(read_spec(&args)?, &args)?;

    let layout = compute_layout(&spec, &config.theme, &config.layout)?;
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout)?;
    }
    let svg = render_svg(&layout, &config.theme);

    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &config)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_spec(args: &Args) -> Result<DotPlotSpec> {
    if let Some(data) = &args.data {
        return Ok(parse_data_shorthand(data)?);
    }
    let input = read_input(args.input.as_deref())?;
    Ok(parse_spec(&input)?)
}

fn apply_overrides(mut spec: DotPlotSpec, args: &Args) -> Result<DotPlotSpec> {
    if let Some(grid) = &args.grid {
        spec.grid = parse_grid(grid)?;
    }
    if args.snake {
        spec.reversed_rows = RowReversal::Snake;
    } else if let Some(rows) = &args.reverse_rows {
        spec.reversed_rows = RowReversal::Rows(parse_row_list(rows)?);
    }
    if let Some(title) = &args.title {
        spec.title = Some(title.clone());
    }
    if let Some(caption) = &args.caption {
        spec.caption = Some(caption.clone());
    }
    if args.labels {
        spec.show_labels = true;
    }
    if let Some(dot_size) = args.dot_size {
        spec.dot_size = Some(dot_size);
    }
    Ok(spec)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    let path = path.ok_or_else(|| anyhow::anyhow!("Either --input or --data is required"))?;
    if path != Path::new("-") {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &crate::config::Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render, &config.layout)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &crate::config::Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_document() {
        let args = Args::parse_from([
            "dotplot",
            "-d",
            "A=50,B=50",
            "--grid",
            "5x20",
            "--reverse-rows",
            "1,2",
            "--labels",
            "--title",
            "Poll",
            "--dot-size",
            "300",
        ]);
        let spec = apply_overrides(read_spec(&args).unwrap(), &args).unwrap();
        assert_eq!(spec.grid.rows, 5);
        assert_eq!(spec.grid.cols, 20);
        assert_eq!(spec.reversed_rows, RowReversal::Rows([1, 2].into_iter().collect()));
        assert!(spec.show_labels);
        assert_eq!(spec.title.as_deref(), Some("Poll"));
        assert_eq!(spec.dot_size, Some(300.0));
    }

    #[test]
    fn snake_conflicts_with_explicit_rows() {
        let result =
            Args::try_parse_from(["dotplot", "-d", "A=1", "--snake", "--reverse-rows", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn input_or_data_is_required() {
        assert!(Args::try_parse_from(["dotplot"]).is_err());
        assert!(Args::try_parse_from(["dotplot", "-i", "-"]).is_ok());
        assert!(Args::try_parse_from(["dotplot", "-d", "A=1"]).is_ok());
        assert!(Args::try_parse_from(["dotplot", "-i", "x.json", "-d", "A=1"]).is_err());
    }

    #[test]
    fn png_needs_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        let path = PathBuf::from("out.png");
        assert_eq!(ensure_output(&Some(path.clone()), "png").unwrap(), path);
    }
}
