use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dotplot_rs::config::LayoutConfig;
use dotplot_rs::ir::{DotPlotSpec, GridShape, RowReversal};
use dotplot_rs::layout::{allocate_dots, compute_layout};
use dotplot_rs::parser::parse_spec;
use dotplot_rs::render::render_svg;
use dotplot_rs::theme::Theme;
use std::hint::black_box;

const LARGE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/benches/fixtures/waffle_large.json5"
));

fn even_spec(classes: usize, rows: usize, cols: usize) -> DotPlotSpec {
    let share = 100.0 / classes as f64;
    DotPlotSpec::new((0..classes).map(|i| (format!("class {i}"), share)))
        .with_grid(rows, cols)
        .with_reversed_rows(RowReversal::Snake)
        .with_labels(true)
}

fn bench_config() -> LayoutConfig {
    LayoutConfig {
        fast_text_metrics: true,
        ..LayoutConfig::default()
    }
}

fn bench_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");
    for side in [10usize, 50, 200] {
        let grid = GridShape::new(side, side);
        let values = vec![12.5, 27.5, 20.0, 40.0];
        group.bench_with_input(BenchmarkId::from_parameter(side), &grid, |b, grid| {
            b.iter(|| black_box(allocate_dots(black_box(&values), *grid).map(|a| a.colored())));
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let theme = Theme::classic();
    let config = bench_config();
    let mut group = c.benchmark_group("layout");
    for (classes, side) in [(2usize, 10usize), (5, 20), (10, 50)] {
        let spec = even_spec(classes, side, side);
        group.bench_with_input(
            BenchmarkId::new(format!("{classes}_classes"), side),
            &spec,
            |b, spec| {
                b.iter(|| {
                    let layout = compute_layout(black_box(spec), &theme, &config).expect("layout");
                    black_box(layout.dots.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let theme = Theme::classic();
    let config = bench_config();
    c.bench_function("end_to_end/waffle_large", |b| {
        b.iter(|| {
            let spec = parse_spec(black_box(LARGE)).expect("parse failed");
            let layout = compute_layout(&spec, &theme, &config).expect("layout");
            let svg = render_svg(&layout, &theme);
            black_box(svg.len());
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_allocation, bench_layout, bench_end_to_end
);
criterion_main!(benches);
