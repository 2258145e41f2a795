fn main() {
    if let Err(err) = dotplot_rs::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
