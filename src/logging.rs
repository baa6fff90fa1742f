pub fn setup_logging() {
    let mut builder = env_logger::Builder::new();

    // Interactive output shares the terminal; keep logs quiet by default.
    builder.filter(None, log::LevelFilter::Warn);

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        builder.parse_filters(&rust_log);
    }

    builder.init();
}
