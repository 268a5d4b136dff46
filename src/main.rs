fn main() {
    if let Err(err) = aoi_live_ui::app::run() {
        eprintln!("application startup failed: {err}");
        std::process::exit(1);
    }
}
