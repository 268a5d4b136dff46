fn main() {
    if let Err(err) = aoi_live_ui::app::run_live() {
        eprintln!("live feed startup failed: {err}");
        std::process::exit(1);
    }
}
