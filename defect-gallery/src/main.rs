fn main() {
    if let Err(err) = aoi_live_ui::app::run_gallery() {
        eprintln!("defect gallery startup failed: {err}");
        std::process::exit(1);
    }
}
