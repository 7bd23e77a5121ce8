#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Diagram Editor"),
        ..Default::default()
    };
    eframe::run_native(
        "eframe_diagram",
        native_options,
        Box::new(|cc| Ok(Box::new(eframe_diagram::DiagramApp::new(cc)))),
    )
}
