//! Pan and zoom around a huge random tile map, drawn from a sprite atlas.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all)]
#![deny(clippy::correctness)]

mod config;
mod error;
mod grid;
mod gui;
mod input;
mod render;
mod session;

const TITLE: &str = "Tilemap Viewer";

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()
        .expect("Failed to initialize logger");

    let config = config::Config::from_env();
    log::info!("Zoom mode: {:?}", config.zoom_mode);
    if let Err(e) = gui::run(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
