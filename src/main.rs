//! `sphere-swarm [OPTIONS.toml]`: open a window and render the swarm.

use std::path::Path;

use sphere_swarm::{Options, Viewer};

fn load_options() -> Result<Options, sphere_swarm::SwarmError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading options from {path}");
            Options::load(Path::new(&path))
        }
        None => Ok(Options::default()),
    }
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let options = match load_options() {
        Ok(options) => options,
        Err(e) => {
            log::error!("{e}");
            log::error!("Usage: sphere-swarm [OPTIONS.toml]");
            std::process::exit(1);
        }
    };

    if let Err(e) = Viewer::builder().with_options(options).build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
