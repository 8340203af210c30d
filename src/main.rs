//! Flappy Human headless runner
//!
//! Plays one run on autopilot with a simulated 60 Hz frame clock and prints
//! the run summary as JSON.
//!
//! Usage: `flappy-human [run-config.json] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use flappy_human::audio::LogSink;
    use flappy_human::{FrameInput, Game, RunConfig, Settings};

    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    env_logger::init();
    log::info!("Flappy Human (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RunConfig::load(Path::new(&path)).unwrap_or_else(|e| {
            log::error!("Run config {path}: {e}; using defaults");
            RunConfig::default()
        }),
        None => RunConfig::default(),
    };
    let settings = match args.next() {
        Some(path) => Settings::load(Path::new(&path)).unwrap_or_else(|e| {
            log::error!("Settings {path}: {e}; using defaults");
            Settings::default()
        }),
        None => Settings::default(),
    };

    log::info!(
        "Difficulty {}, character {} ({:?}), seed {}",
        config.difficulty.as_str(),
        config.character.name,
        config.character.ability,
        config.seed
    );

    let mut game = match Game::new(config, settings, Box::new(LogSink), 0.0) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Cannot start run: {e}");
            std::process::exit(1);
        }
    };

    for frame in 1..=MAX_FRAMES {
        let out = game.frame(&FrameInput {
            timestamp_ms: frame as f64 * FRAME_MS,
            autopilot: true,
            ..Default::default()
        });
        if let Some(summary) = out.terminal {
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to encode summary: {e}"),
            }
            return;
        }
        if frame % 600 == 0 {
            log::info!(
                "t={}s score {} coins {} fps {:?}",
                frame / 60,
                out.score,
                out.coins,
                out.fps
            );
        }
    }

    log::info!("Autopilot survived the whole session, score {}", game.world().score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host page; there is no standalone entry point
}
