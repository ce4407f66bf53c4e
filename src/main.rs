//! Native demo binary
//!
//! Builds the scripted playfield, hands it to the director, and advances
//! at the fixed simulation timestep until the script exits. Pass a seed
//! as the first argument to reshuffle the level extras.

use trundle::consts::SIM_DT;
use trundle::playfield::Playfield;
use trundle::scene::Director;

/// Safety stop in case a scene never requests exit.
const MAX_FRAMES: u64 = 10_000;

fn main() {
    env_logger::init();
    log::info!("Trundle demo starting...");

    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(0xC0FFEE);
    log::info!("Level seed: {}", seed);

    let playfield = match Playfield::new(seed) {
        Ok(p) => p,
        Err(e) => {
            log::error!("Failed to build playfield: {}", e);
            std::process::exit(1);
        }
    };

    let mut director = Director::new();
    if let Err(e) = director.register("playfield", Box::new(playfield)) {
        log::error!("Scene registration failed: {}", e);
        std::process::exit(1);
    }
    director.request("playfield");

    let mut frames: u64 = 0;
    while !director.advance(SIM_DT) {
        frames += 1;
        if frames >= MAX_FRAMES {
            log::warn!("Frame cap reached without an exit request, stopping");
            break;
        }
    }
    log::info!("Demo finished after {} frames ({:.1}s simulated)", frames, frames as f32 * SIM_DT);
}
