//! Frame-stepped demo loop.
//!
//! This binary:
//! 1. Loads a frame script (first argument, `ZKIT_FRAMES`, or the built-in demo)
//! 2. Builds the demo level inside an event group
//! 3. Replays one frame per tick until the script ends or the hero quits
//!
//! Environment:
//! - `TARGET_FPS` - frame rate used to derive each tick's delta (default 60)
//! - `ZKIT_MAX_EVENTS_PER_TICK` - per-tick cap on queued events
//! - `RUST_LOG` - log filter

mod frames;
mod level;

use std::path::PathBuf;

use tracing::{debug, info, warn};
use zkit_event::{Event, EventGroup, GroupConfig};

fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("zkit_runner=info".parse()?)
                .add_directive("zkit_event=info".parse()?),
        )
        .init();

    let config = GroupConfig::from_env()?;

    let target_fps: f64 = std::env::var("TARGET_FPS")
        .ok()
        .and_then(|p| p.parse().ok())
        .filter(|fps: &f64| *fps > 0.0)
        .unwrap_or(60.0);
    let delta_ms = 1000.0 / target_fps;

    let script = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ZKIT_FRAMES").ok())
        .map(PathBuf::from);
    let frames = match &script {
        Some(path) => {
            info!("Frame script: {}", path.display());
            frames::load(path)?
        }
        None => {
            info!("No frame script given, running the demo");
            frames::demo()?
        }
    };

    info!(
        frames = frames.len(),
        target_fps,
        max_events_per_tick = config.max_events_per_tick.get(),
        "Starting event loop"
    );

    let mut group = EventGroup::with_config(config);
    let level = level::setup(&mut group);

    let mut ticks = 0usize;
    let mut drained = 0usize;
    for frame in &frames {
        group.publish(None, Event::new(level::TICK));

        let stats = group.update(frame, delta_ms)?;
        ticks += 1;
        drained += stats.drained;
        debug!(
            tick = stats.tick,
            external = stats.external,
            drained = stats.drained,
            evicted = stats.evicted,
            "tick done"
        );

        if !level.running(&group) {
            break;
        }
    }

    if level.running(&group) {
        warn!("Frame script ended without a quit");
    }
    if !group.contains(level.saucer) {
        info!("Saucer left the level");
    }
    info!(
        ticks,
        drained,
        members = group.len(),
        hero = ?group.get(level.hero),
        door = ?group.get(level.door),
        "Event loop finished"
    );

    Ok(())
}
