//! Frame scripts: recorded input to replay through the loop.
//!
//! A script is a JSON array of frames, each frame an array of events:
//!
//! ```text
//! [
//!   [{"key": "KEYDOWN", "attributes": {"key": "K_RIGHT"}}],
//!   [],
//!   [{"key": "KEYDOWN", "attributes": {"key": "K_ESCAPE"}}]
//! ]
//! ```

use std::path::Path;

use eyre::WrapErr;
use zkit_event::Event;

/// Input events for one tick.
pub type Frame = Vec<Event>;

/// Script used when no path is given.
const DEMO: &str = include_str!("../frames/demo.json");

pub fn parse(json: &str) -> serde_json::Result<Vec<Frame>> {
    serde_json::from_str(json)
}

pub fn load(path: &Path) -> eyre::Result<Vec<Frame>> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading frame script {}", path.display()))?;
    parse(&json).wrap_err_with(|| format!("parsing frame script {}", path.display()))
}

pub fn demo() -> eyre::Result<Vec<Frame>> {
    Ok(parse(DEMO)?)
}
