//! Scripted runs through a level.
//!
//! A script is a list of segments. Each segment holds one horizontal intent for
//! a number of ticks and may open with a jump. After a segment ends, its
//! optional checkpoint is compared against the session:
//!
//! ```json
//! {
//!   "level_id": "meadow",
//!   "step_seconds": 0.016666667,
//!   "segments": [
//!     { "ticks": 60, "expect": { "grounded": true } },
//!     { "move_x": 1.0, "ticks": 90, "jump": true,
//!       "expect": { "min_x": 150.0, "min_collected": 1 } }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use hop_core::{Body, BodyInput, FrameClock};
use serde::Deserialize;

use crate::session::{GameSession, SessionStats};
use crate::sinks::{AudioSink, RenderSink};

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayScript {
    /// Level the checkpoints were written against. Unset means any level.
    #[serde(default)]
    pub level_id: Option<String>,
    #[serde(default = "default_step_seconds")]
    pub step_seconds: f32,
    pub segments: Vec<ReplaySegment>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReplaySegment {
    #[serde(default)]
    pub move_x: f32,
    /// Jump is pressed on the first tick of the segment only.
    #[serde(default)]
    pub jump: bool,
    pub ticks: u32,
    #[serde(default)]
    pub expect: Option<Checkpoint>,
}

/// Conditions that must hold when a segment ends. Unset fields are not checked.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Checkpoint {
    pub grounded: Option<bool>,
    pub min_x: Option<f32>,
    pub max_x: Option<f32>,
    pub min_collected: Option<u64>,
}

impl ReplaySegment {
    pub fn input_at(&self, tick: u32) -> BodyInput {
        BodyInput {
            move_x: self.move_x,
            jump_pressed: self.jump && tick == 0,
        }
    }
}

impl Checkpoint {
    pub fn verify(&self, body: &Body, stats: &SessionStats) -> Result<(), String> {
        if let Some(grounded) = self.grounded {
            if body.is_grounded() != grounded {
                return Err(format!(
                    "expected grounded={grounded}, body at ({:.1}, {:.1}) has grounded={}",
                    body.position.x,
                    body.position.y,
                    body.is_grounded()
                ));
            }
        }
        if let Some(min_x) = self.min_x {
            if body.position.x < min_x {
                return Err(format!("expected x >= {min_x}, got {:.2}", body.position.x));
            }
        }
        if let Some(max_x) = self.max_x {
            if body.position.x > max_x {
                return Err(format!("expected x <= {max_x}, got {:.2}", body.position.x));
            }
        }
        if let Some(min_collected) = self.min_collected {
            if stats.collected < min_collected {
                return Err(format!(
                    "expected at least {min_collected} collected, got {}",
                    stats.collected
                ));
            }
        }
        Ok(())
    }
}

impl ReplayScript {
    pub fn total_ticks(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.ticks)).sum()
    }

    /// Fails when the script names a different level than the one loaded.
    pub fn check_level(&self, level_id: &str) -> Result<(), String> {
        match &self.level_id {
            Some(expected) if expected != level_id => Err(format!(
                "Replay was written for level '{expected}', but level '{level_id}' is loaded"
            )),
            _ => Ok(()),
        }
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplayScript, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let script: ReplayScript = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_script(&script)?;
    Ok(script)
}

fn validate_script(script: &ReplayScript) -> Result<(), String> {
    if !(script.step_seconds.is_finite() && script.step_seconds > 0.0) {
        return Err("Replay validation failed: step_seconds must be > 0".to_string());
    }
    if script.segments.is_empty() {
        return Err("Replay validation failed: no segments".to_string());
    }
    for (index, segment) in script.segments.iter().enumerate() {
        if segment.ticks == 0 {
            return Err(format!("Replay validation failed: segment {index} has 0 ticks"));
        }
        if !(-1.0..=1.0).contains(&segment.move_x) {
            return Err(format!(
                "Replay validation failed: segment {index} move_x {} is outside [-1, 1]",
                segment.move_x
            ));
        }
        if let Some(Checkpoint {
            min_x: Some(min_x),
            max_x: Some(max_x),
            ..
        }) = segment.expect
        {
            if min_x > max_x {
                return Err(format!(
                    "Replay validation failed: segment {index} has min_x > max_x"
                ));
            }
        }
    }
    Ok(())
}

/// Feeds every segment through `session.frame`.
///
/// With `pace` set the run follows wall time, so step sizes drift and a missed
/// checkpoint is only logged. Without it a missed checkpoint ends the run.
pub fn play<C: FrameClock, A: AudioSink, R: RenderSink>(
    session: &mut GameSession<C, A, R>,
    script: &ReplayScript,
    pace: Option<Duration>,
) -> Result<(), String> {
    for (index, segment) in script.segments.iter().enumerate() {
        for tick in 0..segment.ticks {
            session.frame(segment.input_at(tick));
            if let Some(pace) = pace {
                std::thread::sleep(pace);
            }
        }

        let Some(expect) = &segment.expect else {
            continue;
        };
        match expect.verify(session.body(), &session.stats()) {
            Ok(()) => log::debug!("Replay checkpoint {index} passed"),
            Err(err) if pace.is_some() => {
                log::warn!("Replay checkpoint {index} missed in realtime run: {err}")
            }
            Err(err) => return Err(format!("Replay checkpoint after segment {index}: {err}")),
        }
    }
    Ok(())
}

const fn default_step_seconds() -> f32 {
    1.0 / 60.0
}
