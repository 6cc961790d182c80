//! Hopper -- headless level runner.
//!
//! Loads a level, a session config and a replay script, then plays the script
//! through a `GameSession` one frame at a time, checking its checkpoints:
//!
//!   1. the frame clock reports elapsed time (fixed step, or wall time with
//!      `--realtime`)
//!   2. the session ticks: input, physics, bounds, tiles, pickups, camera
//!   3. the session draws into the render sink
//!
//! Audio and rendering go to logging sinks. Run with `RUST_LOG=debug` to see
//! landings and pickups, `RUST_LOG=trace` for every draw call.
//!
//! Usage: `hop_game [--level PATH] [--replay PATH] [--config PATH] [--realtime]`

mod config;
mod level;
mod replay;
mod session;
mod sinks;

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{load_config_from_path, GameConfig};
use hop_core::{FixedClock, FrameClock, SystemClock};
use level::{load_level_from_path, Level};
use replay::{load_replay_from_path, ReplayScript};
use session::{GameSession, SessionStats};
use sinks::{LogAudio, LogRender};

const LEVEL_PATH: &str = "assets/levels/meadow.json";
const REPLAY_PATH: &str = "assets/replays/meadow_run.json";
const CONFIG_PATH: &str = "assets/config/game.json";

#[derive(Debug, Clone, PartialEq)]
struct RunArgs {
    level_path: PathBuf,
    replay_path: PathBuf,
    config_path: PathBuf,
    realtime: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<RunArgs, String> {
    let mut parsed = RunArgs {
        level_path: PathBuf::from(LEVEL_PATH),
        replay_path: PathBuf::from(REPLAY_PATH),
        config_path: PathBuf::from(CONFIG_PATH),
        realtime: false,
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--level" => parsed.level_path = next_path(&mut args, "--level")?,
            "--replay" => parsed.replay_path = next_path(&mut args, "--replay")?,
            "--config" => parsed.config_path = next_path(&mut args, "--config")?,
            "--realtime" => parsed.realtime = true,
            other => return Err(format!("Unknown argument '{other}'")),
        }
    }
    Ok(parsed)
}

fn next_path(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<PathBuf, String> {
    args.next()
        .map(PathBuf::from)
        .ok_or_else(|| format!("Missing value for {flag}"))
}

/// A missing config file is not an error; the defaults are a playable setup.
fn load_config_or_default(path: &Path) -> Result<GameConfig, String> {
    if path.exists() {
        load_config_from_path(path)
    } else {
        log::warn!("Config '{}' not found, using defaults.", path.display());
        Ok(GameConfig::default())
    }
}

fn run_session<C: FrameClock>(
    clock: C,
    level: Level,
    config: GameConfig,
    script: &ReplayScript,
    pace: Option<Duration>,
) -> Result<SessionStats, String> {
    let mut session = GameSession::init(
        level,
        config,
        clock,
        LogAudio::default(),
        LogRender::default(),
    )?;

    replay::play(&mut session, script, pace)?;

    log::info!(
        "Final body position ({:.1}, {:.1}), grounded={}, smoothed {:.1} fps",
        session.body().position.x,
        session.body().position.y,
        session.body().is_grounded(),
        session.time().smoothed_fps
    );
    let end = session.teardown();
    log::info!(
        "Level '{}': {} frames drawn, {} sprites, {} sounds, {} collectibles left",
        end.level_id,
        end.render.frames,
        end.render.sprites_total,
        end.audio.sounds_played,
        end.remaining_collectibles
    );
    Ok(end.stats)
}

fn run(args: RunArgs) -> Result<SessionStats, String> {
    let config = load_config_or_default(&args.config_path)?;
    let level = load_level_from_path(&args.level_path)?;
    let script = load_replay_from_path(&args.replay_path)?;
    script.check_level(&level.level_id)?;

    if args.realtime {
        let pace = Duration::from_secs_f32(script.step_seconds);
        run_session(SystemClock::new(), level, config, &script, Some(pace))
    } else {
        let clock = FixedClock::new(script.step_seconds as f64);
        run_session(clock, level, config, &script, None)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Hopper starting...");

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(stats) => log::info!(
            "Done: {} ticks, {} jumps, {} landings, {} collected",
            stats.ticks,
            stats.jumps,
            stats.landings,
            stats.collected
        ),
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    }
}
