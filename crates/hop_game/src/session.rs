//! One play-through of a level.
//!
//! The session owns everything that changes while a level runs: the body, the
//! remaining collectibles, the camera and the frame clock. Collaborators are
//! handed in at `init` and handed back at `teardown`; nothing is looked up
//! from global state.
//!
//! Each tick runs in a fixed order:
//!
//!   1. input       -- horizontal intent and jump
//!   2. physics     -- gravity and integration
//!   3. bounds      -- keep the box inside the level, floor at y = 0
//!   4. tiles       -- push out of occupied cells, land on floors
//!   5. pickups     -- remove overlapped collectibles
//!   6. camera      -- horizontal follow
//!
//! Bounds run before tiles so the resolver only ever sees in-level boxes.

use std::sync::Arc;

use glam::Vec2;
use hop_core::body::validate_body_config;
use hop_core::{
    resolve_tile_collisions, Body, BodyInput, Camera2D, Collectible, CollectibleId,
    CollectibleSet, CollisionReport, FrameClock, Rect, TileGrid, TileLayer, TimeState,
};

use crate::config::{validate_config, GameConfig};
use crate::level::Level;
use crate::sinks::{AudioSink, RenderSink, SoundCue};

#[allow(dead_code)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub jumped: bool,
    pub landed: bool,
    pub collision: CollisionReport,
    pub collected: Vec<CollectibleId>,
    pub camera_moved: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub ticks: u64,
    pub jumps: u64,
    pub landings: u64,
    pub collected: u64,
}

/// What `teardown` hands back.
pub struct SessionEnd<A, R> {
    pub level_id: String,
    pub stats: SessionStats,
    pub remaining_collectibles: usize,
    pub audio: A,
    pub render: R,
}

pub struct GameSession<C: FrameClock, A: AudioSink, R: RenderSink> {
    level_id: String,
    grid: TileGrid,
    level_width: f32,
    body: Body,
    collectibles: CollectibleSet,
    camera: Camera2D,
    time: TimeState,
    config: GameConfig,
    player_texture: Arc<str>,
    clock: C,
    audio: A,
    render: R,
    stats: SessionStats,
}

impl<C: FrameClock, A: AudioSink, R: RenderSink> GameSession<C, A, R> {
    pub fn init(
        level: Level,
        config: GameConfig,
        clock: C,
        mut audio: A,
        render: R,
    ) -> Result<Self, String> {
        validate_config(&config)?;
        validate_body_config(&config.body, level.grid.cell_size())
            .map_err(|e| format!("Level '{}': {e}", level.level_id))?;

        // Without an authored spawn the body drops in from mid-screen.
        let spawn = level
            .spawn
            .map(|p| Vec2::new(p.x, p.y))
            .unwrap_or(Vec2::new(0.0, config.world_height / 2.0));
        let body = Body::new(spawn, config.body);

        let collectible_texture: Arc<str> = Arc::from(config.collectible_texture.as_str());
        let mut collectibles = CollectibleSet::new();
        for placement in &level.collectibles {
            collectibles.insert(Collectible::new(
                Rect::new(
                    placement.x,
                    placement.y,
                    config.collectible_width,
                    config.collectible_height,
                ),
                collectible_texture.clone(),
            ));
        }

        audio.play_music(&config.theme_track, true);

        let level_width = level.grid.level_width();
        log::info!(
            "Session started: level '{}', {} collectibles, spawn ({:.1}, {:.1})",
            level.level_id,
            collectibles.len(),
            spawn.x,
            spawn.y
        );

        Ok(Self {
            level_id: level.level_id,
            grid: level.grid,
            level_width,
            body,
            collectibles,
            camera: Camera2D::new(config.world_width, config.world_height),
            time: TimeState::new(),
            player_texture: Arc::from(config.player_texture.as_str()),
            config,
            clock,
            audio,
            render,
            stats: SessionStats::default(),
        })
    }

    /// Advances the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f32, input: BodyInput) -> TickReport {
        debug_assert!(dt >= 0.0, "tick dt must be >= 0, got {dt}");
        self.stats.ticks += 1;

        let jumped = self.body.apply_input(input);
        if jumped {
            self.stats.jumps += 1;
            self.audio.play_sound(SoundCue::Jump);
        }
        let grounded_before = self.body.is_grounded();

        self.body.update(dt);
        self.body.clamp_to_level(self.level_width);
        let collision = resolve_tile_collisions(&mut self.body, &self.grid);

        // Landing sound only on the airborne -> grounded transition; a body
        // resting on a floor re-lands every tick.
        let landed = self.body.is_grounded() && !grounded_before;
        if landed {
            self.stats.landings += 1;
            self.audio.play_sound(SoundCue::Land);
            log::debug!(
                "Landed at ({:.1}, {:.1})",
                self.body.position.x,
                self.body.position.y
            );
        }

        let mut collected = Vec::new();
        for (id, collectible) in self
            .collectibles
            .collect_overlapping(&self.body.collision_rect())
        {
            self.audio.play_sound(SoundCue::Collect);
            log::debug!(
                "Collected {:?} at ({:.1}, {:.1}), {} left",
                id,
                collectible.rect.x,
                collectible.rect.y,
                self.collectibles.len()
            );
            collected.push(id);
        }
        self.stats.collected += collected.len() as u64;
        if !collected.is_empty() && self.collectibles.is_empty() {
            log::info!("All collectibles picked up in level '{}'", self.level_id);
        }

        let camera_moved = self.camera.follow_x(self.body.position.x, self.level_width);

        TickReport {
            jumped,
            landed,
            collision,
            collected,
            camera_moved,
        }
    }

    /// One rendered frame: reads the clock, ticks, then draws.
    pub fn frame(&mut self, input: BodyInput) -> TickReport {
        let dt = self.time.begin_tick(self.clock.elapsed());
        let report = self.tick(dt, input);
        self.draw();
        report
    }

    /// Submits the tile layer, on-screen collectibles and the body.
    pub fn draw(&mut self) {
        let view = self.camera.view_rect();
        self.render.begin_frame(&self.camera);
        self.render.draw_tiles(&self.camera);
        for (_, collectible) in self.collectibles.iter() {
            if collectible.rect.overlaps(&view) {
                self.render.draw_sprite(&collectible.texture_key, collectible.rect);
            }
        }
        let body_rect = self.body.collision_rect();
        self.render.draw_sprite(&self.player_texture, body_rect);
        if self.config.show_collision_debug {
            self.render.draw_debug_rect(body_rect);
        }
        self.render.end_frame();
    }

    pub fn teardown(mut self) -> SessionEnd<A, R> {
        self.audio.stop_music();
        log::info!(
            "Session ended: level '{}', {} ticks ({:.2}s), {} jumps, {} collected, {} left",
            self.level_id,
            self.stats.ticks,
            self.time.total_time,
            self.stats.jumps,
            self.stats.collected,
            self.collectibles.len()
        );
        SessionEnd {
            level_id: self.level_id,
            stats: self.stats,
            remaining_collectibles: self.collectibles.len(),
            audio: self.audio,
            render: self.render,
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    #[allow(dead_code)]
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    #[allow(dead_code)]
    pub fn collectibles(&self) -> &CollectibleSet {
        &self.collectibles
    }

    #[allow(dead_code)]
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn time(&self) -> &TimeState {
        &self.time
    }

    #[allow(dead_code)]
    pub fn level_width(&self) -> f32 {
        self.level_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{LevelFile, Placement};
    use crate::sinks::recording::{AudioEvent, DrawCommand, RecordingAudio, RecordingRender};
    use hop_core::{FixedClock, GridCell, TileLayerFile};

    type TestSession = GameSession<FixedClock, RecordingAudio, RecordingRender>;

    fn level_with(tiles: Vec<GridCell>, collectibles: Vec<Placement>, spawn: Placement) -> Level {
        Level::from_file(LevelFile {
            version: "0.1".to_string(),
            level_id: "test".to_string(),
            tile_layer: TileLayerFile {
                tile_size: 16,
                width: 100,
                height: 30,
                tiles,
            },
            collectibles,
            spawn: Some(spawn),
        })
        .expect("test level should be valid")
    }

    fn floor() -> Vec<GridCell> {
        (0..100).map(|x| GridCell { x, y: 0 }).collect()
    }

    fn start(level: Level, config: GameConfig) -> TestSession {
        GameSession::init(
            level,
            config,
            FixedClock::new(1.0 / 60.0),
            RecordingAudio::default(),
            RecordingRender::default(),
        )
        .expect("session should start")
    }

    fn idle() -> BodyInput {
        BodyInput::default()
    }

    #[test]
    fn falling_body_lands_on_tile_top() {
        let level = level_with(
            vec![GridCell { x: 6, y: 0 }],
            Vec::new(),
            Placement { x: 100.0, y: 17.0 },
        );
        let mut session = start(level, GameConfig::default());
        session.body_mut().velocity = Vec2::new(0.0, -50.0);

        let report = session.tick(0.1, idle());
        assert!(report.landed);
        assert_eq!(session.body().position.y, 16.0);
        assert_eq!(session.body().velocity.y, 0.0);
        assert!(session.body().is_grounded());
    }

    #[test]
    fn falling_into_a_raised_tile_lifts_to_the_overlap_top() {
        let level = level_with(
            vec![GridCell { x: 6, y: 1 }],
            Vec::new(),
            Placement { x: 100.0, y: 17.0 },
        );
        let mut session = start(level, GameConfig::default());
        session.body_mut().velocity = Vec2::new(0.0, -50.0);

        // The box drops to y = 6 and its top cuts 6 units into the tile.
        let report = session.tick(0.1, idle());
        assert!(report.landed);
        assert!((session.body().position.y - 22.0).abs() < 0.001);
        assert_eq!(session.body().velocity.y, 0.0);
    }

    #[test]
    fn bounds_clamp_applies_within_one_tick() {
        let level = level_with(Vec::new(), Vec::new(), Placement { x: -4.0, y: 50.0 });
        let mut session = start(level, GameConfig::default());
        session.tick(1.0 / 60.0, idle());
        assert_eq!(session.body().position.x, 0.0);

        let level = level_with(Vec::new(), Vec::new(), Placement { x: 1590.0, y: 50.0 });
        let mut session = start(level, GameConfig::default());
        session.tick(1.0 / 60.0, idle());
        let body = session.body();
        assert_eq!(body.position.x + body.width(), session.level_width());

        let level = level_with(Vec::new(), Vec::new(), Placement { x: 40.0, y: -2.0 });
        let mut session = start(level, GameConfig::default());
        session.tick(1.0 / 60.0, idle());
        assert_eq!(session.body().position.y, 0.0);
        assert!(session.body().is_grounded());
    }

    #[test]
    fn collecting_plays_one_sound_and_removes_the_pickup() {
        let config = GameConfig {
            collectible_width: 8.0,
            collectible_height: 8.0,
            ..GameConfig::default()
        };
        let level = level_with(
            floor(),
            vec![Placement { x: 12.0, y: 20.0 }, Placement { x: 32.0, y: 16.0 }],
            Placement { x: 10.0, y: 16.0 },
        );
        let mut session = start(level, config);

        let report = session.tick(1.0 / 60.0, idle());
        assert_eq!(report.collected, vec![CollectibleId(0)]);
        assert_eq!(session.collectibles().len(), 1);
        assert!(!session.collectibles().contains(CollectibleId(0)));

        // Standing still keeps touching nothing else.
        for _ in 0..10 {
            assert!(session.tick(1.0 / 60.0, idle()).collected.is_empty());
        }
        let end = session.teardown();
        assert_eq!(end.audio.count(SoundCue::Collect), 1);
        assert_eq!(end.stats.collected, 1);
        assert_eq!(end.remaining_collectibles, 1);
    }

    #[test]
    fn resting_on_floor_lands_once() {
        let level = level_with(floor(), Vec::new(), Placement { x: 40.0, y: 40.0 });
        let mut session = start(level, GameConfig::default());
        for _ in 0..120 {
            session.tick(1.0 / 60.0, idle());
        }
        assert_eq!(session.body().position.y, 16.0);
        let end = session.teardown();
        assert_eq!(end.audio.count(SoundCue::Land), 1);
        assert_eq!(end.stats.landings, 1);
    }

    #[test]
    fn jump_plays_sound_and_lands_again() {
        let level = level_with(floor(), Vec::new(), Placement { x: 40.0, y: 16.0 });
        let mut session = start(level, GameConfig::default());
        session.tick(1.0 / 60.0, idle());
        assert!(session.body().is_grounded());

        let report = session.tick(
            1.0 / 60.0,
            BodyInput {
                move_x: 0.0,
                jump_pressed: true,
            },
        );
        assert!(report.jumped);
        assert!(session.body().position.y > 16.0);

        for _ in 0..120 {
            session.tick(1.0 / 60.0, idle());
        }
        assert!(session.body().is_grounded());
        assert_eq!(session.body().position.y, 16.0);

        let end = session.teardown();
        assert_eq!(end.audio.count(SoundCue::Jump), 1);
        assert_eq!(end.audio.count(SoundCue::Land), 2);
    }

    #[test]
    fn jumping_into_a_ceiling_tile_ends_on_top_of_it() {
        let mut tiles = floor();
        tiles.push(GridCell { x: 3, y: 3 });
        let level = level_with(tiles, Vec::new(), Placement { x: 48.0, y: 16.0 });
        let mut session = start(level, GameConfig::default());
        session.tick(1.0 / 60.0, idle());
        assert!(session.body().is_grounded());

        let jump = BodyInput {
            move_x: 0.0,
            jump_pressed: true,
        };
        assert!(session.tick(1.0 / 60.0, jump).jumped);
        for _ in 0..10 {
            session.tick(1.0 / 60.0, idle());
        }

        // Head hits are wide, flat overlaps, so they resolve upward.
        let body = session.body();
        assert_eq!(body.position, Vec2::new(48.0, 64.0));
        assert_eq!(body.velocity.y, 0.0);
        assert!(body.is_grounded());

        let end = session.teardown();
        assert_eq!(end.audio.count(SoundCue::Jump), 1);
        assert_eq!(end.audio.count(SoundCue::Land), 2);
        assert_eq!(end.stats.landings, 2);
    }

    #[test]
    fn walking_into_a_wall_stops_at_its_face() {
        let mut tiles = floor();
        tiles.push(GridCell { x: 10, y: 1 });
        tiles.push(GridCell { x: 10, y: 2 });
        let level = level_with(tiles, Vec::new(), Placement { x: 100.0, y: 16.0 });
        let mut session = start(level, GameConfig::default());

        let right = BodyInput {
            move_x: 1.0,
            jump_pressed: false,
        };
        for _ in 0..120 {
            session.tick(1.0 / 60.0, right);
        }
        let body = session.body();
        assert_eq!(body.position.x + body.width(), 160.0);
        assert_eq!(body.position.y, 16.0);
    }

    #[test]
    fn camera_follows_only_inside_the_band() {
        let level = level_with(floor(), Vec::new(), Placement { x: 0.0, y: 16.0 });
        let mut session = start(level, GameConfig::default());
        let right = BodyInput {
            move_x: 1.0,
            jump_pressed: false,
        };

        session.tick(1.0 / 60.0, right);
        assert_eq!(session.camera().position.x, 320.0);

        session.body_mut().position.x = 400.0;
        let report = session.tick(1.0 / 60.0, right);
        assert!(report.camera_moved);
        assert_eq!(session.camera().position.x, session.body().position.x);
    }

    #[test]
    fn frame_draws_only_visible_collectibles() {
        let config = GameConfig {
            show_collision_debug: true,
            ..GameConfig::default()
        };
        let level = level_with(
            floor(),
            vec![Placement { x: 200.0, y: 64.0 }, Placement { x: 1200.0, y: 64.0 }],
            Placement { x: 0.0, y: 16.0 },
        );
        let mut session = start(level, config);
        session.frame(idle());

        assert_eq!(session.time().tick_count, 1);
        let end = session.teardown();
        let commands = &end.render.commands;
        assert_eq!(commands.first(), Some(&DrawCommand::Begin));
        assert_eq!(commands.last(), Some(&DrawCommand::End));
        assert_eq!(end.render.sprites("acorn"), 1);
        assert_eq!(end.render.sprites("player"), 1);
        assert!(commands
            .iter()
            .any(|command| matches!(command, DrawCommand::DebugRect(_))));
    }

    #[test]
    fn init_starts_theme_and_teardown_stops_it() {
        let level = level_with(floor(), Vec::new(), Placement { x: 0.0, y: 16.0 });
        let session = start(level, GameConfig::default());
        let end = session.teardown();
        assert_eq!(
            end.audio.events,
            vec![
                AudioEvent::Music {
                    track: "theme".to_string(),
                    looping: true
                },
                AudioEvent::StopMusic
            ]
        );
        assert_eq!(end.level_id, "test");
    }

    #[test]
    fn missing_spawn_drops_from_mid_screen() {
        let mut level = level_with(floor(), Vec::new(), Placement { x: 0.0, y: 0.0 });
        level.spawn = None;
        let session = start(level, GameConfig::default());
        assert_eq!(session.body().position, Vec2::new(0.0, 240.0));
    }

    #[test]
    fn init_rejects_body_larger_than_a_cell() {
        let level = level_with(floor(), Vec::new(), Placement { x: 0.0, y: 16.0 });
        let mut config = GameConfig::default();
        config.body.height = 24.0;
        let err = GameSession::init(
            level,
            config,
            FixedClock::new(1.0 / 60.0),
            RecordingAudio::default(),
            RecordingRender::default(),
        )
        .err()
        .expect("oversized body should fail");
        assert!(err.contains("exceeds cell size"));
    }
}
