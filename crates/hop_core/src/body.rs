use glam::Vec2;
use serde::Deserialize;

use crate::rect::Rect;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyInput {
    pub move_x: f32,
    pub jump_pressed: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    pub width: f32,
    pub height: f32,
    pub move_speed: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub jump_speed: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            width: 16.0,
            height: 16.0,
            move_speed: 120.0,
            gravity: -600.0,
            max_fall_speed: -480.0,
            jump_speed: 300.0,
        }
    }
}

/// Rejects tuning the resolver cannot handle. A box larger than one cell could
/// span more than 2x2 cells, which the cell enumeration does not cover.
pub fn validate_body_config(config: &BodyConfig, cell_size: f32) -> Result<(), String> {
    if !(config.width > 0.0 && config.height > 0.0) {
        return Err("Body validation failed: width and height must be > 0".to_string());
    }
    if config.width > cell_size || config.height > cell_size {
        return Err(format!(
            "Body validation failed: body {}x{} exceeds cell size {}",
            config.width, config.height, cell_size
        ));
    }
    if !(config.gravity < 0.0) {
        return Err("Body validation failed: gravity must be < 0".to_string());
    }
    if !(config.max_fall_speed < 0.0) {
        return Err("Body validation failed: max_fall_speed must be < 0".to_string());
    }
    if !(config.move_speed >= 0.0 && config.jump_speed >= 0.0) {
        return Err("Body validation failed: move_speed and jump_speed must be >= 0".to_string());
    }
    Ok(())
}

/// The player-controlled box. Position is the bottom-left corner.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
    pub config: BodyConfig,
}

impl Body {
    pub fn new(position: Vec2, config: BodyConfig) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            grounded: false,
            config,
        }
    }

    pub fn width(&self) -> f32 {
        self.config.width
    }

    pub fn height(&self) -> f32 {
        self.config.height
    }

    pub fn collision_rect(&self) -> Rect {
        Rect::from_position(self.position, self.config.width, self.config.height)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    /// Turns intent into velocity. Returns true when a jump started this call.
    pub fn apply_input(&mut self, input: BodyInput) -> bool {
        self.velocity.x = input.move_x.clamp(-1.0, 1.0) * self.config.move_speed;

        // Jumping is only legal off the ground.
        if input.jump_pressed && self.grounded {
            self.velocity.y = self.config.jump_speed;
            self.grounded = false;
            return true;
        }
        false
    }

    /// Semi-implicit Euler step: velocity first, then position.
    pub fn update(&mut self, dt: f32) {
        self.velocity.y =
            (self.velocity.y + self.config.gravity * dt).max(self.config.max_fall_speed);
        self.position += self.velocity * dt;
        // Airborne until something lands us again this tick.
        self.grounded = false;
    }

    /// Zeroes vertical speed and marks the body grounded. `update` clears the
    /// flag every tick, so landing transitions are detected by the owner.
    pub fn land(&mut self) {
        self.velocity.y = 0.0;
        self.grounded = true;
    }

    /// Keeps the box inside `[0, level_width]` horizontally and above `y = 0`.
    /// Touching the bottom counts as landing.
    pub fn clamp_to_level(&mut self, level_width: f32) {
        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.land();
        }
        if self.position.x < 0.0 {
            self.position.x = 0.0;
        }
        if self.position.x + self.config.width > level_width {
            self.position.x = level_width - self.config.width;
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }
}
