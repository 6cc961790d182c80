use glam::Vec2;

use crate::rect::Rect;

/// Side-scrolling camera. `position` is the centre of the view in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
    pub world_width: f32,
    pub world_height: f32,
}

impl Camera2D {
    /// Starts centred on the first screen of the level.
    pub fn new(world_width: f32, world_height: f32) -> Self {
        Self {
            position: Vec2::new(world_width / 2.0, world_height / 2.0),
            world_width,
            world_height,
        }
    }

    /// Tracks `target_x` only while the view would stay inside the level;
    /// near either end the camera holds its last position. Returns true when
    /// the camera moved.
    pub fn follow_x(&mut self, target_x: f32, level_width: f32) -> bool {
        let half_w = self.world_width / 2.0;
        if target_x > half_w && target_x < level_width - half_w {
            let moved = self.position.x != target_x;
            self.position.x = target_x;
            return moved;
        }
        false
    }

    /// World-space rectangle currently on screen.
    pub fn view_rect(&self) -> Rect {
        let half_w = self.world_width / 2.0;
        let half_h = self.world_height / 2.0;
        Rect::new(
            self.position.x - half_w,
            self.position.y - half_h,
            self.world_width,
            self.world_height,
        )
    }
}
