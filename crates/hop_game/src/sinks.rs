//! Fire-and-forget outputs of a session. The simulation never reads anything
//! back from these.

use hop_core::{Camera2D, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Jump,
    Land,
    Collect,
}

pub trait AudioSink {
    fn play_sound(&mut self, cue: SoundCue);
    fn play_music(&mut self, track: &str, looping: bool);
    fn stop_music(&mut self);
}

pub trait RenderSink {
    fn begin_frame(&mut self, camera: &Camera2D);
    fn draw_tiles(&mut self, camera: &Camera2D);
    fn draw_sprite(&mut self, texture_key: &str, rect: Rect);
    fn draw_debug_rect(&mut self, rect: Rect);
    fn end_frame(&mut self);
}

/// Headless audio: logs every cue and keeps a count.
#[derive(Debug, Default)]
pub struct LogAudio {
    pub sounds_played: u64,
    pub music: Option<String>,
}

impl AudioSink for LogAudio {
    fn play_sound(&mut self, cue: SoundCue) {
        self.sounds_played += 1;
        log::debug!("Sound: {cue:?}");
    }

    fn play_music(&mut self, track: &str, looping: bool) {
        log::info!("Music: '{track}' (looping={looping})");
        self.music = Some(track.to_string());
    }

    fn stop_music(&mut self) {
        if let Some(track) = self.music.take() {
            log::info!("Music stopped: '{track}'");
        }
    }
}

/// Headless renderer: counts frames and sprites, traces draw calls.
#[derive(Debug, Default)]
pub struct LogRender {
    pub frames: u64,
    pub sprites_this_frame: usize,
    pub sprites_total: u64,
}

impl RenderSink for LogRender {
    fn begin_frame(&mut self, camera: &Camera2D) {
        self.sprites_this_frame = 0;
        log::trace!(
            "Frame {} camera=({:.1}, {:.1})",
            self.frames,
            camera.position.x,
            camera.position.y
        );
    }

    fn draw_tiles(&mut self, camera: &Camera2D) {
        log::trace!("Tiles in view {:?}", camera.view_rect());
    }

    fn draw_sprite(&mut self, texture_key: &str, rect: Rect) {
        self.sprites_this_frame += 1;
        self.sprites_total += 1;
        log::trace!("Sprite '{texture_key}' at ({:.1}, {:.1})", rect.x, rect.y);
    }

    fn draw_debug_rect(&mut self, rect: Rect) {
        log::trace!("Debug rect {rect:?}");
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}
