use hop_core::BodyConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Session tuning. Every field is optional in the JSON file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_world_width")]
    pub world_width: f32,
    #[serde(default = "default_world_height")]
    pub world_height: f32,
    #[serde(default)]
    pub body: BodyConfig,
    #[serde(default = "default_collectible_size")]
    pub collectible_width: f32,
    #[serde(default = "default_collectible_size")]
    pub collectible_height: f32,
    #[serde(default = "default_player_texture")]
    pub player_texture: String,
    #[serde(default = "default_collectible_texture")]
    pub collectible_texture: String,
    #[serde(default = "default_theme_track")]
    pub theme_track: String,
    #[serde(default)]
    pub show_collision_debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: default_world_width(),
            world_height: default_world_height(),
            body: BodyConfig::default(),
            collectible_width: default_collectible_size(),
            collectible_height: default_collectible_size(),
            player_texture: default_player_texture(),
            collectible_texture: default_collectible_texture(),
            theme_track: default_theme_track(),
            show_collision_debug: false,
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that do not depend on the level. Body size against the tile size is
/// checked when a session starts.
pub fn validate_config(config: &GameConfig) -> Result<(), String> {
    if !(config.world_width > 0.0 && config.world_height > 0.0) {
        return Err(
            "Config validation failed: world_width and world_height must be > 0".to_string(),
        );
    }
    if !(config.collectible_width > 0.0 && config.collectible_height > 0.0) {
        return Err(
            "Config validation failed: collectible_width and collectible_height must be > 0"
                .to_string(),
        );
    }
    if config.player_texture.is_empty() || config.collectible_texture.is_empty() {
        return Err("Config validation failed: texture keys must not be empty".to_string());
    }
    Ok(())
}

const fn default_world_width() -> f32 {
    640.0
}

const fn default_world_height() -> f32 {
    480.0
}

const fn default_collectible_size() -> f32 {
    16.0
}

fn default_player_texture() -> String {
    "player".to_string()
}

fn default_collectible_texture() -> String {
    "acorn".to_string()
}

fn default_theme_track() -> String {
    "theme".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "hop_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn empty_object_yields_defaults() {
        let path = temp_file_path("empty");
        fs::write(&path, "{}").expect("write temp file");

        let config = load_config_from_path(&path).expect("empty config should load");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.world_width, 640.0);
        assert_eq!(config.body, BodyConfig::default());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn partial_body_overrides_keep_other_defaults() {
        let path = temp_file_path("partial");
        fs::write(
            &path,
            r#"{ "show_collision_debug": true, "body": { "jump_speed": 420.0 } }"#,
        )
        .expect("write temp file");

        let config = load_config_from_path(&path).expect("partial config should load");
        assert!(config.show_collision_debug);
        assert_eq!(config.body.jump_speed, 420.0);
        assert_eq!(config.body.gravity, BodyConfig::default().gravity);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_non_positive_world_size() {
        let path = temp_file_path("world");
        fs::write(&path, r#"{ "world_width": 0.0 }"#).expect("write temp file");

        let err = load_config_from_path(&path).expect_err("zero world width should fail");
        assert!(err.contains("world_width"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_reports_path() {
        let path = temp_file_path("missing");
        let err = load_config_from_path(&path).expect_err("missing file should fail");
        assert!(err.contains("Failed to read"));
    }
}
