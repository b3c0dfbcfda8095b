//! Bot settings
//!
//! Immutable configuration handed to a `SmartBot` at construction. Stored as
//! JSON alongside the rest of the game data.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{OBSTACLE_TAG, SNAKE_TAG};
use crate::layer::{Layer, LayerMask};

/// Errors raised while loading or validating settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidRadius { field: &'static str, value: f32 },
    InvalidDuration { value: f32 },
    EmptyTag,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read settings: {err}"),
            Self::Parse(err) => write!(f, "failed to parse settings: {err}"),
            Self::InvalidRadius { field, value } => {
                write!(f, "{field} must be a positive finite radius, got {value}")
            }
            Self::InvalidDuration { value } => {
                write!(f, "seconds_to_flee must be finite and non-negative, got {value}")
            }
            Self::EmptyTag => write!(f, "obstacle tags must not be empty strings"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// SmartBot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSettings {
    /// Collider tags the bot flees from
    pub tags_to_flee: BTreeSet<String>,
    /// Seconds spent fleeing before searching for orbs again
    pub seconds_to_flee: f32,

    // === Sensors ===
    /// Radius of the orb (food) query
    pub orb_check_radius: f32,
    /// Layers the orb query considers
    pub orb_layers: LayerMask,
    /// Radius of the obstacle query
    pub obstacle_check_radius: f32,
    /// Layers the obstacle query considers
    pub obstacle_layers: LayerMask,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            tags_to_flee: [SNAKE_TAG, OBSTACLE_TAG]
                .into_iter()
                .map(String::from)
                .collect(),
            seconds_to_flee: 1.0,

            orb_check_radius: 10.0,
            orb_layers: Layer::ORBS.mask(),
            obstacle_check_radius: 1.0,
            obstacle_layers: LayerMask::from_layers(&[
                Layer::HEADS,
                Layer::BODIES,
                Layer::OBSTACLES,
            ]),
        }
    }
}

impl BotSettings {
    /// Whether a collider tag is one the bot flees from
    pub fn is_obstacle_tag(&self, tag: &str) -> bool {
        self.tags_to_flee.contains(tag)
    }

    /// Builder-style helper to replace the flee tag set
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags_to_flee = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Check that radii and durations are usable
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_radius("orb_check_radius", self.orb_check_radius)?;
        check_radius("obstacle_check_radius", self.obstacle_check_radius)?;

        if !self.seconds_to_flee.is_finite() || self.seconds_to_flee < 0.0 {
            return Err(SettingsError::InvalidDuration {
                value: self.seconds_to_flee,
            });
        }
        if self.tags_to_flee.iter().any(|tag| tag.is_empty()) {
            return Err(SettingsError::EmptyTag);
        }
        Ok(())
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded bot settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check_radius(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::InvalidRadius { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = BotSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.seconds_to_flee, 1.0);
        assert_eq!(settings.orb_check_radius, 10.0);
        assert_eq!(settings.obstacle_check_radius, 1.0);
        assert!(settings.is_obstacle_tag("Snake"));
        assert!(!settings.is_obstacle_tag("Orb"));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = BotSettings::from_json(r#"{ "seconds_to_flee": 2.5 }"#).unwrap();
        assert_eq!(settings.seconds_to_flee, 2.5);
        assert_eq!(settings.orb_check_radius, 10.0);
    }

    #[test]
    fn test_json_tags_and_masks() {
        let json = r#"{
            "tags_to_flee": ["Wall"],
            "orb_layers": 4,
            "obstacle_layers": 8
        }"#;
        let settings = BotSettings::from_json(json).unwrap();
        assert!(settings.is_obstacle_tag("Wall"));
        assert!(!settings.is_obstacle_tag("Snake"));
        assert!(settings.orb_layers.contains(Layer::ORBS));
        assert!(settings.obstacle_layers.contains(Layer::OBSTACLES));
        assert!(!settings.obstacle_layers.contains(Layer::HEADS));
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let err = BotSettings::from_json(r#"{ "orb_check_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidRadius {
                field: "orb_check_radius",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_negative_duration() {
        let settings = BotSettings {
            seconds_to_flee: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_tag() {
        let settings = BotSettings::default().with_tags(["Snake", ""]);
        assert!(matches!(settings.validate(), Err(SettingsError::EmptyTag)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = BotSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse settings"));
    }

    #[test]
    fn test_json_roundtrip_preserves_settings() {
        let settings = BotSettings::default().with_tags(["Wall", "Snake"]);
        let json = settings.to_json().unwrap();
        assert_eq!(BotSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = BotSettings::load("/nonexistent/smartbot.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
