//! Settings Record
//!
//! Flat render/debug settings. The Core stores the current value and
//! rebroadcasts changes to every actor; it does not interpret the fields.
//! The demo binary loads an optional JSON file over the defaults.

use serde::{Deserialize, Serialize};

/// Flat settings record, broadcast-opaque to the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub screen_width: u32,
    pub screen_height: u32,
    pub render_scale: f64,
    pub fov_degrees: f64,
    pub render_distance: f64,
    pub light_falloff: f64,
    pub global_illumination: f64,
    pub fullscreen: bool,
    pub vsync: bool,
    pub show_sprite_boxes: bool,
    pub debug: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            screen_width: 1024,
            screen_height: 768,
            render_scale: 1.0,
            fov_degrees: 68.0,
            render_distance: -1.0,
            light_falloff: -100.0,
            global_illumination: 500.0,
            fullscreen: false,
            vsync: true,
            show_sprite_boxes: false,
            debug: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let cfg: SimConfig = serde_json::from_str(r#"{"screen_width": 640, "debug": true}"#)
            .expect("parse config");
        assert_eq!(cfg.screen_width, 640);
        assert!(cfg.debug);
        assert_eq!(cfg.screen_height, SimConfig::default().screen_height);
    }
}
