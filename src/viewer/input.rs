//! Input modes and pointer mapping.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// How pointer input drives the scene. The two mappings are mutually
/// exclusive: pointer-follow rotates the model under a fixed camera, orbit
/// drags a damped camera rig around the model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    PointerFollow,
    Orbit,
}

/// Map a pointer position to model rotation: yaw = (x/width - 0.5)·π,
/// pitch = (y/height - 0.5)·π. Stateless, no smoothing.
pub fn pointer_rotation(x: f32, y: f32, width: f32, height: f32) -> (f32, f32) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    let yaw = (x / width - 0.5) * PI;
    let pitch = (y / height - 0.5) * PI;
    (yaw, pitch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_neutral() {
        let (yaw, pitch) = pointer_rotation(640.0, 360.0, 1280.0, 720.0);
        assert_eq!((yaw, pitch), (0.0, 0.0));
    }

    #[test]
    fn test_edges_map_to_half_pi() {
        let (yaw, _) = pointer_rotation(1280.0, 360.0, 1280.0, 720.0);
        assert!((yaw - PI / 2.0).abs() < 1e-6);

        let (yaw, pitch) = pointer_rotation(0.0, 0.0, 1280.0, 720.0);
        assert!((yaw + PI / 2.0).abs() < 1e-6);
        assert!((pitch + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_mapping_is_exact() {
        // (x/w - 0.5)·π, (y/h - 0.5)·π, with no scaling or clamping
        let (yaw, pitch) = pointer_rotation(320.0, 540.0, 1280.0, 720.0);
        assert_eq!(yaw, (320.0 / 1280.0 - 0.5) * PI);
        assert_eq!(pitch, (540.0 / 720.0 - 0.5) * PI);
    }

    #[test]
    fn test_degenerate_window() {
        assert_eq!(pointer_rotation(10.0, 10.0, 0.0, 720.0), (0.0, 0.0));
        assert_eq!(pointer_rotation(10.0, 10.0, 1280.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_mode_serde_names() {
        assert_eq!(
            serde_json::to_string(&InputMode::PointerFollow).unwrap(),
            r#""pointer_follow""#
        );
        assert_eq!(serde_json::to_string(&InputMode::Orbit).unwrap(), r#""orbit""#);
    }
}
