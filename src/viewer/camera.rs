//! Showcase camera and the optional orbit rig (dolly).

use dolly::prelude::*;
use glam::{Mat4, Vec3};

/// Vertical field of view in degrees.
pub const FOV_Y_DEGREES: f32 = 75.0;
/// Near clip plane.
pub const NEAR: f32 = 0.1;
/// Far clip plane.
pub const FAR: f32 = 100.0;
/// Camera distance from the origin along the view axis.
pub const CAMERA_DISTANCE: f32 = 2.5;

/// Rotation smoothing for the orbit rig. Higher values lag more.
const ROTATION_SMOOTHNESS: f32 = 1.5;

const OPENGL_TO_WGPU_MATRIX: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

pub fn wgpu_projection(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    // wgpu uses 0..1 depth; no Y flip needed for NDC orientation.
    OPENGL_TO_WGPU_MATRIX * Mat4::perspective_rh(fov_y, aspect, near, far)
}

/// Fixed perspective camera used in pointer-follow mode: parked on the view
/// axis at [`CAMERA_DISTANCE`], looking at the origin. Only the aspect ratio
/// changes, and only on resize.
pub struct ShowcaseCamera {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    aspect: f32,
}

impl ShowcaseCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            fov: FOV_Y_DEGREES,
            near: NEAR,
            far: FAR,
            aspect: aspect.max(f32::EPSILON),
        }
    }

    /// Recompute the aspect ratio from viewport dimensions.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, CAMERA_DISTANCE)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        wgpu_projection(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Damped orbit rig for [`InputMode::Orbit`](super::input::InputMode). Not
/// constructed at all in pointer-follow mode.
pub struct OrbitRig {
    rig: CameraRig,
}

impl OrbitRig {
    pub fn new(target: Vec3, distance: f32) -> Self {
        let rig = CameraRig::builder()
            .with(YawPitch::new())
            .with(Smooth::new_rotation(ROTATION_SMOOTHNESS))
            .with(Arm::new(mint::Vector3 { x: 0.0, y: 0.0, z: distance }))
            .with(LookAt::new(mint::Point3 { x: target.x, y: target.y, z: target.z }))
            .build();

        Self { rig }
    }

    /// Orbit around target (drag)
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let sensitivity = 0.5;
        self.rig.driver_mut::<YawPitch>().rotate_yaw_pitch(
            -delta_x * sensitivity,
            -delta_y * sensitivity,
        );
    }

    /// Zoom (scroll)
    pub fn zoom(&mut self, delta: f32) {
        let arm = self.rig.driver_mut::<Arm>();
        let current = arm.offset.z;
        let factor = 1.0 - delta * 0.1;
        arm.offset.z = (current * factor).clamp(0.5, 20.0);
    }

    /// Advance damping (call each frame).
    pub fn update(&mut self, dt: f32) {
        self.rig.update(dt);
    }

    pub fn position(&self) -> Vec3 {
        let p = self.rig.final_transform.position;
        Vec3::new(p.x, p.y, p.z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        let t = &self.rig.final_transform;
        let pos = Vec3::new(t.position.x, t.position.y, t.position.z);
        let fwd: Vec3 = t.forward();
        let up: Vec3 = t.up();
        Mat4::look_at_rh(pos, pos + fwd, up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_camera_constants() {
        let cam = ShowcaseCamera::new(16.0 / 9.0);
        assert_eq!(cam.fov, 75.0);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 100.0);
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 2.5));
    }

    #[test]
    fn test_aspect_follows_viewport() {
        let mut cam = ShowcaseCamera::new(1.0);
        cam.set_viewport(1920.0, 1080.0);
        assert!((cam.aspect() - 1920.0 / 1080.0).abs() < 1e-6);

        // Degenerate sizes leave the previous aspect alone
        cam.set_viewport(0.0, 1080.0);
        assert!((cam.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_looks_at_origin() {
        let cam = ShowcaseCamera::new(1.0);
        let view = cam.view_matrix();
        // The origin sits CAMERA_DISTANCE in front of the camera (-Z in view space)
        let origin = view * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin.z + CAMERA_DISTANCE).abs() < 1e-5);
        // The camera's own position maps to the view-space origin
        let eye = view * Vec4::new(0.0, 0.0, CAMERA_DISTANCE, 1.0);
        assert!(eye.truncate().length() < 1e-5);
    }

    #[test]
    fn test_projection_is_finite() {
        let cam = ShowcaseCamera::new(2.0);
        let m = cam.view_proj_matrix();
        assert!(m.is_finite());
        // A point between near and far projects inside clip space
        let p = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc_z = p.z / p.w;
        assert!(ndc_z > 0.0 && ndc_z < 1.0);
    }

    #[test]
    fn test_orbit_rig_starts_at_distance() {
        let mut rig = OrbitRig::new(Vec3::ZERO, CAMERA_DISTANCE);
        rig.update(1.0);
        assert!((rig.position().length() - CAMERA_DISTANCE).abs() < 1e-3);
    }

    #[test]
    fn test_orbit_damping_converges() {
        let mut rig = OrbitRig::new(Vec3::ZERO, CAMERA_DISTANCE);
        rig.update(1.0);
        let start = rig.position();
        rig.orbit(200.0, 0.0);
        // One short frame: the smoothed rig has not snapped to the target
        rig.update(1.0 / 60.0);
        let after_one = rig.position();
        // Many frames: it converges
        for _ in 0..600 {
            rig.update(1.0 / 60.0);
        }
        let settled = rig.position();
        assert!((after_one - start).length() < (settled - start).length());
        assert!((settled.length() - CAMERA_DISTANCE).abs() < 1e-2);
    }
}
