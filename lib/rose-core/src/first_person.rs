//! Yaw/pitch camera in degrees, looking along `front`.

use glam::{Mat4, Vec3};

#[derive(Debug, Clone)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    /// Degrees; -90 looks down -Z.
    pub yaw: f32,
    /// Degrees, kept within ±89.
    pub pitch: f32,
    /// Vertical field of view in degrees, kept within 30..=90 by `zoom`.
    pub fov: f32,
    /// Degrees per pixel of mouse motion.
    pub sensitivity: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: -90.,
            pitch: 0.,
            fov: 60.,
            sensitivity: 0.12,
            near: 0.1,
            far: 200.,
        }
    }
}

impl FirstPersonCamera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn front(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(
            pitch.cos() * yaw.cos(),
            pitch.sin(),
            pitch.cos() * yaw.sin(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Y).normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.front()).normalize()
    }

    /// Front projected on the ground plane, for walking.
    pub fn flat_front(&self) -> Vec3 {
        let front = self.front();
        Vec3::new(front.x, 0., front.z).normalize_or_zero()
    }

    pub fn add_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-89., 89.);
    }

    /// Mouse look from a pixel delta. Y is inverted so moving the mouse up looks up.
    pub fn process_mouse(&mut self, dx: f32, dy: f32) {
        self.add_yaw_pitch(dx * self.sensitivity, -dy * self.sensitivity);
    }

    /// Positive deltas zoom in.
    pub fn zoom(&mut self, delta: f32) {
        self.fov = (self.fov - delta).clamp(30., 90.);
    }

    pub fn look_at_target(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.yaw = dir.z.atan2(dir.x).to_degrees();
        self.pitch = dir.y.asin().to_degrees().clamp(-89., 89.);
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), self.up())
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect, self.near, self.far)
    }
}

/// Shift doubles the walking speed.
pub fn move_speed(base: f32, sprint: bool) -> f32 {
    if sprint {
        base * 2.
    } else {
        base
    }
}

/// Cursor grab and quit requests for mouse-look demos. Ticks record them; the render thread,
/// which owns the window, applies them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MouseLook {
    pub grabbed: bool,
    pub quit: bool,
    pending: bool,
}

impl MouseLook {
    /// Starts grabbed, with the grab still to be applied.
    pub fn grabbed() -> Self {
        Self {
            grabbed: true,
            quit: false,
            pending: true,
        }
    }

    pub fn set_grab(&mut self, grab: bool) {
        tracing::debug!(grab, "Mouse grab");
        self.grabbed = grab;
        self.pending = true;
    }

    /// Releases the cursor, or asks to quit when it is already released.
    pub fn escape(&mut self) {
        if self.grabbed {
            self.set_grab(false);
        } else {
            self.quit = true;
        }
    }

    pub fn toggle(&mut self) {
        self.set_grab(!self.grabbed);
    }

    /// Grab state to apply to the window, once per change.
    pub fn take_change(&mut self) -> Option<bool> {
        std::mem::take(&mut self.pending).then_some(self.grabbed)
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn default_looks_down_negative_z() {
        let camera = FirstPersonCamera::default();
        assert!(camera.front().abs_diff_eq(-Vec3::Z, 1e-6));
        assert!(camera.right().abs_diff_eq(Vec3::X, 1e-6));
        assert!(camera.up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = FirstPersonCamera::default();
        camera.process_mouse(0.0, -10_000.0);
        assert_eq!(camera.pitch, 89.0);
        camera.process_mouse(0.0, 10_000.0);
        assert_eq!(camera.pitch, -89.0);
    }

    #[test]
    fn zoom_limits() {
        let mut camera = FirstPersonCamera::default();
        camera.zoom(2.5 * 100.0);
        assert_eq!(camera.fov, 30.0);
        camera.zoom(-2.5 * 100.0);
        assert_eq!(camera.fov, 90.0);
    }

    #[test]
    fn look_at_target_faces_target() {
        let mut camera = FirstPersonCamera::new(vec3(0.0, 1.5, 6.0));
        let target = vec3(0.0, 0.5, 0.0);
        camera.look_at_target(target);
        let expected = (target - camera.position).normalize();
        assert!(camera.front().abs_diff_eq(expected, 1e-5));
        assert!((camera.yaw - -90.0).abs() < 1e-4);
    }

    #[test]
    fn escape_releases_then_quits() {
        let mut look = MouseLook::grabbed();
        assert_eq!(look.take_change(), Some(true));
        assert_eq!(look.take_change(), None);

        look.escape();
        assert!(!look.grabbed);
        assert!(!look.quit);
        assert_eq!(look.take_change(), Some(false));

        look.escape();
        assert!(look.quit);
        assert_eq!(look.take_change(), None);
    }

    #[test]
    fn tab_toggles_grab() {
        let mut look = MouseLook::grabbed();
        look.toggle();
        assert_eq!(look.take_change(), Some(false));
        look.toggle();
        assert_eq!(look.take_change(), Some(true));
        look.escape();
        assert!(!look.quit);
    }

    #[test]
    fn shift_doubles_speed() {
        assert_eq!(move_speed(4., false), 4.);
        assert_eq!(move_speed(4., true), 8.);
    }
}
