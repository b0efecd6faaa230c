use glam::{Mat4, Vec2, Vec3};

const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 20.0;
const DRAG_SENSITIVITY: f32 = 0.005;

/// Camera orbiting a target point, driven by mouse drag and scroll.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Radians around +Y; 0 puts the eye on +Z.
    pub yaw: f32,
    /// Radians, within ±85°.
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.,
            pitch: 0.,
            distance: 3.,
        }
    }
}

impl OrbitCamera {
    pub fn reset(&mut self) {
        *self = Self {
            target: self.target,
            ..Default::default()
        };
    }

    /// Apply a mouse drag, in pixels.
    pub fn drag(&mut self, delta: Vec2) {
        let limit = 85f32.to_radians();
        self.yaw -= delta.x * DRAG_SENSITIVITY;
        self.pitch = (self.pitch - delta.y * DRAG_SENSITIVITY).clamp(-limit, limit);
    }

    /// Scroll in lines; positive moves closer.
    pub fn scroll(&mut self, amount: f32) {
        if amount != 0. {
            self.distance = (self.distance * (1. - amount * 0.1)).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + self.distance * Vec3::new(cp * sy, sp, cp * cy)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    /// World-space right and up vectors of the eye, for camera-facing sprites.
    pub fn billboard_basis(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.eye()).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward).normalize();
        (right, up)
    }
}
