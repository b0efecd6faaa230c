use std::ops::Range;

use glam::{Mat4, Vec2};

use crate::transform::Transform;

/// Perspective projection with a vertical field of view.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub fovy: f32,
    pub width: f32,
    pub height: f32,
    pub zrange: Range<f32>,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fovy: 45f32.to_radians(),
            zrange: 0.1..100.0,
            width: 1.,
            height: 1.,
        }
    }
}

impl Projection {
    pub fn update(&mut self, size: Vec2) {
        self.width = size.x;
        self.height = size.y.max(1.);
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fovy,
            self.aspect(),
            self.zrange.start,
            self.zrange.end,
        )
    }
}

/// Off-centre orthographic projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Orthographic {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub zrange: Range<f32>,
}

impl Orthographic {
    /// Pixel coordinates with the origin at the bottom-left.
    pub fn pixels(size: Vec2) -> Self {
        Self {
            left: 0.,
            right: size.x,
            bottom: 0.,
            top: size.y,
            zrange: -1.0..1.0,
        }
    }

    /// Pixel coordinates with the origin at the top-left and +Y going down.
    pub fn pixels_y_down(size: Vec2) -> Self {
        Self {
            bottom: size.y,
            top: 0.,
            ..Self::pixels(size)
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.zrange.start,
            self.zrange.end,
        )
    }
}

/// Camera placed by a [`Transform`]; the view matrix is its inverse.
#[derive(Debug, Clone, Default)]
pub struct Camera {
    pub transform: Transform,
    pub projection: Projection,
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.transform.rotation, self.transform.position).inverse()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.matrix() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use glam::{vec2, vec3, Vec3};

    use super::*;

    #[test]
    fn view_matches_look_at() {
        let camera = Camera {
            transform: Transform::translation(vec3(2.0, 2.0, 3.0)).looking_at(Vec3::ZERO),
            projection: Projection::default(),
        };
        let expected = Mat4::look_at_rh(vec3(2.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
        assert!(camera.view().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn y_down_pixels_map_top_left() {
        let proj = Orthographic::pixels_y_down(vec2(800.0, 600.0)).matrix();
        let top_left = proj.project_point3(Vec3::ZERO);
        assert!(top_left.abs_diff_eq(vec3(-1.0, 1.0, 0.0), 1e-6));
        let bottom_right = proj.project_point3(vec3(800.0, 600.0, 0.0));
        assert!(bottom_right.abs_diff_eq(vec3(1.0, -1.0, 0.0), 1e-6));
    }
}
