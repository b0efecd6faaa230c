use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn left(&self) -> Vec3 {
        -self.right()
    }

    pub fn right(&self) -> Vec3 {
        self.rotation.mul_vec3(Vec3::X)
    }

    pub fn up(&self) -> Vec3 {
        self.rotation.mul_vec3(Vec3::Y)
    }

    pub fn down(&self) -> Vec3 {
        -self.up()
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation.mul_vec3(-Vec3::Z)
    }

    pub fn backward(&self) -> Vec3 {
        -self.forward()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl From<Vec3> for Transform {
    fn from(v: Vec3) -> Self {
        Self::translation(v)
    }
}

impl From<Quat> for Transform {
    fn from(v: Quat) -> Self {
        Self::rotation(v)
    }
}

impl Transform {
    pub fn translation(pos: Vec3) -> Self {
        Self {
            position: pos,
            ..Default::default()
        }
    }

    pub fn rotation(quat: Quat) -> Self {
        Self {
            rotation: quat,
            ..Default::default()
        }
    }

    /// Rotation about +Y only, angle in radians.
    pub fn from_yaw(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(yaw),
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotate so that `forward()` points at `target`, keeping +Y as up.
    pub fn looking_at(mut self, target: Vec3) -> Self {
        let view = Mat4::look_at_rh(self.position, target, Vec3::Y);
        self.rotation = Quat::from_mat4(&view).inverse();
        self
    }

    /// Translate, rotate, then scale.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn looking_at_points_forward() {
        let transform = Transform::translation(vec3(2.0, 2.0, 3.0)).looking_at(Vec3::ZERO);
        let expected = (Vec3::ZERO - transform.position).normalize();
        assert!(transform.forward().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn matrix_scales_before_translating() {
        let transform = Transform::from_yaw(vec3(1.0, 0.0, 0.0), 0.0).with_scale(Vec3::splat(2.0));
        let p = transform.matrix().transform_point3(vec3(1.0, 1.0, 1.0));
        assert_eq!(p, vec3(3.0, 2.0, 2.0));
    }
}
