use glam::{Vec2, Vec3};

/// Axis-aligned box stored as centre and half extents.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Touching faces count as an overlap.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let (amin, amax) = (self.min(), self.max());
        let (bmin, bmax) = (other.min(), other.max());
        amin.cmple(bmax).all() && amax.cmpge(bmin).all()
    }
}

/// 2D rectangle stored as top-left corner and size, in a y-down space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub position: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Touching edges count as an overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        let collision_x = self.position.x + self.size.x >= other.position.x
            && other.position.x + other.size.x >= self.position.x;
        let collision_y = self.position.y + self.size.y >= other.position.y
            && other.position.y + other.size.y >= self.position.y;
        collision_x && collision_y
    }
}

/// Circle against rectangle: clamp the centre difference to the half extents and compare the
/// squared distance to the closest point.
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let half_extents = rect.size * 0.5;
    let rect_center = rect.position + half_extents;
    let clamped = (center - rect_center).clamp(-half_extents, half_extents);
    let closest = rect_center + clamped;
    let delta = closest - center;
    delta.length_squared() <= radius * radius
}

#[cfg(test)]
mod tests {
    use glam::{vec2, vec3};

    use super::*;

    #[test]
    fn aabb_touching_faces_overlap() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(vec3(2.0, 0.0, 0.0), Vec3::ONE);
        assert!(a.intersects(&b));
        let c = Aabb::new(vec3(2.01, 0.0, 0.0), Vec3::ONE);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn aabb_needs_all_axes() {
        let a = Aabb::new(Vec3::ZERO, Vec3::splat(0.5));
        let b = Aabb::new(vec3(0.0, 5.0, 0.0), Vec3::splat(0.5));
        assert!(!a.intersects(&b));
        assert_eq!(a.min(), Vec3::splat(-0.5));
        assert_eq!(a.max(), Vec3::splat(0.5));
    }

    #[test]
    fn rect_edges_overlap() {
        let a = Rect::new(vec2(0.0, 0.0), vec2(10.0, 10.0));
        let b = Rect::new(vec2(10.0, 10.0), vec2(5.0, 5.0));
        assert!(a.intersects(&b));
        let c = Rect::new(vec2(10.5, 0.0), vec2(5.0, 5.0));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn circle_rect() {
        let rect = Rect::new(vec2(0.0, 0.0), vec2(100.0, 20.0));
        assert!(circle_intersects_rect(vec2(50.0, -10.0), 10.0, &rect));
        assert!(!circle_intersects_rect(vec2(50.0, -10.5), 10.0, &rect));
        // Corner: distance to (0, 0) is sqrt(50) ≈ 7.07.
        assert!(circle_intersects_rect(vec2(-5.0, -5.0), 7.1, &rect));
        assert!(!circle_intersects_rect(vec2(-5.0, -5.0), 7.0, &rect));
        assert!(circle_intersects_rect(vec2(50.0, 10.0), 1.0, &rect));
    }
}
