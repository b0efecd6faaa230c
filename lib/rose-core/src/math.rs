//! Console helpers for printing vectors and transformed points.

use std::fmt;

use glam::{Mat4, Vec3};

/// Transform `point` as `(x, y, z, 1)`. The result is divided by `w` unless `w` is 0 or 1.
pub fn transform_point(matrix: &Mat4, point: Vec3) -> Vec3 {
    let v = *matrix * point.extend(1.);
    if v.w != 0. && v.w != 1. {
        v.truncate() / v.w
    } else {
        v.truncate()
    }
}

/// Round to at most three decimals, trimming trailing zeros. Zero is always printed unsigned.
pub fn format_number(value: f32) -> String {
    // Half away from zero.
    let rounded = (value as f64 * 1000.).round() / 1000.;
    if rounded == 0. {
        return "0".to_string();
    }
    let text = format!("{:.3}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `Display` wrapper printing a vector as `(x, y, z)` with [`format_number`].
#[derive(Debug, Copy, Clone)]
pub struct Short(pub Vec3);

impl fmt::Display for Short {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Vec3 { x, y, z } = self.0;
        write!(
            f,
            "({}, {}, {})",
            format_number(x),
            format_number(y),
            format_number(z)
        )
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(1.), "1");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-4.), "-4");
        assert_eq!(format_number(0.70710677), "0.707");
        assert_eq!(format_number(2.0006), "2.001");
        assert_eq!(format_number(1234.5), "1234.5");
        assert_eq!(format_number(-0.), "0");
        assert_eq!(format_number(-0.0001), "0");
    }

    #[test]
    fn vector_display() {
        assert_eq!(Short(vec3(-4., 0.5, 2.)).to_string(), "(-4, 0.5, 2)");
    }

    #[test]
    fn homogeneous_divide() {
        let identity = transform_point(&Mat4::IDENTITY, vec3(1., 2., 3.));
        assert_eq!(identity, vec3(1., 2., 3.));

        let mut m = Mat4::IDENTITY;
        m.w_axis.w = 2.;
        assert_eq!(transform_point(&m, vec3(2., 4., 6.)), vec3(1., 2., 3.));

        // w == 0 is left as is.
        m.w_axis.w = 0.;
        assert_eq!(transform_point(&m, vec3(2., 4., 6.)), vec3(2., 4., 6.));
    }
}
