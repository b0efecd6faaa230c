use std::fmt::{self, Write};

use glam::{vec3, Mat4, Vec3};

use rose_core::math::{format_number, transform_point, Short};

fn report() -> Result<String, fmt::Error> {
    let mut out = String::new();
    let a = vec3(1., 2., 3.);
    let b = vec3(-4., 0.5, 2.);
    vectors(&mut out, a, b)?;
    matrices(&mut out, Vec3::X)?;
    Ok(out)
}

fn vectors(out: &mut String, a: Vec3, b: Vec3) -> fmt::Result {
    writeln!(out, "=== Vector Operations ===")?;
    writeln!(out, "a          = {}", Short(a))?;
    writeln!(out, "b          = {}", Short(b))?;
    writeln!(out, "a + b      = {}", Short(a + b))?;
    writeln!(out, "a - b      = {}", Short(a - b))?;
    writeln!(out, "dot(a,b)   = {}", format_number(a.dot(b)))?;
    writeln!(out, "cross(a,b) = {}", Short(a.cross(b)))
}

fn matrices(out: &mut String, v: Vec3) -> fmt::Result {
    let scale = Mat4::from_scale(vec3(2., 0.5, 1.5));
    let rotate = Mat4::from_rotation_z(45f32.to_radians());
    writeln!(out, "\n=== Matrix Operations ===")?;
    writeln!(
        out,
        "Identity * v = {}  (should be same as v)",
        Short(transform_point(&Mat4::IDENTITY, v))
    )?;
    writeln!(out, "Scale(2,0.5,1.5) * v = {}", Short(transform_point(&scale, v)))?;
    writeln!(out, "RotateZ(45°) * v     = {}", Short(transform_point(&rotate, v)))?;
    writeln!(
        out,
        "RotateZ * Scale * v  = {}",
        Short(transform_point(&(rotate * scale), v))
    )
}

fn main() -> fmt::Result {
    print!("{}", report()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::report;

    #[test]
    fn console_report() {
        insta::assert_snapshot!(report().unwrap(), @r###"
        === Vector Operations ===
        a          = (1, 2, 3)
        b          = (-4, 0.5, 2)
        a + b      = (-3, 2.5, 5)
        a - b      = (5, 1.5, 1)
        dot(a,b)   = 3
        cross(a,b) = (2.5, -14, 8.5)

        === Matrix Operations ===
        Identity * v = (1, 0, 0)  (should be same as v)
        Scale(2,0.5,1.5) * v = (2, 0, 0)
        RotateZ(45°) * v     = (0.707, 0.707, 0)
        RotateZ * Scale * v  = (1.414, 1.414, 0)
        "###);
    }
}
