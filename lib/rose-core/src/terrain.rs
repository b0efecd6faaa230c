//! Heightmap terrain built as a flat triangle list.

use glam::{vec2, vec3, Vec3};
use image::{imageops, imageops::FilterType, GrayImage};
use violette::vertex::DrawMode;

use crate::geometry::{Corner, MeshData};

pub const HEIGHTMAP_SIZE: u32 = 128;

const LOW_COLOR: Vec3 = Vec3::new(0.05, 0.2, 0.35);
const HIGH_COLOR: Vec3 = Vec3::new(0.6, 0.6, 0.6);

/// Square grid of heights in 0..=1, indexed by `x + z * size`.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    size: usize,
    heights: Vec<f32>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TerrainSettings {
    /// Side length of the terrain in world units.
    pub scale_xy: f32,
    /// Heights map to `-height_scale..=height_scale`.
    pub height_scale: f32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            scale_xy: 2.,
            height_scale: 0.4,
        }
    }
}

impl Heightmap {
    pub fn from_fn(size: usize, f: impl Fn(usize, usize) -> f32) -> Self {
        let heights = (0..size)
            .flat_map(|z| (0..size).map(move |x| (x, z)))
            .map(|(x, z)| f(x, z).clamp(0., 1.))
            .collect();
        Self { size, heights }
    }

    /// Resamples with a bicubic filter when the image is not [`HEIGHTMAP_SIZE`] square.
    pub fn from_luma(image: &GrayImage) -> Self {
        let resized;
        let image = if image.dimensions() == (HEIGHTMAP_SIZE, HEIGHTMAP_SIZE) {
            image
        } else {
            tracing::debug!(
                from = ?image.dimensions(),
                to = HEIGHTMAP_SIZE,
                "Resizing heightmap"
            );
            resized = imageops::resize(
                image,
                HEIGHTMAP_SIZE,
                HEIGHTMAP_SIZE,
                FilterType::CatmullRom,
            );
            &resized
        };
        Self::from_fn(HEIGHTMAP_SIZE as usize, |x, z| {
            image.get_pixel(x as u32, z as u32).0[0] as f32 / 255.
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn height(&self, x: usize, z: usize) -> f32 {
        self.heights[x + z * self.size]
    }

    /// Largest grid index as a divisor; 1 for grids with fewer than two points.
    fn last_index(&self) -> f32 {
        self.size.saturating_sub(1).max(1) as f32
    }

    /// World position of a grid point, centred on the origin.
    pub fn position(&self, x: usize, z: usize, settings: &TerrainSettings) -> Vec3 {
        let half = settings.scale_xy * 0.5;
        let last = self.last_index();
        vec3(
            x as f32 / last * settings.scale_xy - half,
            (self.height(x, z) - 0.5) * 2. * settings.height_scale,
            z as f32 / last * settings.scale_xy - half,
        )
    }

    /// Per grid point normals from central differences, clamped at the borders.
    pub fn normals(&self, settings: &TerrainSettings) -> Vec<Vec3> {
        let last = self.size as isize - 1;
        let p = |x: isize, z: isize| {
            self.position(
                x.clamp(0, last) as usize,
                z.clamp(0, last) as usize,
                settings,
            )
        };
        (0..self.size as isize)
            .flat_map(|z| (0..self.size as isize).map(move |x| (x, z)))
            .map(|(x, z)| {
                let dx = p(x + 1, z) - p(x - 1, z);
                let dz = p(x, z + 1) - p(x, z - 1);
                dz.cross(dx).normalize_or_zero()
            })
            .collect()
    }

    /// Two triangles per cell, `(i0, i2, i1)` and `(i1, i2, i3)`, without indices.
    pub fn build<V>(
        &self,
        settings: &TerrainSettings,
        ctor: impl Fn(Corner) -> V,
    ) -> MeshData<V> {
        let normals = self.normals(settings);
        let last = self.last_index();
        let corner = |x: usize, z: usize| {
            let position = self.position(x, z, settings);
            ctor(Corner {
                position,
                normal: normals[x + z * self.size],
                uv: vec2(x as f32 / last, z as f32 / last),
                color: height_color(position.y),
            })
        };
        let cells = self.size.saturating_sub(1);
        let mut vertices = Vec::with_capacity(cells * cells * 6);
        for z in 0..cells {
            for x in 0..cells {
                let (i0, i1, i2, i3) = ((x, z), (x + 1, z), (x, z + 1), (x + 1, z + 1));
                vertices.extend([i0, i2, i1, i1, i2, i3].map(|(cx, cz)| corner(cx, cz)));
            }
        }
        MeshData {
            vertices,
            indices: Vec::new(),
            mode: DrawMode::Triangles,
        }
    }
}

/// Low ground is blue, high ground grey.
pub fn height_color(y: f32) -> Vec3 {
    let t = ((y + 0.2) * 1.5).clamp(0., 1.);
    LOW_COLOR.lerp(HIGH_COLOR, t)
}

#[cfg(test)]
mod tests {
    use image::Luma;

    use super::*;

    #[test]
    fn flat_terrain() {
        let map = Heightmap::from_fn(4, |_, _| 0.5);
        let settings = TerrainSettings::default();
        assert_eq!(map.position(0, 0, &settings), vec3(-1., 0., -1.));
        assert_eq!(map.position(3, 3, &settings), vec3(1., 0., 1.));
        assert!(map
            .normals(&settings)
            .iter()
            .all(|n| n.abs_diff_eq(Vec3::Y, 1e-6)));

        let mesh = map.build(&settings, |c| c);
        assert_eq!(mesh.vertices.len(), 3 * 3 * 6);
        assert!(!mesh.is_indexed());
        // First triangle winds counter-clockwise seen from above.
        let [a, b, c] = [0, 1, 2].map(|i| mesh.vertices[i].position);
        assert!((b - a).cross(c - a).y > 0.);
        assert_eq!(mesh.vertices[1].position, map.position(0, 1, &settings));
        assert_eq!(mesh.vertices[2].position, map.position(1, 0, &settings));
    }

    #[test]
    fn heights_map_to_scale() {
        let map = Heightmap::from_fn(2, |x, _| x as f32);
        let settings = TerrainSettings::default();
        assert!((map.position(0, 0, &settings).y - -0.4).abs() < 1e-6);
        assert!((map.position(1, 0, &settings).y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn slope_normals_lean_downhill() {
        // Rises towards +x, so normals lean towards -x.
        let map = Heightmap::from_fn(8, |x, _| x as f32 / 7.);
        let normals = map.normals(&TerrainSettings::default());
        assert!(normals.iter().all(|n| n.x < 0. && n.y > 0.));
    }

    #[test]
    fn tiny_heightmaps() {
        let settings = TerrainSettings::default();
        let empty = Heightmap::from_fn(0, |_, _| 0.5);
        assert!(empty.normals(&settings).is_empty());
        assert!(empty.build(&settings, |c| c).vertices.is_empty());

        let single = Heightmap::from_fn(1, |_, _| 0.5);
        assert_eq!(single.position(0, 0, &settings), vec3(-1., 0., -1.));
        assert!(single.build(&settings, |c| c).vertices.is_empty());
    }

    #[test]
    fn luma_images_are_resized() {
        let image = GrayImage::from_pixel(16, 16, Luma([255]));
        let map = Heightmap::from_luma(&image);
        assert_eq!(map.size(), HEIGHTMAP_SIZE as usize);
        assert!(map.height(64, 64) > 0.99);
    }

    #[test]
    fn height_colors() {
        assert_eq!(height_color(-1.), LOW_COLOR);
        assert!(height_color(1.).abs_diff_eq(HIGH_COLOR, 1e-6));
        assert!(height_color(0.).abs_diff_eq(LOW_COLOR.lerp(HIGH_COLOR, 0.3), 1e-6));
    }
}
