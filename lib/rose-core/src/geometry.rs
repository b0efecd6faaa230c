//! CPU-side mesh generators. Each generator feeds a [`Corner`] per vertex to the builder's
//! constructor, so the same shapes serve any vertex layout.

use std::marker::PhantomData;

use glam::{vec2, vec3, Vec2, Vec3};
use violette::vertex::DrawMode;

/// Everything a generator knows about a vertex.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Corner {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub color: Vec3,
}

impl Corner {
    fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
            color: Vec3::ONE,
        }
    }
}

/// Vertices and optional indices, ready for upload. An empty index list draws the vertices in
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
    pub mode: DrawMode,
}

impl<V> MeshData<V> {
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Number of vertices the draw call consumes.
    pub fn draw_count(&self) -> usize {
        if self.is_indexed() {
            self.indices.len()
        } else {
            self.vertices.len()
        }
    }
}

/// Unit cube faces in front, right, back, left, top, bottom order. Corners are listed
/// counter-clockwise from the bottom-left as seen from outside, with UVs going 0 to 1.
const CUBE_FACES: [(Vec3, [Vec3; 4]); 6] = [
    (
        Vec3::Z,
        [
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ],
    ),
    (
        Vec3::X,
        [
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
        ],
    ),
    (
        Vec3::NEG_Z,
        [
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
        ],
    ),
    (
        Vec3::NEG_X,
        [
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, -0.5),
        ],
    ),
    (
        Vec3::Y,
        [
            Vec3::new(-0.5, 0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
        ],
    ),
    (
        Vec3::NEG_Y,
        [
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(-0.5, -0.5, 0.5),
        ],
    ),
];

const QUAD_UVS: [Vec2; 4] = [
    Vec2::new(0., 0.),
    Vec2::new(1., 0.),
    Vec2::new(1., 1.),
    Vec2::new(0., 1.),
];

/// The 8 corners of the colour cube with their colours.
const COLOR_CUBE: [(Vec3, Vec3); 8] = [
    (Vec3::new(-0.5, -0.5, 0.5), Vec3::new(1., 0., 0.)),
    (Vec3::new(0.5, -0.5, 0.5), Vec3::new(0., 1., 0.)),
    (Vec3::new(0.5, 0.5, 0.5), Vec3::new(0., 0., 1.)),
    (Vec3::new(-0.5, 0.5, 0.5), Vec3::new(1., 1., 0.)),
    (Vec3::new(-0.5, -0.5, -0.5), Vec3::new(1., 0., 1.)),
    (Vec3::new(0.5, -0.5, -0.5), Vec3::new(0., 1., 1.)),
    (Vec3::new(0.5, 0.5, -0.5), Vec3::new(1., 1., 1.)),
    (Vec3::new(-0.5, 0.5, -0.5), Vec3::new(0.3, 0.3, 0.3)),
];

#[rustfmt::skip]
const COLOR_CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 2, 3, 0, // front
    1, 5, 6, 6, 2, 1, // right
    5, 4, 7, 7, 6, 5, // back
    4, 0, 3, 3, 7, 4, // left
    3, 2, 6, 6, 7, 3, // top
    4, 5, 1, 1, 0, 4, // bottom
];

/// Bottom and top colours of each face of the "crate" cube, in [`CUBE_FACES`] order.
pub const CRATE_PALETTE: [[Vec3; 2]; 6] = [
    [Vec3::new(0.95, 0.55, 0.35), Vec3::new(0.95, 0.75, 0.45)],
    [Vec3::new(0.45, 0.75, 0.95), Vec3::new(0.35, 0.55, 0.95)],
    [Vec3::new(0.55, 0.95, 0.55), Vec3::new(0.35, 0.95, 0.55)],
    [Vec3::new(0.95, 0.55, 0.85), Vec3::new(0.85, 0.55, 0.95)],
    [Vec3::new(0.95, 0.95, 0.75), Vec3::new(0.85, 0.95, 0.85)],
    [Vec3::new(0.35, 0.35, 0.35), Vec3::new(0.45, 0.45, 0.45)],
];

fn quad_indices(count: usize) -> Vec<u32> {
    (0..count as u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect()
}

pub struct MeshBuilder<Vertex, Ctor> {
    ctor: Ctor,
    __phantom: PhantomData<Vertex>,
}

impl<Vertex, Ctor> MeshBuilder<Vertex, Ctor> {
    pub fn new(ctor: Ctor) -> Self {
        Self {
            ctor,
            __phantom: PhantomData,
        }
    }
}

impl<Vertex, Ctor: Fn(Corner) -> Vertex> MeshBuilder<Vertex, Ctor> {
    /// Rectangle in the XY plane facing +Z, centred on the origin.
    pub fn quad(&self, half_size: Vec2) -> MeshData<Vertex> {
        let vertices = QUAD_UVS
            .iter()
            .map(|&uv| {
                let position = ((uv * 2. - 1.) * half_size).extend(0.);
                (self.ctor)(Corner::new(position, Vec3::Z, uv))
            })
            .collect();
        MeshData {
            vertices,
            indices: quad_indices(1),
            mode: DrawMode::Triangles,
        }
    }

    /// Unit quad; shaders expand it around a point in view space.
    pub fn billboard(&self) -> MeshData<Vertex> {
        self.quad(Vec2::splat(0.5))
    }

    /// Covers clip space when drawn without transforms.
    pub fn fullscreen_quad(&self) -> MeshData<Vertex> {
        self.quad(Vec2::ONE)
    }

    /// 8 shared corners with one colour each.
    pub fn color_cube(&self) -> MeshData<Vertex> {
        let vertices = COLOR_CUBE
            .iter()
            .map(|&(position, color)| {
                (self.ctor)(Corner {
                    position,
                    normal: position.normalize(),
                    uv: Vec2::ZERO,
                    color,
                })
            })
            .collect();
        MeshData {
            vertices,
            indices: COLOR_CUBE_INDICES.to_vec(),
            mode: DrawMode::Triangles,
        }
    }

    /// 24 vertices with per-face normals and UVs, for textured or lit cubes.
    pub fn cube(&self) -> MeshData<Vertex> {
        self.faces(Vec3::ZERO, |_, _| Vec3::ONE)
    }

    /// Cube standing on the XZ plane, each face shaded from its bottom to its top colour.
    pub fn gradient_cube(&self, palette: &[[Vec3; 2]; 6]) -> MeshData<Vertex> {
        self.faces(Vec3::Y * 0.5, |face, corner| palette[face][corner / 2])
    }

    fn faces(&self, offset: Vec3, color: impl Fn(usize, usize) -> Vec3) -> MeshData<Vertex> {
        let vertices = CUBE_FACES
            .iter()
            .enumerate()
            .flat_map(|(face, (normal, corners))| {
                let color = &color;
                corners.iter().enumerate().map(move |(i, &position)| Corner {
                    position: position + offset,
                    normal: *normal,
                    uv: QUAD_UVS[i],
                    color: color(face, i),
                })
            })
            .map(&self.ctor)
            .collect();
        MeshData {
            vertices,
            indices: quad_indices(CUBE_FACES.len()),
            mode: DrawMode::Triangles,
        }
    }

    /// 36 vertices drawn without indices: back, front, left, right, bottom, top.
    pub fn unindexed_cube(&self) -> MeshData<Vertex> {
        const fn c(x: f32, y: f32, z: f32, u: f32, v: f32) -> (Vec3, Vec2) {
            (Vec3::new(x, y, z), Vec2::new(u, v))
        }

        #[rustfmt::skip]
        const TRIANGLES: [(Vec3, [(Vec3, Vec2); 6]); 6] = [
            (Vec3::NEG_Z, [
                c(-0.5, -0.5, -0.5, 0., 0.), c(0.5, -0.5, -0.5, 1., 0.),
                c(0.5, 0.5, -0.5, 1., 1.), c(0.5, 0.5, -0.5, 1., 1.),
                c(-0.5, 0.5, -0.5, 0., 1.), c(-0.5, -0.5, -0.5, 0., 0.),
            ]),
            (Vec3::Z, [
                c(-0.5, -0.5, 0.5, 0., 0.), c(0.5, -0.5, 0.5, 1., 0.),
                c(0.5, 0.5, 0.5, 1., 1.), c(0.5, 0.5, 0.5, 1., 1.),
                c(-0.5, 0.5, 0.5, 0., 1.), c(-0.5, -0.5, 0.5, 0., 0.),
            ]),
            (Vec3::NEG_X, [
                c(-0.5, 0.5, 0.5, 1., 0.), c(-0.5, 0.5, -0.5, 0., 0.),
                c(-0.5, -0.5, -0.5, 0., 1.), c(-0.5, -0.5, -0.5, 0., 1.),
                c(-0.5, -0.5, 0.5, 1., 1.), c(-0.5, 0.5, 0.5, 1., 0.),
            ]),
            (Vec3::X, [
                c(0.5, 0.5, 0.5, 1., 0.), c(0.5, 0.5, -0.5, 0., 0.),
                c(0.5, -0.5, -0.5, 0., 1.), c(0.5, -0.5, -0.5, 0., 1.),
                c(0.5, -0.5, 0.5, 1., 1.), c(0.5, 0.5, 0.5, 1., 0.),
            ]),
            (Vec3::NEG_Y, [
                c(-0.5, -0.5, -0.5, 0., 0.), c(0.5, -0.5, -0.5, 1., 0.),
                c(0.5, -0.5, 0.5, 1., 1.), c(0.5, -0.5, 0.5, 1., 1.),
                c(-0.5, -0.5, 0.5, 0., 1.), c(-0.5, -0.5, -0.5, 0., 0.),
            ]),
            (Vec3::Y, [
                c(-0.5, 0.5, -0.5, 0., 0.), c(0.5, 0.5, -0.5, 1., 0.),
                c(0.5, 0.5, 0.5, 1., 1.), c(0.5, 0.5, 0.5, 1., 1.),
                c(-0.5, 0.5, 0.5, 0., 1.), c(-0.5, 0.5, -0.5, 0., 0.),
            ]),
        ];
        let vertices = TRIANGLES
            .iter()
            .flat_map(|(normal, corners)| {
                corners
                    .iter()
                    .map(move |&(position, uv)| Corner::new(position, *normal, uv))
            })
            .map(&self.ctor)
            .collect();
        MeshData {
            vertices,
            indices: Vec::new(),
            mode: DrawMode::Triangles,
        }
    }

    /// `size` cells per side on the plane at height `y`, drawn as lines.
    pub fn grid(&self, size: u32, half_extent: f32, y: f32, color: Vec3) -> MeshData<Vertex> {
        let step = half_extent * 2. / size as f32;
        let line = |t: f32| -half_extent + t * step;
        let along_x = (0..=size).flat_map(|i| {
            let z = line(i as f32);
            [vec3(-half_extent, y, z), vec3(half_extent, y, z)]
        });
        let along_z = (0..=size).flat_map(|i| {
            let x = line(i as f32);
            [vec3(x, y, -half_extent), vec3(x, y, half_extent)]
        });
        let vertices = along_x
            .chain(along_z)
            .map(|position| {
                (self.ctor)(Corner {
                    position,
                    normal: Vec3::Y,
                    uv: Vec2::ZERO,
                    color,
                })
            })
            .collect();
        MeshData {
            vertices,
            indices: Vec::new(),
            mode: DrawMode::Lines,
        }
    }

    /// Square on the XZ plane facing up.
    pub fn plane(&self, size: f32) -> MeshData<Vertex> {
        let s = size / 2.;
        let vertices = [
            (vec3(-s, 0., -s), vec2(0., 0.)),
            (vec3(s, 0., -s), vec2(1., 0.)),
            (vec3(s, 0., s), vec2(1., 1.)),
            (vec3(-s, 0., s), vec2(0., 1.)),
        ]
        .into_iter()
        .map(|(position, uv)| (self.ctor)(Corner::new(position, Vec3::Y, uv)))
        .collect();
        MeshData {
            vertices,
            indices: vec![0, 1, 2, 0, 2, 3],
            mode: DrawMode::Triangles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> MeshBuilder<Corner, fn(Corner) -> Corner> {
        MeshBuilder::new(std::convert::identity)
    }

    #[test]
    fn quad_layout() {
        let quad = corners().quad(Vec2::splat(0.5));
        let positions = quad.vertices.iter().map(|c| c.position).collect::<Vec<_>>();
        assert_eq!(
            positions,
            [
                vec3(-0.5, -0.5, 0.),
                vec3(0.5, -0.5, 0.),
                vec3(0.5, 0.5, 0.),
                vec3(-0.5, 0.5, 0.)
            ]
        );
        assert_eq!(quad.indices, [0, 1, 2, 2, 3, 0]);
        assert_eq!(quad.draw_count(), 6);

        let screen = corners().fullscreen_quad();
        assert_eq!(screen.vertices[2].position, vec3(1., 1., 0.));
        assert_eq!(screen.vertices[2].uv, vec2(1., 1.));
    }

    #[test]
    fn cube_faces_point_outwards() {
        let cube = corners().cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| cube.vertices[tri[i] as usize]);
            let winding = (b.position - a.position).cross(c.position - a.position);
            assert!(winding.dot(a.normal) > 0.);
            assert!(a.position.dot(a.normal) > 0.);
        }
    }

    #[test]
    fn color_cube_shares_corners() {
        let cube = corners().color_cube();
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube.indices.iter().all(|&i| i < 8));
        assert_eq!(cube.vertices[7].color, Vec3::splat(0.3));
    }

    #[test]
    fn gradient_cube_stands_on_ground() {
        let cube = corners().gradient_cube(&CRATE_PALETTE);
        let min_y = cube.vertices.iter().map(|c| c.position.y).fold(f32::MAX, f32::min);
        let max_y = cube.vertices.iter().map(|c| c.position.y).fold(f32::MIN, f32::max);
        assert_eq!((min_y, max_y), (0., 1.));
        // Front face: bottom edge then top edge colours.
        assert_eq!(cube.vertices[0].color, vec3(0.95, 0.55, 0.35));
        assert_eq!(cube.vertices[3].color, vec3(0.95, 0.75, 0.45));
    }

    #[test]
    fn unindexed_cube() {
        let cube = corners().unindexed_cube();
        assert_eq!(cube.vertices.len(), 36);
        assert!(!cube.is_indexed());
        assert_eq!(cube.draw_count(), 36);
        assert_eq!(cube.vertices[12].uv, vec2(1., 0.));
    }

    #[test]
    fn grid_lines() {
        let grid = corners().grid(20, 10., 0., Vec3::splat(0.5));
        assert_eq!(grid.mode, DrawMode::Lines);
        assert_eq!(grid.vertices.len(), 2 * 2 * 21);
        assert_eq!(grid.vertices[0].position, vec3(-10., 0., -10.));
        assert_eq!(grid.vertices[3].position, vec3(10., 0., -9.));
        assert_eq!(grid.vertices[83].position, vec3(10., 0., 10.));
    }

    #[test]
    fn plane_faces_up() {
        let plane = corners().plane(10.);
        assert!(plane.vertices.iter().all(|c| c.normal == Vec3::Y));
        assert_eq!(plane.vertices[2].position, vec3(5., 0., 5.));
    }
}
