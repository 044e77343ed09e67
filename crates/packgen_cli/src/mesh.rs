//! Triangle meshes for prisms and open-top containers.
use std::f64::consts::TAU;

use glam::{DQuat, DVec3};

/// Corner indices of each cuboid face, counter-clockwise seen from outside.
/// Bit 0 selects max x, bit 1 max y, bit 2 max z.
const CUBOID_FACES: [[usize; 4]; 6] = [
    [0, 2, 3, 1], // -z
    [4, 5, 7, 6], // +z
    [0, 1, 5, 4], // -y
    [2, 6, 7, 3], // +y
    [0, 4, 6, 2], // -x
    [1, 3, 7, 5], // +x
];

/// A triangle soup with counter-clockwise (outward-facing) winding.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub triangles: Vec<[DVec3; 3]>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Right prism over a regular polygon, centered on the origin with its axis along z.
    pub fn prism(sides: u32, radius: f64, height: f64) -> Self {
        let n = sides.max(3) as usize;
        let half = height * 0.5;
        let ring = |z: f64| -> Vec<DVec3> {
            (0..n)
                .map(|k| {
                    let a = TAU * k as f64 / n as f64;
                    DVec3::new(radius * a.cos(), radius * a.sin(), z)
                })
                .collect()
        };
        let bottom = ring(-half);
        let top = ring(half);
        let bottom_center = DVec3::new(0.0, 0.0, -half);
        let top_center = DVec3::new(0.0, 0.0, half);

        let mut mesh = Self::new();
        for k in 0..n {
            let next = (k + 1) % n;
            mesh.triangles.push([top_center, top[k], top[next]]);
            mesh.triangles.push([bottom_center, bottom[next], bottom[k]]);
            mesh.quad(bottom[k], bottom[next], top[next], top[k]);
        }
        mesh
    }

    /// Axis-aligned box between `min` and `max`.
    pub fn cuboid(min: DVec3, max: DVec3) -> Self {
        let corner = |i: usize| {
            DVec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        };
        let mut mesh = Self::new();
        for [a, b, c, d] in CUBOID_FACES {
            mesh.quad(corner(a), corner(b), corner(c), corner(d));
        }
        mesh
    }

    /// Open-top box whose inner volume is `side × side × height`, floor at z = 0.
    /// Walls and floor are `wall` thick and grow outward.
    pub fn open_box(side: f64, height: f64, wall: f64) -> Self {
        let s = side * 0.5;
        let o = s + wall;
        let slabs = [
            // floor
            (DVec3::new(-o, -o, -wall), DVec3::new(o, o, 0.0)),
            // -x, +x, -y, +y walls
            (DVec3::new(-o, -o, 0.0), DVec3::new(-s, o, height)),
            (DVec3::new(s, -o, 0.0), DVec3::new(o, o, height)),
            (DVec3::new(-s, -o, 0.0), DVec3::new(s, -s, height)),
            (DVec3::new(-s, s, 0.0), DVec3::new(s, o, height)),
        ];
        let mut mesh = Self::new();
        for (min, max) in slabs {
            mesh.extend(&Self::cuboid(min, max));
        }
        mesh
    }

    fn quad(&mut self, a: DVec3, b: DVec3, c: DVec3, d: DVec3) {
        self.triangles.push([a, b, c]);
        self.triangles.push([a, c, d]);
    }

    pub fn extend(&mut self, other: &TriangleMesh) {
        self.triangles.extend_from_slice(&other.triangles);
    }

    /// Rotate about the origin, then translate.
    pub fn transformed(&self, rotation: DQuat, translation: DVec3) -> Self {
        Self {
            triangles: self
                .triangles
                .iter()
                .map(|tri| tri.map(|v| rotation * v + translation))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Single-precision STL facets; degenerate triangles get a zero normal.
    pub fn stl_triangles(&self) -> Vec<stl_io::Triangle> {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let normal = (b - a).cross(c - a).normalize_or_zero();
                stl_io::Triangle {
                    normal: stl_io::Normal::new(normal.as_vec3().to_array()),
                    vertices: [a, b, c].map(|v| stl_io::Vertex::new(v.as_vec3().to_array())),
                }
            })
            .collect()
    }
}

/// Rotation for Euler angles applied about X, then Y, then Z.
pub fn euler_xyz(angles: [f64; 3]) -> DQuat {
    let [x, y, z] = angles;
    DQuat::from_rotation_z(z) * DQuat::from_rotation_y(y) * DQuat::from_rotation_x(x)
}
