/// Geometry primitives for the tutorial meshes
use nalgebra::{Point3, Vector3};

use crate::error::{TransformError, TransformResult};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    /// A vertex on the z = 0 plane facing +z
    pub fn flat(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0, 0.0, 0.0, 1.0)
    }
}

/// A triangle face defined by three vertices, counter-clockwise when front-facing
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding order; zero for a degenerate triangle
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1
            .cross(&edge2)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Build a mesh from a vertex list and a triangle index list.
    ///
    /// Fails when the index count is not a multiple of three or an index
    /// points past the end of `vertices`.
    pub fn from_indexed(vertices: &[Vertex], indices: &[u16]) -> TransformResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(TransformError::invalid_argument(format!(
                "{} indices do not form whole triangles",
                indices.len()
            )));
        }
        let vertex = |index: u16| {
            vertices.get(index as usize).copied().ok_or_else(|| {
                TransformError::invalid_argument(format!(
                    "index {index} is out of range for {} vertices",
                    vertices.len()
                ))
            })
        };

        let mut mesh = Self::with_capacity(indices.len() / 3);
        for face in indices.chunks_exact(3) {
            mesh.add_triangle(Triangle::new(vertex(face[0])?, vertex(face[1])?, vertex(face[2])?));
        }
        Ok(mesh)
    }

    /// Single triangle already in clip space
    pub fn triangle() -> Self {
        let mut mesh = Self::with_capacity(1);
        mesh.add_triangle(Triangle::new(
            Vertex::flat(-0.5, -0.5),
            Vertex::flat(0.5, -0.5),
            Vertex::flat(0.0, 0.5),
        ));
        mesh
    }

    /// Clip-space quad drawn as two indexed triangles
    pub fn rectangle() -> Self {
        let corners = [
            Vertex::flat(-0.5, 0.5),
            Vertex::flat(0.5, 0.5),
            Vertex::flat(0.5, -0.5),
            Vertex::flat(-0.5, -0.5),
        ];
        // Clockwise in the source data; reorder so both faces stay front-facing.
        let mut mesh = Self::with_capacity(2);
        mesh.add_triangle(Triangle::new(corners[0], corners[2], corners[1]));
        mesh.add_triangle(Triangle::new(corners[2], corners[0], corners[3]));
        mesh
    }

    /// Axis-aligned cube centred on the origin
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(12);

        // Front face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-half, -half, half, 0.0, 0.0, 1.0),
            Vertex::new(half, -half, half, 0.0, 0.0, 1.0),
            Vertex::new(half, half, half, 0.0, 0.0, 1.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-half, -half, half, 0.0, 0.0, 1.0),
            Vertex::new(half, half, half, 0.0, 0.0, 1.0),
            Vertex::new(-half, half, half, 0.0, 0.0, 1.0),
        ));

        // Back face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-half, -half, -half, 0.0, 0.0, -1.0),
            Vertex::new(-half, half, -half, 0.0, 0.0, -1.0),
            Vertex::new(half, half, -half, 0.0, 0.0, -1.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-half, -half, -half, 0.0, 0.0, -1.0),
            Vertex::new(half, half, -half, 0.0, 0.0, -1.0),
            Vertex::new(half, -half, -half, 0.0, 0.0, -1.0),
        ));

        // Top face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-half, half, -half, 0.0, 1.0, 0.0),
            Vertex::new(-half, half, half, 0.0, 1.0, 0.0),
            Vertex::new(half, half, half, 0.0, 1.0, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-half, half, -half, 0.0, 1.0, 0.0),
            Vertex::new(half, half, half, 0.0, 1.0, 0.0),
            Vertex::new(half, half, -half, 0.0, 1.0, 0.0),
        ));

        // Bottom face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-half, -half, -half, 0.0, -1.0, 0.0),
            Vertex::new(half, -half, -half, 0.0, -1.0, 0.0),
            Vertex::new(half, -half, half, 0.0, -1.0, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-half, -half, -half, 0.0, -1.0, 0.0),
            Vertex::new(half, -half, half, 0.0, -1.0, 0.0),
            Vertex::new(-half, -half, half, 0.0, -1.0, 0.0),
        ));

        // Right face
        mesh.add_triangle(Triangle::new(
            Vertex::new(half, -half, -half, 1.0, 0.0, 0.0),
            Vertex::new(half, half, -half, 1.0, 0.0, 0.0),
            Vertex::new(half, half, half, 1.0, 0.0, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(half, -half, -half, 1.0, 0.0, 0.0),
            Vertex::new(half, half, half, 1.0, 0.0, 0.0),
            Vertex::new(half, -half, half, 1.0, 0.0, 0.0),
        ));

        // Left face
        mesh.add_triangle(Triangle::new(
            Vertex::new(-half, -half, -half, -1.0, 0.0, 0.0),
            Vertex::new(-half, -half, half, -1.0, 0.0, 0.0),
            Vertex::new(-half, half, half, -1.0, 0.0, 0.0),
        ));
        mesh.add_triangle(Triangle::new(
            Vertex::new(-half, -half, -half, -1.0, 0.0, 0.0),
            Vertex::new(-half, half, half, -1.0, 0.0, 0.0),
            Vertex::new(-half, half, -half, -1.0, 0.0, 0.0),
        ));

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
