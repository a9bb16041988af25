// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Procedural geometry construction.
//!
//! [`Geometry`] is an editable polygon soup. Generators append shapes to it,
//! post-processing passes derive normals and tangents, and
//! [`MeshResource::from_geometry`](super::MeshResource::from_geometry) turns
//! the triangulated result into a mesh.

use crate::math::{LinearRgba, Mat4, Vec2, Vec3, EPSILON};

/// One vertex of a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryVertex {
    /// Position.
    pub position: Vec3,
    /// Normal. Filled by [`Geometry::compute_face_normals`] for generated shapes.
    pub normal: Vec3,
    /// Texture coordinate.
    pub tex_coord: Vec2,
    /// Tangent. Filled by [`Geometry::compute_tangents`].
    pub tangent: Vec3,
    /// Vertex color.
    pub color: LinearRgba,
}

/// A polygon referencing vertices by index, counter-clockwise seen from the front.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryPolygon {
    /// Vertex indices.
    pub vertices: Vec<u32>,
    /// The face normal.
    pub normal: Vec3,
}

/// An editable polygon mesh used to build procedural meshes.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    /// All vertices.
    pub vertices: Vec<GeometryVertex>,
    /// All polygons.
    pub polygons: Vec<GeometryPolygon>,
}

/// Face frames of a box: outward normal and the two in-plane axes, `u x v = n`.
const BOX_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::new(0.0, 0.0, -1.0), Vec3::Y),
    (Vec3::new(-1.0, 0.0, 0.0), Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::new(0.0, 0.0, -1.0)),
    (Vec3::new(0.0, -1.0, 0.0), Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::Y),
];

impl Geometry {
    /// Creates an empty geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its index.
    pub fn add_vertex(
        &mut self,
        position: Vec3,
        normal: Vec3,
        tex_coord: Vec2,
        color: LinearRgba,
        transform: &Mat4,
    ) -> u32 {
        self.vertices.push(GeometryVertex {
            position: transform.transform_point(position),
            normal: transform.transform_vector(normal).normalize(),
            tex_coord,
            tangent: Vec3::ZERO,
            color,
        });
        (self.vertices.len() - 1) as u32
    }

    /// Appends a polygon over existing vertex indices.
    pub fn add_polygon(&mut self, vertices: Vec<u32>) {
        self.polygons.push(GeometryPolygon {
            vertices,
            normal: Vec3::ZERO,
        });
    }

    /// Appends a box of the given full `size`, centered at the origin before
    /// `transform` is applied.
    ///
    /// Every face gets its own four vertices with a full `[0, 1]` texture
    /// square, so faces do not share normals or texture seams.
    pub fn add_textured_box(&mut self, size: Vec3, color: LinearRgba, transform: &Mat4) {
        let half = size * 0.5;
        let corners = [
            (-1.0, -1.0, Vec2::new(0.0, 1.0)),
            (1.0, -1.0, Vec2::new(1.0, 1.0)),
            (1.0, 1.0, Vec2::new(1.0, 0.0)),
            (-1.0, 1.0, Vec2::new(0.0, 0.0)),
        ];

        for (normal, u, v) in BOX_FACES {
            let first = self.vertices.len() as u32;
            for (su, sv, uv) in corners {
                let position = (normal + u * su + v * sv) * half;
                self.add_vertex(position, normal, uv, color, transform);
            }
            self.add_polygon(vec![first, first + 1, first + 2, first + 3]);
        }
    }

    /// Computes every polygon's normal from its first three corners and
    /// writes it to the polygon's vertices.
    pub fn compute_face_normals(&mut self) {
        for polygon in &mut self.polygons {
            let [a, b, c] = match polygon.vertices.as_slice() {
                [a, b, c, ..] => [*a, *b, *c],
                _ => continue,
            };
            let p0 = self.vertices[a as usize].position;
            let p1 = self.vertices[b as usize].position;
            let p2 = self.vertices[c as usize].position;
            polygon.normal = (p1 - p0).cross(p2 - p0).normalize();

            for &index in &polygon.vertices {
                self.vertices[index as usize].normal = polygon.normal;
            }
        }
    }

    /// Splits every polygon with more than three corners into a triangle fan.
    pub fn triangulate_polygons(&mut self) {
        let mut triangles = Vec::with_capacity(self.polygons.len() * 2);
        for polygon in self.polygons.drain(..) {
            if polygon.vertices.len() < 3 {
                continue;
            }
            let first = polygon.vertices[0];
            for pair in polygon.vertices[1..].windows(2) {
                triangles.push(GeometryPolygon {
                    vertices: vec![first, pair[0], pair[1]],
                    normal: polygon.normal,
                });
            }
        }
        self.polygons = triangles;
    }

    /// Computes per-vertex tangents aligned with the +U texture direction.
    ///
    /// Tangents are orthogonalized against the vertex normal. Vertices with
    /// degenerate texture mapping get an arbitrary tangent perpendicular to
    /// the normal.
    pub fn compute_tangents(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.vertices.len()];

        for polygon in &self.polygons {
            if polygon.vertices.len() < 3 {
                continue;
            }
            let first = polygon.vertices[0] as usize;
            for pair in polygon.vertices[1..].windows(2) {
                let ids = [first, pair[0] as usize, pair[1] as usize];
                let [v0, v1, v2] = ids.map(|i| &self.vertices[i]);

                let e1 = v1.position - v0.position;
                let e2 = v2.position - v0.position;
                let d1 = v1.tex_coord - v0.tex_coord;
                let d2 = v2.tex_coord - v0.tex_coord;

                let det = d1.x * d2.y - d2.x * d1.y;
                if det.abs() < EPSILON {
                    continue;
                }
                let tangent = (e1 * d2.y - e2 * d1.y) * (1.0 / det);
                for i in ids {
                    accumulated[i] += tangent;
                }
            }
        }

        for (vertex, tangent) in self.vertices.iter_mut().zip(accumulated) {
            let n = vertex.normal;
            let t = (tangent - n * n.dot(tangent)).normalize();
            vertex.tangent = if t == Vec3::ZERO {
                any_perpendicular(n)
            } else {
                t
            };
        }
    }
}

fn any_perpendicular(n: Vec3) -> Vec3 {
    let helper = if n.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    n.cross(helper).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn processed_box(size: Vec3, transform: &Mat4) -> Geometry {
        let mut geom = Geometry::new();
        geom.add_textured_box(size, LinearRgba::WHITE, transform);
        geom.compute_face_normals();
        geom.triangulate_polygons();
        geom.compute_tangents();
        geom
    }

    #[test]
    fn test_box_counts() {
        let geom = processed_box(Vec3::ONE, &Mat4::IDENTITY);
        assert_eq!(geom.vertices.len(), 24);
        assert_eq!(geom.polygons.len(), 12);
        assert!(geom.polygons.iter().all(|p| p.vertices.len() == 3));
    }

    #[test]
    fn test_box_faces_point_outwards() {
        let geom = processed_box(Vec3::new(2.0, 1.0, 3.0), &Mat4::IDENTITY);
        for polygon in &geom.polygons {
            let centroid = polygon
                .vertices
                .iter()
                .fold(Vec3::ZERO, |acc, &i| acc + geom.vertices[i as usize].position)
                * (1.0 / 3.0);
            assert!(polygon.normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_box_extents_follow_transform() {
        let offset = Vec3::new(0.5, 0.0, -1.0);
        let geom = processed_box(Vec3::new(2.0, 4.0, 6.0), &Mat4::from_translation(offset));
        let points: Vec<Vec3> = geom.vertices.iter().map(|v| v.position).collect();
        let bounds = crate::math::Aabb::from_points(&points).unwrap();
        assert_eq!(bounds.min, Vec3::new(-0.5, -2.0, -4.0));
        assert_eq!(bounds.max, Vec3::new(1.5, 2.0, 2.0));
    }

    #[test]
    fn test_tangents_follow_u_direction() {
        let geom = processed_box(Vec3::ONE, &Mat4::IDENTITY);
        for vertex in &geom.vertices {
            assert_abs_diff_eq!(vertex.tangent.dot(vertex.normal), 0.0, epsilon = 1e-5);
            assert_abs_diff_eq!(vertex.tangent.length(), 1.0, epsilon = 1e-5);
        }
        // The +Z face is the fifth face; its U axis is +X.
        let front = &geom.vertices[16];
        assert_eq!(front.normal, Vec3::Z);
        assert_abs_diff_eq!(front.tangent.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_triangulate_skips_degenerate_polygons() {
        let mut geom = Geometry::new();
        for p in [Vec3::ZERO, Vec3::X, Vec3::Y] {
            geom.add_vertex(p, Vec3::Z, Vec2::new(0.0, 0.0), LinearRgba::WHITE, &Mat4::IDENTITY);
        }
        geom.add_polygon(vec![0, 1]);
        geom.add_polygon(vec![0, 1, 2]);
        geom.triangulate_polygons();
        assert_eq!(geom.polygons.len(), 1);
    }
}
