//! Host-agnostic evaluated mesh with per-corner UV layers.
//!
//! Hosts hand over object-space positions, face loops (vertex indices per
//! face), any number of named UV layers and the object's world matrix.
//! [`TexturedMesh::faces`] turns that into world-space [`Face`]s carrying the
//! active layer's UVs.

use glam::{DMat4, DVec2, DVec3};

use crate::error::EstimateError;
use crate::types::{Face, FaceVertex};

/// One UV set. Holds one UV per face corner, in face-loop order, so seams
/// can give a shared vertex different UVs on different faces.
#[derive(Debug, Clone, PartialEq)]
pub struct UvLayer {
    pub name: String,
    pub uvs: Vec<DVec2>,
}

/// Evaluated mesh as the density pass consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct TexturedMesh {
    /// Object-space vertex positions
    pub positions: Vec<DVec3>,
    /// Vertex indices of each face, in winding order
    pub face_loops: Vec<Vec<u32>>,
    pub uv_layers: Vec<UvLayer>,
    /// Index into `uv_layers`
    pub active_uv_layer: Option<usize>,
    /// Object-to-world transform
    pub world_matrix: DMat4,
}

impl TexturedMesh {
    /// Create a mesh without UVs at the world origin
    pub fn new(positions: Vec<DVec3>, face_loops: Vec<Vec<u32>>) -> Self {
        Self {
            positions,
            face_loops,
            uv_layers: Vec::new(),
            active_uv_layer: None,
            world_matrix: DMat4::IDENTITY,
        }
    }

    /// Build from indexed triangles whose UVs are stored per vertex (GPU
    /// vertex buffer layout). The UVs become the active layer `UVMap`.
    pub fn from_triangles(positions: Vec<DVec3>, uvs: Option<Vec<DVec2>>, indices: &[u32]) -> Self {
        let face_loops: Vec<Vec<u32>> = indices.chunks_exact(3).map(|tri| tri.to_vec()).collect();
        let mesh = Self::new(positions, face_loops);

        match uvs {
            Some(per_vertex) => {
                let per_corner = mesh
                    .face_loops
                    .iter()
                    .flatten()
                    .map(|&index| per_vertex.get(index as usize).copied().unwrap_or(DVec2::ZERO))
                    .collect();
                mesh.with_uv_layer("UVMap", per_corner)
            }
            None => mesh,
        }
    }

    /// Add a UV layer. The first layer added becomes active.
    pub fn with_uv_layer(mut self, name: impl Into<String>, uvs: Vec<DVec2>) -> Self {
        self.uv_layers.push(UvLayer {
            name: name.into(),
            uvs,
        });
        if self.active_uv_layer.is_none() {
            self.active_uv_layer = Some(self.uv_layers.len() - 1);
        }
        self
    }

    pub fn with_active_uv_layer(mut self, index: usize) -> Self {
        self.active_uv_layer = Some(index);
        self
    }

    pub fn with_world_matrix(mut self, world_matrix: DMat4) -> Self {
        self.world_matrix = world_matrix;
        self
    }

    /// Number of face corners (sum of loop lengths)
    pub fn corner_count(&self) -> usize {
        self.face_loops.iter().map(Vec::len).sum()
    }

    pub fn face_count(&self) -> usize {
        self.face_loops.len()
    }

    /// The active UV layer, checked against the corner count.
    pub fn active_uv(&self) -> Result<&UvLayer, EstimateError> {
        let index = self.active_uv_layer.ok_or(EstimateError::NoUvChannel)?;
        let layer = self.uv_layers.get(index).ok_or(EstimateError::NoUvChannel)?;

        let expected = self.corner_count();
        if layer.uvs.len() != expected {
            return Err(EstimateError::InvalidUvLayer {
                layer: layer.name.clone(),
                expected,
                found: layer.uvs.len(),
            });
        }
        Ok(layer)
    }

    /// World-space faces with the active layer's UVs.
    ///
    /// Corners that reference a missing vertex are dropped from their face;
    /// the density pass treats any face left with fewer than three corners
    /// as degenerate.
    pub fn faces(&self) -> Result<impl Iterator<Item = Face> + '_, EstimateError> {
        let uvs = &self.active_uv()?.uvs;

        let mut corner = 0usize;
        Ok(self.face_loops.iter().map(move |face_loop| {
            let first_corner = corner;
            corner += face_loop.len();

            face_loop
                .iter()
                .zip(&uvs[first_corner..corner])
                .filter_map(|(&index, &uv)| {
                    let position = self.positions.get(index as usize)?;
                    Some(FaceVertex::new(self.world_matrix.transform_point3(*position), uv))
                })
                .collect()
        }))
    }
}
