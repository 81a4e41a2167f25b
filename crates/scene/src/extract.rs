//! Conversion from Bevy meshes and transforms into density inputs.

use bevy::mesh::{Indices, PrimitiveTopology, VertexAttributeValues};
use bevy::prelude::*;
use texel_density::TexturedMesh;
use texel_density::glam::{DMat4, DVec2, DVec3};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Mesh has no position attribute")]
    NoPositions,

    #[error("Unsupported primitive topology: {0:?}")]
    UnsupportedTopology(PrimitiveTopology),

    #[error("Index count {0} is not divisible by 3")]
    InvalidIndexCount(usize),
}

/// Object-to-world matrix in double precision
pub fn world_matrix(transform: &GlobalTransform) -> DMat4 {
    let matrix = Mat4::from(transform.affine());
    DMat4::from_cols_array(&matrix.to_cols_array().map(f64::from))
}

/// Build a [`TexturedMesh`] from a triangle-list mesh.
///
/// `ATTRIBUTE_UV_0` becomes the active UV layer. A mesh without it converts
/// fine; the estimate then reports a missing UV map. Non-indexed meshes are
/// read as consecutive vertex triples.
pub fn textured_mesh_from_bevy(
    mesh: &Mesh,
    transform: &GlobalTransform,
) -> Result<TexturedMesh, ExtractError> {
    let topology = mesh.primitive_topology();
    if topology != PrimitiveTopology::TriangleList {
        return Err(ExtractError::UnsupportedTopology(topology));
    }

    let positions: Vec<DVec3> = mesh
        .attribute(Mesh::ATTRIBUTE_POSITION)
        .and_then(|attr| attr.as_float3())
        .ok_or(ExtractError::NoPositions)?
        .iter()
        .map(|p| DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64))
        .collect();

    let uvs: Option<Vec<DVec2>> = mesh
        .attribute(Mesh::ATTRIBUTE_UV_0)
        .and_then(|attr| match attr {
            VertexAttributeValues::Float32x2(v) => {
                Some(v.iter().map(|uv| DVec2::new(uv[0] as f64, uv[1] as f64)).collect())
            }
            _ => None,
        });

    let indices: Vec<u32> = match mesh.indices() {
        Some(Indices::U16(idx)) => idx.iter().map(|&i| i as u32).collect(),
        Some(Indices::U32(idx)) => idx.to_vec(),
        None => (0..positions.len() as u32).collect(),
    };

    if indices.len() % 3 != 0 {
        return Err(ExtractError::InvalidIndexCount(indices.len()));
    }

    Ok(TexturedMesh::from_triangles(positions, uvs, &indices)
        .with_world_matrix(world_matrix(transform)))
}
