//! glTF decoding into GPU-ready mesh data.

use std::path::Path;

use glam::{Mat4, Vec3};
use gltf::mesh::Mode;

use super::mesh::{Bounds, MaterialData, MeshData, ModelData, TextureData, Vertex};
use crate::util::{Error, Result};

/// Decode a glTF/GLB model from raw bytes. Binary (.glb) files carry their
/// buffers inline; a JSON .gltf referencing external files will fail here and
/// should go through [`decode_file`] instead.
pub fn decode_slice(bytes: &[u8]) -> Result<ModelData> {
    let (document, buffers, images) = gltf::import_slice(bytes)?;
    flatten(document, buffers, images)
}

/// Decode a glTF/GLB model from a file, resolving external buffer and image
/// references relative to its directory.
pub fn decode_file(path: &Path) -> Result<ModelData> {
    let (document, buffers, images) = gltf::import(path)?;
    flatten(document, buffers, images)
}

/// Walk the scene's node hierarchy and produce one [`MeshData`] per triangle
/// primitive, with node transforms baked in and world-space bounds computed.
fn flatten(
    document: gltf::Document,
    buffers: Vec<gltf::buffer::Data>,
    images: Vec<gltf::image::Data>,
) -> Result<ModelData> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(Error::EmptyScene)?;

    let mut meshes = Vec::new();
    let mut bounds = Bounds::empty();

    for node in scene.nodes() {
        collect_node(&node, Mat4::IDENTITY, &buffers, &images, &mut meshes, &mut bounds);
    }

    if meshes.is_empty() {
        return Err(Error::EmptyScene);
    }

    log::debug!(
        "decoded glTF: {} primitives, {} vertices",
        meshes.len(),
        meshes.iter().map(|m| m.vertices.len()).sum::<usize>()
    );

    Ok(ModelData { meshes, bounds })
}

fn collect_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
    meshes: &mut Vec<MeshData>,
    bounds: &mut Bounds,
) {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let name = mesh.name().unwrap_or("mesh").to_string();
        for (index, primitive) in mesh.primitives().enumerate() {
            if primitive.mode() != Mode::Triangles {
                continue;
            }
            if let Some(data) = convert_primitive(&primitive, &name, index, transform, buffers, images)
            {
                bounds.merge(&data.bounds);
                meshes.push(data);
            }
        }
    }

    for child in node.children() {
        collect_node(&child, transform, buffers, images, meshes, bounds);
    }
}

fn convert_primitive(
    primitive: &gltf::Primitive,
    mesh_name: &str,
    index: usize,
    transform: Mat4,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
) -> Option<MeshData> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| &b.0[..]));

    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(|n| n.collect());
    let uvs: Option<Vec<[f32; 2]>> = reader
        .read_tex_coords(0)
        .map(|t| t.into_f32().collect());

    let indices: Vec<u32> = match reader.read_indices() {
        Some(iter) => iter.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let mut vertices: Vec<Vertex> = positions
        .iter()
        .enumerate()
        .map(|(i, &position)| Vertex {
            position,
            normal: normals.as_ref().map(|n| n[i]).unwrap_or([0.0; 3]),
            uv: uvs.as_ref().map(|t| t[i]).unwrap_or([0.0; 2]),
        })
        .collect();

    if normals.is_none() {
        accumulate_face_normals(&mut vertices, &indices);
    }

    let mut bounds = Bounds::empty();
    for v in &vertices {
        bounds.expand(transform.transform_point3(Vec3::from(v.position)));
    }

    Some(MeshData {
        name: format!("{}/{}", mesh_name, index),
        vertices,
        indices,
        transform,
        material: convert_material(&primitive.material(), images),
        bounds,
    })
}

fn convert_material(material: &gltf::Material, images: &[gltf::image::Data]) -> MaterialData {
    let pbr = material.pbr_metallic_roughness();
    MaterialData {
        base_color: pbr.base_color_factor(),
        metallic: pbr.metallic_factor(),
        roughness: pbr.roughness_factor(),
        base_color_texture: pbr
            .base_color_texture()
            .and_then(|info| images.get(info.texture().source().index()))
            .and_then(convert_image),
    }
}

/// Expand a decoded glTF image into RGBA8. Unsupported pixel formats are
/// skipped; the renderer falls back to the material's base-color factor.
fn convert_image(image: &gltf::image::Data) -> Option<TextureData> {
    use gltf::image::Format;

    let pixel_count = (image.width * image.height) as usize;
    let rgba8 = match image.format {
        Format::R8G8B8A8 => image.pixels.clone(),
        Format::R8G8B8 => {
            let mut out = Vec::with_capacity(pixel_count * 4);
            for rgb in image.pixels.chunks_exact(3) {
                out.extend_from_slice(rgb);
                out.push(255);
            }
            out
        }
        Format::R8 => {
            let mut out = Vec::with_capacity(pixel_count * 4);
            for &r in &image.pixels {
                out.extend_from_slice(&[r, r, r, 255]);
            }
            out
        }
        other => {
            log::warn!("skipping base color texture with unsupported format {:?}", other);
            return None;
        }
    };

    Some(TextureData {
        width: image.width,
        height: image.height,
        rgba8,
    })
}

/// Area-weighted face normals for primitives that ship without normals.
fn accumulate_face_normals(vertices: &mut [Vertex], indices: &[u32]) {
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = Vec3::from(vertices[a].position);
        let pb = Vec3::from(vertices[b].position);
        let pc = Vec3::from(vertices[c].position);
        let face = (pb - pa).cross(pc - pa);
        for &i in &[a, b, c] {
            let n = Vec3::from(vertices[i].normal) + face;
            vertices[i].normal = n.to_array();
        }
    }
    for v in vertices {
        let n = Vec3::from(v.normal);
        if n.length_squared() > f32::EPSILON {
            v.normal = n.normalize().to_array();
        } else {
            v.normal = [0.0, 1.0, 0.0];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal single-triangle glTF with an embedded base64 buffer:
    // positions (0,0,0) (1,0,0) (0,1,0), indices 0 1 2, node scaled by 2.
    const TRIANGLE_GLTF: &str = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"nodes": [0]}],
        "nodes": [{"mesh": 0, "scale": [2.0, 2.0, 2.0]}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "indices": 1}]}],
        "accessors": [
            {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
             "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
            {"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}
        ],
        "bufferViews": [
            {"buffer": 0, "byteOffset": 0, "byteLength": 36},
            {"buffer": 0, "byteOffset": 36, "byteLength": 6}
        ],
        "buffers": [{
            "byteLength": 42,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIA"
        }]
    }"#;

    #[test]
    fn test_decode_triangle() {
        let model = decode_slice(TRIANGLE_GLTF.as_bytes()).unwrap();
        assert_eq!(model.meshes.len(), 1);

        let mesh = &model.meshes[0];
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);

        // Node scale is baked into the transform, not the vertices
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.transform, Mat4::from_scale(Vec3::splat(2.0)));

        // World-space bounds reflect the scaled triangle
        assert!((model.bounds.max.x - 2.0).abs() < 1e-6);
        assert!((model.bounds.max.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_generates_normals() {
        let model = decode_slice(TRIANGLE_GLTF.as_bytes()).unwrap();
        // No NORMAL attribute: face normal (0,0,1) is generated for all three
        for v in &model.meshes[0].vertices {
            assert!((Vec3::from(v.normal) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_slice(b"not a gltf file").is_err());
    }

    #[test]
    fn test_face_normal_accumulation_degenerate() {
        // Degenerate triangle (zero area) falls back to +Y
        let mut vertices = vec![
            Vertex { position: [0.0; 3], normal: [0.0; 3], uv: [0.0; 2] };
            3
        ];
        accumulate_face_normals(&mut vertices, &[0, 1, 2]);
        for v in &vertices {
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }
}
