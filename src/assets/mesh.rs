//! GPU-ready mesh and material data.

use glam::{Mat4, Vec3};

/// Standard vertex format shared by the asset pipeline and the renderer.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn merge(&mut self, other: &Bounds) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Largest edge length of the box.
    pub fn max_extent(&self) -> f32 {
        let d = self.max - self.min;
        d.x.max(d.y).max(d.z)
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}

/// Decoded base-color texture (always RGBA8).
#[derive(Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba8: Vec<u8>,
}

/// Material factors for one primitive, with an optional base-color texture.
#[derive(Clone)]
pub struct MaterialData {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub base_color_texture: Option<TextureData>,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            metallic: 1.0,
            roughness: 1.0,
            base_color_texture: None,
        }
    }
}

/// One triangulated primitive with its world transform baked from the glTF
/// node hierarchy.
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub transform: Mat4,
    pub material: MaterialData,
    pub bounds: Bounds,
}

/// A fully decoded model: primitives plus combined world-space bounds.
pub struct ModelData {
    pub meshes: Vec<MeshData>,
    pub bounds: Bounds,
}

impl ModelData {
    /// Transform that centers the model at the origin and scales its largest
    /// extent to one unit. Applied on top of each mesh's node transform.
    pub fn normalize_transform(&self) -> Mat4 {
        if !self.bounds.is_valid() {
            return Mat4::IDENTITY;
        }
        let extent = self.bounds.max_extent();
        let scale = if extent > f32::EPSILON {
            1.0 / extent
        } else {
            1.0
        };
        Mat4::from_scale(Vec3::splat(scale)) * Mat4::from_translation(-self.bounds.center())
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.indices.len() / 3).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_vertex_size() {
        // position(12) + normal(12) + uv(8) = 32 bytes
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn test_bounds_expand_merge() {
        let mut b = Bounds::empty();
        assert!(!b.is_valid());
        b.expand(Vec3::new(-1.0, 0.0, 2.0));
        b.expand(Vec3::new(3.0, -2.0, 0.0));
        assert!(b.is_valid());
        assert_eq!(b.center(), Vec3::new(1.0, -1.0, 1.0));
        assert_eq!(b.max_extent(), 4.0);

        let mut other = Bounds::empty();
        other.expand(Vec3::new(0.0, 5.0, 0.0));
        b.merge(&other);
        assert_eq!(b.max.y, 5.0);
    }

    #[test]
    fn test_normalize_centers_and_scales() {
        // Box spanning [2,4] x [0,1] x [-1,1]: center (3, 0.5, 0), extent 2
        let mut bounds = Bounds::empty();
        bounds.expand(Vec3::new(2.0, 0.0, -1.0));
        bounds.expand(Vec3::new(4.0, 1.0, 1.0));
        let model = ModelData {
            meshes: Vec::new(),
            bounds,
        };

        let m = model.normalize_transform();
        // Center maps to origin
        let c = m * Vec4::new(3.0, 0.5, 0.0, 1.0);
        assert!(c.truncate().length() < 1e-6);
        // Largest extent maps to unit size
        let a = m * Vec4::new(2.0, 0.0, -1.0, 1.0);
        let b = m * Vec4::new(4.0, 0.0, -1.0, 1.0);
        assert!(((b - a).truncate().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_degenerate_bounds() {
        // A single point must not produce a NaN/inf scale
        let mut bounds = Bounds::empty();
        bounds.expand(Vec3::ONE);
        let model = ModelData {
            meshes: Vec::new(),
            bounds,
        };
        let m = model.normalize_transform();
        assert!(m.is_finite());

        let empty = ModelData {
            meshes: Vec::new(),
            bounds: Bounds::empty(),
        };
        assert_eq!(empty.normalize_transform(), Mat4::IDENTITY);
    }
}
