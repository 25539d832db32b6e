use crate::scene::background::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Plane { width: f32, height: f32 },
    /// A primitive owned by an imported model; the name is the source mesh name.
    Imported(String),
}

/// How a material responds to light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    Physical,
    /// Invisible except where shadows fall on it
    ShadowOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub roughness: f32,
    pub transmission: f32,
    pub ior: f32,
    pub thickness: f32,
    pub env_map_intensity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            shading: Shading::Physical,
            color: Color::from_hex(0xffffff),
            opacity: 1.0,
            transparent: false,
            roughness: 1.0,
            transmission: 0.0,
            ior: 1.5,
            thickness: 0.0,
            env_map_intensity: 1.0,
        }
    }
}

impl Material {
    #[must_use]
    pub fn shadow_only(color: Color, opacity: f32) -> Self {
        Self {
            shading: Shading::ShadowOnly,
            color,
            opacity,
            transparent: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}
