use crate::scene::background::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct ShadowConfig {
    pub near: f32,
    pub far: f32,
    pub bias: f32,
    pub normal_bias: f32,
    pub map_size: u32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            near: 0.5,
            far: 500.0,
            bias: 0.0,
            normal_bias: 0.0,
            map_size: 512,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    Directional,
    /// `distance` of 0 means unlimited range
    Point { distance: f32, decay: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub color: Color,
    pub intensity: f32,
    pub kind: LightKind,

    pub cast_shadows: bool,
    pub shadow: Option<ShadowConfig>,
}

impl Light {
    #[must_use]
    pub fn new_directional(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional,
            cast_shadows: false,
            shadow: None,
        }
    }

    #[must_use]
    pub fn new_point(color: Color, intensity: f32, distance: f32, decay: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Point { distance, decay },
            cast_shadows: false,
            shadow: None,
        }
    }

    #[must_use]
    pub fn with_shadows(mut self, config: ShadowConfig) -> Self {
        self.cast_shadows = true;
        self.shadow = Some(config);
        self
    }
}
