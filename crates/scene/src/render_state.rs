use crate::camera::Projection;
use crate::lighting::{Light, Material, RED, WHITE};
use glam::{Vec3, Vec4};

/// Texture filtering mode for one sampler stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    Point,
    #[default]
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerState {
    pub mag: Filter,
    pub min: Filter,
    pub mip: Filter,
}

impl SamplerState {
    pub fn linear() -> Self {
        Self {
            mag: Filter::Linear,
            min: Filter::Linear,
            mip: Filter::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    Wireframe,
    #[default]
    Solid,
}

/// A light slot: the light plus its enable flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSlot {
    pub light: Light,
    pub enabled: bool,
}

/// Everything the fixed-function pipeline needs before a draw, gathered in
/// one value so backends can apply it in a single upload.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub lights: Vec<LightSlot>,
    pub material: Material,
    pub normalize_normals: bool,
    pub specular_enabled: bool,
    pub sampler: SamplerState,
    pub fill_mode: FillMode,
    pub projection: Projection,
    pub clear_color: Vec4,
    pub clear_depth: f32,
}

impl RenderState {
    /// Directional white light plus red point light, yellow material,
    /// normalized normals, no specular, linear filtering, solid fill.
    pub fn lit_scene(width: u32, height: u32) -> Self {
        let directional = Light::Directional {
            direction: Vec3::new(1.0, 0.0, 0.25),
            color: WHITE,
        };
        let point = Light::Point {
            position: Vec3::new(1.0, 1.0, 1.0),
            color: RED,
        };
        Self {
            lights: vec![
                LightSlot {
                    light: directional,
                    enabled: true,
                },
                LightSlot {
                    light: point,
                    enabled: true,
                },
            ],
            material: Material::yellow(),
            normalize_normals: true,
            specular_enabled: false,
            sampler: SamplerState::linear(),
            fill_mode: FillMode::Solid,
            projection: Projection::for_viewport(width, height),
            clear_color: WHITE,
            clear_depth: 1.0,
        }
    }

    pub fn enabled_lights(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter().filter(|s| s.enabled).map(|s| &s.light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::YELLOW;

    #[test]
    fn lit_scene_defaults() {
        let state = RenderState::lit_scene(640, 480);
        assert_eq!(state.lights.len(), 2);
        assert_eq!(state.enabled_lights().count(), 2);
        assert!(matches!(state.lights[0].light, Light::Directional { .. }));
        assert!(matches!(state.lights[1].light, Light::Point { .. }));
        assert!(state.normalize_normals);
        assert!(!state.specular_enabled);
        assert_eq!(state.material.diffuse, YELLOW);
        assert_eq!(state.sampler, SamplerState::linear());
        assert_eq!(state.fill_mode, FillMode::Solid);
        assert_eq!(state.clear_color, WHITE);
        assert_eq!(state.clear_depth, 1.0);
    }

    #[test]
    fn disabled_slot_is_skipped() {
        let mut state = RenderState::lit_scene(640, 480);
        state.lights[1].enabled = false;
        let lights: Vec<_> = state.enabled_lights().collect();
        assert_eq!(lights.len(), 1);
        assert!(matches!(lights[0], Light::Directional { .. }));
    }
}
