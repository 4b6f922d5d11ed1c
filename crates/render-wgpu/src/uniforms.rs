use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use spincube_scene::{DrawItem, FramePlan, Light};

/// Light slots available to the shader.
pub const MAX_LIGHTS: usize = 8;

const KIND_DIRECTIONAL: u32 = 0;
const KIND_POINT: u32 = 1;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub position: [f32; 4],
    pub direction: [f32; 4],
    /// Constant, linear, quadratic attenuation and range.
    pub attenuation: [f32; 4],
    pub kind: u32,
    pub enabled: u32,
    pub _pad: [u32; 2],
}

impl GpuLight {
    fn pack(light: &Light, enabled: bool) -> Self {
        let (kind, position, direction) = match *light {
            Light::Directional { direction, .. } => {
                (KIND_DIRECTIONAL, Vec4::ZERO, direction.extend(0.0))
            }
            Light::Point { position, .. } => (KIND_POINT, position.extend(1.0), Vec4::ZERO),
        };
        let range = light.range();
        Self {
            ambient: light.ambient().to_array(),
            diffuse: light.diffuse().to_array(),
            specular: light.specular().to_array(),
            position: position.to_array(),
            direction: direction.to_array(),
            // WGSL has no infinity literal; a huge range behaves the same.
            attenuation: light
                .attenuation()
                .extend(if range.is_finite() { range } else { f32::MAX })
                .to_array(),
            kind,
            enabled: enabled as u32,
            _pad: [0; 2],
        }
    }
}

/// Per-frame state: camera, material, render flags and lights.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub material_ambient: [f32; 4],
    pub material_diffuse: [f32; 4],
    pub material_specular: [f32; 4],
    pub material_emissive: [f32; 4],
    /// Specular power, normalize normals, specular enabled, unused.
    pub params: [f32; 4],
    pub lights: [GpuLight; MAX_LIGHTS],
}

fn flag(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}

impl FrameUniforms {
    pub fn from_plan(plan: &FramePlan) -> Self {
        let state = &plan.state;
        let mut lights = [GpuLight::zeroed(); MAX_LIGHTS];
        if state.lights.len() > MAX_LIGHTS {
            tracing::warn!(
                count = state.lights.len(),
                "only the first {MAX_LIGHTS} lights are uploaded"
            );
        }
        for (dst, slot) in lights.iter_mut().zip(&state.lights) {
            *dst = GpuLight::pack(&slot.light, slot.enabled);
        }
        let m = &state.material;
        Self {
            view_proj: plan.view_projection().to_cols_array_2d(),
            eye: plan.eye.extend(1.0).to_array(),
            material_ambient: m.ambient.to_array(),
            material_diffuse: m.diffuse.to_array(),
            material_specular: m.specular.to_array(),
            material_emissive: m.emissive.to_array(),
            params: [
                m.power,
                flag(state.normalize_normals),
                flag(state.specular_enabled),
                0.0,
            ],
            lights,
        }
    }
}

/// Per-draw transform and texture flag.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct DrawUniforms {
    pub world: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// x: texture modulates this draw.
    pub flags: [f32; 4],
}

impl DrawUniforms {
    pub fn from_item(item: &DrawItem, texture_bound: bool) -> Self {
        let normal = normal_matrix(item.world);
        Self {
            world: item.world.to_cols_array_2d(),
            normal_matrix: normal.to_cols_array_2d(),
            flags: [flag(item.textured && texture_bound), 0.0, 0.0, 0.0],
        }
    }
}

fn normal_matrix(world: Mat4) -> Mat4 {
    if world.determinant().abs() <= f32::EPSILON {
        return world;
    }
    world.inverse().transpose()
}

/// Round `size` up to the device's dynamic-offset alignment.
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use spincube_scene::{MeshKind, Scene, SceneConfig};
    use std::path::PathBuf;

    fn plan() -> FramePlan {
        Scene::setup(&SceneConfig {
            texture_path: PathBuf::from("/nonexistent.jpg"),
            ..SceneConfig::default()
        })
        .unwrap()
        .frame()
    }

    #[test]
    fn layouts_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<GpuLight>(), 112);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<DrawUniforms>() % 16, 0);
    }

    #[test]
    fn packs_scene_lights() {
        let u = FrameUniforms::from_plan(&plan());
        assert_eq!(u.lights[0].kind, KIND_DIRECTIONAL);
        assert_eq!(u.lights[0].enabled, 1);
        assert_eq!(u.lights[0].direction, [1.0, 0.0, 0.25, 0.0]);
        assert_eq!(u.lights[1].kind, KIND_POINT);
        assert_eq!(u.lights[1].position, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(u.lights[1].diffuse, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(u.lights[1].attenuation, [1.0, 0.0, 0.0, 1000.0]);
        assert!(u.lights[2..].iter().all(|l| l.enabled == 0));
    }

    #[test]
    fn packs_material_and_flags() {
        let u = FrameUniforms::from_plan(&plan());
        assert_eq!(u.material_diffuse, [1.0, 1.0, 0.0, 1.0]);
        assert_eq!(u.material_emissive, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(u.params, [2.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn textured_flag_needs_bound_texture() {
        let item = DrawItem {
            mesh: MeshKind::TexturedBox,
            world: Mat4::IDENTITY,
            textured: true,
        };
        assert_eq!(DrawUniforms::from_item(&item, true).flags[0], 1.0);
        assert_eq!(DrawUniforms::from_item(&item, false).flags[0], 0.0);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let item = DrawItem {
            mesh: MeshKind::Cube,
            world: Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)),
            textured: false,
        };
        let u = DrawUniforms::from_item(&item, false);
        assert_eq!(u.normal_matrix[0][0], 0.5);
        assert_eq!(u.normal_matrix[1][1], 1.0);
    }

    #[test]
    fn stride_rounds_up() {
        assert_eq!(aligned_stride(144, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
    }
}
