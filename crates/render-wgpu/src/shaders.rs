/// WGSL shader emulating the fixed-function pipeline: per-vertex lighting
/// with up to eight directional/point lights, one material, optional texture
/// modulation. `vs_cube` feeds the position+normal cube, `vs_textured` the
/// helper box with texture coordinates.
pub const SCENE_SHADER: &str = r#"
const MAX_LIGHTS: u32 = 8u;
const KIND_DIRECTIONAL: u32 = 0u;

struct Light {
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
    position: vec4<f32>,
    direction: vec4<f32>,
    attenuation: vec4<f32>,
    kind: u32,
    enabled: u32,
    _pad0: u32,
    _pad1: u32,
};

struct FrameUniforms {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    material_ambient: vec4<f32>,
    material_diffuse: vec4<f32>,
    material_specular: vec4<f32>,
    material_emissive: vec4<f32>,
    params: vec4<f32>,
    lights: array<Light, 8>,
};

struct DrawUniforms {
    world: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    flags: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniforms;

@group(1) @binding(0)
var<uniform> draw: DrawUniforms;

@group(2) @binding(0)
var t_diffuse: texture_2d<f32>;
@group(2) @binding(1)
var s_diffuse: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) uv: vec2<f32>,
};

fn light_vertex(world_pos: vec3<f32>, normal: vec3<f32>) -> vec4<f32> {
    var n = (draw.normal_matrix * vec4<f32>(normal, 0.0)).xyz;
    if (frame.params.y > 0.5) {
        n = normalize(n);
    }
    let to_eye = normalize(frame.eye.xyz - world_pos);

    var color = frame.material_emissive.rgb;
    for (var i = 0u; i < MAX_LIGHTS; i = i + 1u) {
        let light = frame.lights[i];
        if (light.enabled == 0u) {
            continue;
        }

        var l: vec3<f32>;
        var atten = 1.0;
        if (light.kind == KIND_DIRECTIONAL) {
            l = normalize(-light.direction.xyz);
        } else {
            let to_light = light.position.xyz - world_pos;
            let d = length(to_light);
            if (d > light.attenuation.w) {
                continue;
            }
            l = to_light / max(d, 0.000001);
            atten = 1.0 / (light.attenuation.x
                + light.attenuation.y * d
                + light.attenuation.z * d * d);
        }

        let ndotl = max(dot(n, l), 0.0);
        var term = frame.material_ambient.rgb * light.ambient.rgb
            + frame.material_diffuse.rgb * light.diffuse.rgb * ndotl;
        if (frame.params.z > 0.5 && ndotl > 0.0) {
            let h = normalize(l + to_eye);
            let spec = pow(max(dot(n, h), 0.0), frame.params.x);
            term = term + frame.material_specular.rgb * light.specular.rgb * spec;
        }
        color = color + term * atten;
    }
    return vec4<f32>(clamp(color, vec3<f32>(0.0), vec3<f32>(1.0)), frame.material_diffuse.a);
}

@vertex
fn vs_cube(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
) -> VertexOutput {
    let world_pos = draw.world * vec4<f32>(position, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * world_pos;
    out.color = light_vertex(world_pos.xyz, normal);
    out.uv = vec2<f32>(0.0, 0.0);
    return out;
}

@vertex
fn vs_textured(
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
) -> VertexOutput {
    let world_pos = draw.world * vec4<f32>(position, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * world_pos;
    out.color = light_vertex(world_pos.xyz, normal);
    out.uv = uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(t_diffuse, s_diffuse, in.uv);
    if (draw.flags.x > 0.5) {
        return in.color * texel;
    }
    return in.color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_points_present() {
        for entry in ["fn vs_cube", "fn vs_textured", "fn fs_main"] {
            assert!(SCENE_SHADER.contains(entry), "missing {entry}");
        }
    }

    #[test]
    fn light_array_matches_host() {
        let declared = format!("array<Light, {}>", crate::uniforms::MAX_LIGHTS);
        assert!(SCENE_SHADER.contains(&declared));
    }
}
