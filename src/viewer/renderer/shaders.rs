//! Embedded WGSL shaders for the scene pass and the chromatic shift pass.

/// Forward pass: environment-lit PBR with ACES filmic output.
pub const SCENE_SHADER: &str = r#"
const PI: f32 = 3.141592653589793;

struct Camera {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    // xyz = eye position, w = exposure
    position_exposure: vec4<f32>,
}

struct Model {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
}

struct Material {
    base_color: vec4<f32>,
    // metallic, roughness, has_base_texture, unused
    params: vec4<f32>,
}

struct EnvParams {
    intensity: f32,
    rotation: f32,
    enabled: f32,
    _pad: f32,
}

@group(0) @binding(0) var<uniform> camera: Camera;
@group(1) @binding(0) var<uniform> model: Model;
@group(2) @binding(0) var<uniform> material: Material;
@group(2) @binding(1) var base_color_tex: texture_2d<f32>;
@group(2) @binding(2) var base_color_samp: sampler;
@group(3) @binding(0) var env_map: texture_2d<f32>;
@group(3) @binding(1) var env_sampler: sampler;
@group(3) @binding(2) var<uniform> env: EnvParams;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = model.model * vec4<f32>(in.position, 1.0);
    out.position = camera.view_proj * world;
    out.world_pos = world.xyz;
    out.world_normal = (model.normal * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

fn dir_to_equirect_uv(dir: vec3<f32>, rotation: f32) -> vec2<f32> {
    let d = normalize(dir);
    let phi = atan2(d.z, d.x) + rotation;
    let theta = acos(clamp(d.y, -1.0, 1.0));
    let u = (phi + PI) / (2.0 * PI);
    let v = theta / PI;
    return vec2<f32>(u, v);
}

fn sample_env(dir: vec3<f32>) -> vec3<f32> {
    let uv = dir_to_equirect_uv(dir, env.rotation);
    return textureSampleLevel(env_map, env_sampler, uv, 0.0).rgb;
}

// ACES filmic curve (Narkowicz fit)
fn aces_tonemap(x: vec3<f32>) -> vec3<f32> {
    let a = 2.51;
    let b = 0.03;
    let c = 2.43;
    let d = 0.59;
    let e = 0.14;
    return clamp((x * (a * x + b)) / (x * (c * x + d) + e), vec3<f32>(0.0), vec3<f32>(1.0));
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(in.world_normal);
    let v = normalize(camera.position_exposure.xyz - in.world_pos);

    let tex = textureSample(base_color_tex, base_color_samp, in.uv);
    let base = material.base_color * mix(vec4<f32>(1.0), tex, material.params.z);
    let metallic = material.params.x;
    let roughness = material.params.y;

    let irradiance = sample_env(n);
    let reflection = sample_env(reflect(-v, n));
    let f0 = mix(vec3<f32>(0.04), base.rgb, metallic);
    let ndotv = max(dot(n, v), 0.0);
    let fresnel = f0 + (vec3<f32>(1.0) - f0) * pow(1.0 - ndotv, 5.0);

    let diffuse = base.rgb * (1.0 - metallic) * irradiance;
    let specular = reflection * mix(fresnel, f0, roughness);
    let lit = (diffuse + specular) * env.intensity;

    // Dim ambient floor keeps the model visible until the environment resolves
    let unlit = base.rgb * 0.04;
    let color = mix(unlit, lit, env.enabled);

    let exposure = camera.position_exposure.w;
    return vec4<f32>(aces_tonemap(color * exposure), base.a);
}
"#;

/// Full-screen chromatic shift: offsets the red and blue channels along a
/// fixed direction by a small uv-space amount.
pub const RGB_SHIFT_SHADER: &str = r#"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_fullscreen(@builtin(vertex_index) index: u32) -> VsOut {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0)
    );
    let pos = positions[index];
    var out: VsOut;
    out.pos = vec4<f32>(pos, 0.0, 1.0);
    out.uv = vec2<f32>(pos.x * 0.5 + 0.5, 1.0 - (pos.y * 0.5 + 0.5));
    return out;
}

struct ShiftParams {
    // amount, angle, unused, unused
    amount_angle: vec4<f32>,
}

@group(0) @binding(0) var scene_tex: texture_2d<f32>;
@group(0) @binding(1) var samp: sampler;
@group(0) @binding(2) var<uniform> shift: ShiftParams;

@fragment
fn fs_shift(in: VsOut) -> @location(0) vec4<f32> {
    let amount = shift.amount_angle.x;
    let angle = shift.amount_angle.y;
    let offset = amount * vec2<f32>(cos(angle), sin(angle));
    let cr = textureSample(scene_tex, samp, in.uv + offset);
    let cga = textureSample(scene_tex, samp, in.uv);
    let cb = textureSample(scene_tex, samp, in.uv - offset);
    return vec4<f32>(cr.r, cga.g, cb.b, cga.a);
}
"#;
