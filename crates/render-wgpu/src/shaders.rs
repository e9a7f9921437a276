/// WGSL shader for lit box instances.
pub const STORE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) world_pos: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.world_pos = world_pos.xyz;
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    // Warm ambient plus a key light from above the entrance.
    let ambient = vec3<f32>(1.0, 0.973, 0.882) * 0.8;
    let key_dir = normalize(vec3<f32>(0.0, 30.0, 30.0));
    let diffuse = max(dot(in.world_normal, key_dir), 0.0) * 0.6;
    let dist = distance(uniforms.eye.xyz, in.world_pos);
    let fade = clamp(1.0 - dist / 400.0, 0.6, 1.0);
    let lit = in.color.rgb * (ambient + vec3<f32>(diffuse)) * fade;
    return vec4<f32>(min(lit, vec3<f32>(1.0)), in.color.a);
}
"#;
