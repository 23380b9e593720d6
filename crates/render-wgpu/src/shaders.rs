use rubik_render::ShaderSources;

/// Entry point of [`VERTEX_SHADER`].
pub(crate) const VERTEX_ENTRY: &str = "vs_main";
/// Entry point of [`FRAGMENT_SHADER`].
pub(crate) const FRAGMENT_ENTRY: &str = "fs_main";

/// WGSL vertex stage: per-vertex color, model/view/projection transform.
pub const VERTEX_SHADER: &str = r#"
struct Uniforms {
    model: mat4x4<f32>,
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.projection * uniforms.view * uniforms.model
        * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}
"#;

/// WGSL fragment stage: passes the interpolated vertex color through.
pub const FRAGMENT_SHADER: &str = r#"
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {
    return color;
}
"#;

pub const SHADERS: ShaderSources<'static> = ShaderSources {
    vertex: VERTEX_SHADER,
    fragment: FRAGMENT_SHADER,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_points_exist() {
        assert!(VERTEX_SHADER.contains(&format!("fn {VERTEX_ENTRY}(")));
        assert!(FRAGMENT_SHADER.contains(&format!("fn {FRAGMENT_ENTRY}(")));
    }

    #[test]
    fn stages_agree_on_color_location() {
        assert!(VERTEX_SHADER.contains("@location(0) color: vec4<f32>"));
        assert!(FRAGMENT_SHADER.contains("@location(0) color: vec4<f32>"));
    }
}
