/// WGSL shader for instanced screen-space shapes and sprites.
///
/// Each instance is a quad generated from `vertex_index`; the fragment stage
/// carves circles and outlines out of it by discarding pixels.
pub const SHAPE_SHADER: &str = r#"
struct Screen {
    // width, height, srgb target flag, unused
    size: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> screen: Screen;

@group(1) @binding(0)
var atlas: texture_2d<f32>;
@group(1) @binding(1)
var atlas_sampler: sampler;

struct InstanceInput {
    @location(0) rect: vec4<f32>,
    @location(1) color: vec4<f32>,
    @location(2) uv: vec4<f32>,
    @location(3) params: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) uv_rect: vec4<f32>,
    @location(3) params: vec4<f32>,
    @location(4) size: vec2<f32>,
};

@vertex
fn vs_shape(@builtin(vertex_index) index: u32, instance: InstanceInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(0.0, 0.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(1.0, 1.0),
    );
    let corner = corners[index];
    let pixel = instance.rect.xy + corner * instance.rect.zw;
    let ndc = vec2<f32>(
        pixel.x / screen.size.x * 2.0 - 1.0,
        1.0 - pixel.y / screen.size.y * 2.0,
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(ndc, 0.0, 1.0);
    out.local = corner;
    out.color = instance.color;
    out.uv_rect = instance.uv;
    out.params = instance.params;
    out.size = instance.rect.zw;
    return out;
}

fn to_target(c: vec4<f32>) -> vec4<f32> {
    if (screen.size.z > 0.5) {
        return vec4<f32>(pow(c.rgb, vec3<f32>(2.2)), c.a);
    }
    return c;
}

@fragment
fn fs_shape(in: VertexOutput) -> @location(0) vec4<f32> {
    let kind = u32(in.params.x + 0.5);
    let width = in.params.y;
    let p = in.local * in.size;
    let texel = textureSampleLevel(
        atlas,
        atlas_sampler,
        mix(in.uv_rect.xy, in.uv_rect.zw, in.local),
        0.0,
    );

    switch kind {
        case 1u: {
            let edge = min(min(p.x, p.y), min(in.size.x - p.x, in.size.y - p.y));
            if (edge > width) {
                discard;
            }
        }
        case 2u: {
            let r = in.size.x * 0.5;
            if (distance(p, in.size * 0.5) > r) {
                discard;
            }
        }
        case 3u: {
            let r = in.size.x * 0.5;
            let d = distance(p, in.size * 0.5);
            if (d > r || d < r - width) {
                discard;
            }
        }
        case 4u: {
            if (texel.a < 0.01) {
                discard;
            }
            return texel;
        }
        default: {}
    }
    return to_target(in.color);
}
"#;
