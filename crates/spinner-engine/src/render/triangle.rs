//! Single colored triangle spun about +Z.

use std::f64::consts::TAU;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::math::{Mat4, OrthoError, Vec2, Vec3};
use crate::render::{RenderCtx, RenderTarget};

/// Vertex layout (20 bytes):
///
///  offset  0  pos  [f32; 2]   loc 0
///  offset  8  col  [f32; 3]   loc 1
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub col: [f32; 3],
}

impl Vertex {
    #[inline]
    pub const fn new(pos: Vec2, col: Vec3) -> Self {
        Self { pos: pos.to_array(), col: col.to_array() }
    }

    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x3  // col
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Red, green and blue corners, counter-clockwise.
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex::new(Vec2::new(-0.6, -0.4), Vec3::new(1.0, 0.0, 0.0)),
    Vertex::new(Vec2::new(0.6, -0.4), Vec3::new(0.0, 1.0, 0.0)),
    Vertex::new(Vec2::new(0.0, 0.6), Vec3::new(0.0, 0.0, 1.0)),
];

/// `Projection * Rotation` for one frame.
///
/// The projection keeps the unit height and stretches the horizontal extent
/// to `[-aspect, aspect]` so the triangle is never distorted.
pub fn mvp_for_frame(aspect: f32, angle: f32) -> Result<Mat4, OrthoError> {
    let projection = Mat4::try_orthographic(-aspect, aspect, -1.0, 1.0, 1.0, -1.0)?;
    let model = Mat4::identity().rotate_z(angle);
    Ok(projection * model)
}

/// Rotation angle after `elapsed_secs` at `radians_per_sec`, wrapped into `[0, 2π)`.
///
/// Wrapping happens in `f64` so the `f32` angle keeps full precision on long runs.
/// A remainder that rounds up to 2π in `f32` is folded back to 0.
pub fn spin_angle(elapsed_secs: f64, radians_per_sec: f64) -> f32 {
    let angle = (elapsed_secs * radians_per_sec).rem_euclid(TAU) as f32;
    if angle >= std::f32::consts::TAU { 0.0 } else { angle }
}

/// Renderer for [`TRIANGLE_VERTICES`].
///
/// GPU objects are created lazily on first use and rebuilt if the surface
/// format changes.
#[derive(Default)]
pub struct TriangleRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    mvp_ubo: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,
}

impl TriangleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `mvp` and records one three-vertex draw into `target`.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, mvp: &Mat4) {
        self.ensure_pipeline(ctx);
        self.ensure_vertex_buffer(ctx);
        self.ensure_bindings(ctx);

        let Some(ubo) = self.mvp_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(mvp));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("spinner triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..TRIANGLE_VERTICES.len() as u32, 0..1);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        log::debug!("building triangle pipeline for {:?}", ctx.surface_format);

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("spinner triangle shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/triangle.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("spinner triangle bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(MVP_SIZE),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("spinner triangle pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("spinner triangle pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.mvp_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.mvp_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let mvp_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("spinner triangle mvp ubo"),
            size: MVP_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("spinner triangle bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: mvp_ubo.as_entire_binding(),
            }],
        });

        self.mvp_ubo = Some(mvp_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_vertex_buffer(&mut self, ctx: &RenderCtx<'_>) {
        if self.vbo.is_some() {
            return;
        }

        self.vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spinner triangle vbo"),
            contents: bytemuck::cast_slice(&TRIANGLE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }
}

const MVP_SIZE: u64 = std::mem::size_of::<Mat4>() as u64;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{OrthoAxis, Vec4};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn vertex_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(layout.attributes[1].shader_location, 1);
    }

    #[test]
    fn vertices_are_counter_clockwise() {
        let [a, b, c] = TRIANGLE_VERTICES.map(|v| Vec2::new(v.pos[0], v.pos[1]));
        let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
        assert!(cross > 0.0);
    }

    #[test]
    fn square_surface_at_rest_is_identity() {
        assert_eq!(mvp_for_frame(1.0, 0.0).unwrap(), Mat4::identity());
    }

    #[test]
    fn wide_surface_squeezes_x() {
        let m = mvp_for_frame(2.0, 0.0).unwrap();
        assert_eq!(m[(0, 0)], 0.5);
        assert_eq!(m[(1, 1)], 1.0);
        assert_eq!(m[(3, 0)], 0.0);
    }

    #[test]
    fn quarter_turn_moves_apex_left() {
        let m = mvp_for_frame(1.0, FRAC_PI_2).unwrap();
        let apex = TRIANGLE_VERTICES[2].pos;
        let p = m * Vec4::from_point2(Vec2::new(apex[0], apex[1]));
        assert!((p.x + 0.6).abs() < 1e-6, "{p:?}");
        assert!(p.y.abs() < 1e-6, "{p:?}");
        assert_eq!(p.w, 1.0);
    }

    #[test]
    fn collapsed_surface_is_rejected() {
        let err = mvp_for_frame(0.0, 1.0).unwrap_err();
        assert_eq!(err.axis, OrthoAxis::X);
        assert!(mvp_for_frame(f32::INFINITY, 1.0).is_err());
    }

    #[test]
    fn spin_angle_wraps() {
        assert_eq!(spin_angle(0.0, 1.0), 0.0);
        assert!((spin_angle(1.5, 1.0) - 1.5).abs() < 1e-6);
        let wrapped = spin_angle(TAU * 1000.0 + 0.25, 1.0);
        assert!((wrapped - 0.25).abs() < 1e-4, "{wrapped}");
        let backwards = spin_angle(1.0, -1.0);
        assert!((backwards as f64 - (TAU - 1.0)).abs() < 1e-6);
    }

    #[test]
    fn spin_angle_never_reaches_full_turn() {
        let just_below = TAU - 1e-9;
        assert_eq!(just_below as f32, std::f32::consts::TAU);
        assert_eq!(spin_angle(just_below, 1.0), 0.0);
        assert!(spin_angle(-1e-12, 1.0) < std::f32::consts::TAU);
    }
}
