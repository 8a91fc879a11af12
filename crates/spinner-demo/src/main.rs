use anyhow::Result;
use winit::dpi::LogicalSize;

use spinner_engine::core::{App, AppControl, FrameCtx};
use spinner_engine::device::GpuInit;
use spinner_engine::input::Key;
use spinner_engine::logging::{init_logging, LoggingConfig};
use spinner_engine::math::Vec4;
use spinner_engine::render::triangle::{mvp_for_frame, spin_angle};
use spinner_engine::render::TriangleRenderer;
use spinner_engine::window::{Runtime, RuntimeConfig};

/// Angular speed of the triangle.
const RADIANS_PER_SEC: f64 = 1.0;

struct SpinningTriangle {
    renderer: TriangleRenderer,
    clear: Vec4,
}

impl SpinningTriangle {
    fn new() -> Self {
        Self {
            renderer: TriangleRenderer::new(),
            clear: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

impl App for SpinningTriangle {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.pressed(Key::Escape) {
            log::info!("escape pressed, closing");
            return AppControl::Exit;
        }

        let angle = spin_angle(ctx.time.elapsed, RADIANS_PER_SEC);
        let renderer = &mut self.renderer;

        ctx.render(self.clear, |rctx, target| match mvp_for_frame(rctx.aspect, angle) {
            Ok(mvp) => renderer.render(rctx, target, &mvp),
            Err(err) => log::debug!("triangle skipped: {err}"),
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Spinning Triangle".to_string(),
        initial_size: LogicalSize::new(640.0, 480.0),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), SpinningTriangle::new())
}
