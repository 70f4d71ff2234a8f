use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};

use sill_engine::config::{BackendChoice, EngineSettings, SettingsError};
use sill_engine::event::{Event, Key};
use sill_engine::logging;
use sill_engine::render::{BufferUsage, IndexElement, PrimitiveMode, Program, VertexSource};
use sill_engine::shader;
use sill_engine::window::{App, Control, EngineCtx, Runtime};

const VERT_SRC: &str = include_str!("../shaders/demo.vert");
const FRAG_SRC: &str = include_str!("../shaders/demo.frag");
const SETTINGS_PATH: &str = "sill.json";

fn main() -> Result<()> {
    let settings = load_settings();
    logging::init(settings.log_filter.as_deref());

    let headless = std::env::args().any(|a| a == "--headless")
        || settings.context.backend == BackendChoice::Headless;
    if headless {
        return run_headless(settings);
    }

    Runtime::run(settings, Demo::default())
}

fn load_settings() -> EngineSettings {
    match EngineSettings::load(SETTINGS_PATH) {
        Ok(settings) => settings,
        Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            EngineSettings::default()
        }
        Err(e) => {
            // Logging is not up yet; this has to go to stderr directly.
            eprintln!("ignoring unusable {SETTINGS_PATH}: {e}");
            EngineSettings::default()
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [u8; 4],
}

const CORNERS: [Vertex; 3] = [
    Vertex { position: [0.0, 0.6], color: [235, 90, 70, 255] },
    Vertex { position: [-0.55, -0.4], color: [80, 200, 120, 255] },
    Vertex { position: [0.55, -0.4], color: [70, 120, 235, 255] },
];

const OFFSETS: [[f32; 2]; 5] = [
    [0.0, 0.0],
    [-0.6, 0.55],
    [0.6, 0.55],
    [-0.6, -0.55],
    [0.6, -0.55],
];

const INDICES: [u16; 3] = [0, 1, 2];

struct Scene {
    program: Program,
    triangles: VertexSource,
}

#[derive(Default)]
struct Demo {
    scene: Option<Scene>,
}

impl App for Demo {
    fn init(&mut self, ctx: &mut EngineCtx<'_>) -> Result<()> {
        let vert = shader::inject_defines(VERT_SRC, &[("INSTANCE_SCALE", "0.35")]);
        let program = ctx
            .gfx
            .create_program(&vert, FRAG_SRC)
            .context("demo shader build failed")?;

        let corners = ctx.gfx.create_vertex_buffer(&CORNERS, BufferUsage::Static)?;
        let offsets = ctx.gfx.create_vertex_buffer(&OFFSETS, BufferUsage::Static)?;
        let indices = ctx.gfx.create_index_buffer(&INDICES, BufferUsage::Static)?;

        let mut triangles = VertexSource::new("demo-triangles", PrimitiveMode::Triangles);
        triangles.buffer(corners, "2f 4nu1", &["position", "color"])?;
        triangles.buffer(offsets, "2f/i", &["offset"])?;
        triangles.index_buffer(indices, IndexElement::U16);

        let info = ctx.gfx.driver_info();
        log::info!("driver: {} ({})", info.renderer, info.version);

        self.scene = Some(Scene { program, triangles });
        Ok(())
    }

    fn event(&mut self, _ctx: &mut EngineCtx<'_>, event: &Event) -> Control {
        match event {
            Event::Key { key: Key::Escape, pressed: true, .. } => Control::Exit,
            _ => Control::Continue,
        }
    }

    fn frame(&mut self, ctx: &mut EngineCtx<'_>) -> Control {
        let Some(scene) = self.scene.as_mut() else {
            return Control::Exit;
        };

        let (width, height) = ctx.physical_size();
        ctx.gfx.viewport(width, height);
        ctx.gfx.clear(0.07, 0.08, 0.10, 1.0);

        if let Err(e) = scene
            .triangles
            .draw(ctx.gfx, &scene.program, INDICES.len() as u32, OFFSETS.len() as u32)
        {
            log::error!("draw failed: {e}");
            return Control::Exit;
        }
        Control::Continue
    }
}

/// Off-screen smoke path: acquires an EGL device context, reports the
/// driver, and exercises the buffer/vertex-array layer without a window.
#[cfg(all(unix, not(target_os = "macos")))]
fn run_headless(settings: EngineSettings) -> Result<()> {
    use sill_engine::context::{GlContext, HeadlessContext};
    use sill_engine::render::Gfx;

    let headless = HeadlessContext::new(settings.gl())
        .context("off-screen context acquisition failed")?;
    let mut context = GlContext::Headless(headless);
    let gfx = Gfx::new(&context)?;

    let info = gfx.driver_info();
    println!("vendor:   {}", info.vendor);
    println!("renderer: {}", info.renderer);
    println!("version:  {}", info.version);

    let vert = shader::inject_defines(VERT_SRC, &[("INSTANCE_SCALE", "0.35")]);
    let program = gfx.create_program(&vert, FRAG_SRC)?;

    let corners = gfx.create_vertex_buffer(&CORNERS, BufferUsage::Static)?;
    let offsets = gfx.create_vertex_buffer(&OFFSETS, BufferUsage::Static)?;

    let mut triangles = VertexSource::new("smoke-triangles", PrimitiveMode::Triangles);
    triangles.buffer(corners, "2f 4nu1", &["position", "color"])?;
    triangles.buffer(offsets, "2f/i", &["offset"])?;

    let vao = triangles.instance(&gfx, &program)?;
    for binding in &vao.bindings {
        println!(
            "binding: [{}] -> {:?} (stride {})",
            binding.layout_string(),
            binding.attributes,
            binding.stride(),
        );
    }

    context.release();
    println!("ok");
    Ok(())
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn run_headless(_settings: EngineSettings) -> Result<()> {
    anyhow::bail!("the headless EGL backend is not available on this platform");
}
