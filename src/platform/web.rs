//! wasm32 canvas and pointer glue

use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::config::{BounceConfig, FieldConfig};
use crate::consts::{FRAME_DT, MAX_SUBSTEPS};
use crate::render::{self, Surface};
use crate::sim::{Arena, BounceSim, ParticleField, PixelBuffer, Rgba};

/// Set up logging and panic reporting; call once before creating handles
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// [`Surface`] backed by a 2D canvas context
struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f32,
    height: f32,
}

impl CanvasSurface {
    fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            ctx,
            width: canvas.width() as f32,
            height: canvas.height() as f32,
        })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.width as f64, self.height as f64);
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
    }
}

/// Translate client (viewport) coordinates into surface-local space
fn surface_point(canvas: &HtmlCanvasElement, client_x: f32, client_y: f32) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        client_x - rect.left() as f32,
        client_y - rect.top() as f32,
    )
}

fn parse_config<T: Default + serde::de::DeserializeOwned>(json: &str) -> Result<T, JsValue> {
    if json.is_empty() {
        Ok(T::default())
    } else {
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// Fixed-step accumulator shared by both handles
struct FrameClock {
    last_ms: f64,
    accumulator: f32,
}

impl FrameClock {
    fn new() -> Self {
        Self {
            last_ms: 0.0,
            accumulator: 0.0,
        }
    }

    /// Number of fixed steps to run for this host frame
    fn steps(&mut self, now_ms: f64) -> u32 {
        if self.last_ms == 0.0 {
            self.last_ms = now_ms;
            return 1;
        }
        let dt = (((now_ms - self.last_ms) / 1000.0) as f32).clamp(0.0, 0.1);
        self.last_ms = now_ms;
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= FRAME_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= FRAME_DT;
            steps += 1;
        }
        steps
    }
}

/// Bounce session mounted on a canvas
#[wasm_bindgen]
pub struct BounceHandle {
    sim: BounceSim,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
    clock: FrameClock,
    color: Rgba,
}

#[wasm_bindgen]
impl BounceHandle {
    /// `config_json` may be empty for defaults; `count` marks of
    /// `mark_size` square pixels each are scattered over the canvas.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        count: usize,
        mark_size: f32,
        config_json: &str,
        seed: u64,
    ) -> Result<BounceHandle, JsValue> {
        let config: BounceConfig = parse_config(config_json)?;
        let surface = CanvasSurface::new(&canvas)?;
        let arena = Arena::new(canvas.width() as f32, canvas.height() as f32);
        let sizes = vec![Vec2::splat(mark_size); count];
        Ok(Self {
            sim: BounceSim::new(arena, &sizes, config, seed),
            surface,
            canvas,
            clock: FrameClock::new(),
            color: Rgba::new(255, 255, 255, 255),
        })
    }

    pub fn start(&mut self) {
        self.sim.start();
    }

    pub fn stop(&mut self) {
        self.sim.stop();
    }

    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        let point = surface_point(&self.canvas, client_x, client_y);
        self.sim.pointer_move(point);
    }

    /// Re-read canvas dimensions after a container resize
    pub fn resize(&mut self) -> Result<(), JsValue> {
        self.surface = CanvasSurface::new(&self.canvas)?;
        self.sim.resize(Arena::new(
            self.canvas.width() as f32,
            self.canvas.height() as f32,
        ));
        Ok(())
    }

    /// Advance and draw one host frame; returns normalized goal progress
    /// for the page's progress bar.
    pub fn frame(&mut self, now_ms: f64) -> f32 {
        for _ in 0..self.clock.steps(now_ms) {
            self.sim.step(FRAME_DT);
        }
        for event in self.sim.drain_events() {
            log::debug!("bounce event: {event:?}");
        }
        render::draw_bounce(&self.sim, self.color, &mut self.surface);
        self.sim.progress()
    }
}

/// Dispersal field mounted on a canvas, sampled from an `ImageData`
/// (the page rasterizes its logo SVG into the canvas first)
#[wasm_bindgen]
pub struct FieldHandle {
    field: ParticleField,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
    clock: FrameClock,
}

#[wasm_bindgen]
impl FieldHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        image: ImageData,
        config_json: &str,
    ) -> Result<FieldHandle, JsValue> {
        let config: FieldConfig = parse_config(config_json)?;
        let buffer = PixelBuffer::new(image.width(), image.height(), image.data().0)
            .ok_or_else(|| JsValue::from_str("image data length mismatch"))?;
        Ok(Self {
            field: ParticleField::from_buffer(&buffer, config),
            surface: CanvasSurface::new(&canvas)?,
            canvas,
            clock: FrameClock::new(),
        })
    }

    pub fn pointer_down(&mut self, client_x: f32, client_y: f32) {
        let point = surface_point(&self.canvas, client_x, client_y);
        self.field.drag_start(point);
    }

    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        let point = surface_point(&self.canvas, client_x, client_y);
        self.field.drag_move(point);
    }

    pub fn pointer_up(&mut self) {
        self.field.drag_end();
    }

    /// Advance and draw one host frame
    pub fn frame(&mut self, now_ms: f64) {
        for _ in 0..self.clock.steps(now_ms) {
            self.field.step(FRAME_DT);
        }
        render::draw_field(&self.field, &mut self.surface);
    }
}
