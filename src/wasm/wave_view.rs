//! Wave-essence visualizer: undulating surface plus two particle clouds.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

use super::dom;
use super::frame_loop;
use super::render::{DynamicMesh, PointCloud, Renderer};
use crate::camera::PerspectiveCamera;
use crate::color::Rgb;
use crate::config::VizConfig;
use crate::error::PortfolioResult;
use crate::particles::ParticleField;
use crate::viewer::ViewerState;
use crate::wave::WaveSurface;

const BACKGROUND: Rgb = Rgb::new(1.0, 1.0, 1.0);

struct Cloud {
    field: ParticleField,
    gpu: PointCloud,
}

impl Cloud {
    fn new(renderer: &Renderer, field: ParticleField) -> PortfolioResult<Self> {
        let opacities = field.opacities().to_vec();
        let gpu = renderer.create_points(
            &field.positions_flat(),
            &opacities,
            &field.colors_flat(),
            field.params().point_size,
        )?;
        Ok(Self { field, gpu })
    }

    fn upload(&self, renderer: &Renderer) {
        renderer.update_points(
            &self.gpu,
            &self.field.positions_flat(),
            self.field.opacities(),
            &self.field.colors_flat(),
        );
    }
}

struct WaveScene {
    viewer: ViewerState,
    camera: PerspectiveCamera,
    renderer: Renderer,
    surface: WaveSurface,
    mesh: DynamicMesh,
    inner: Cloud,
    outer: Cloud,
}

impl WaveScene {
    fn frame(&mut self, now_ms: f64) {
        let inputs = self.viewer.tick(now_ms / 1000.0);

        self.surface.update(&inputs);
        self.inner.field.update(&inputs);
        self.outer.field.update(&inputs);

        self.camera.eye = self.viewer.camera_eye();

        let r = &self.renderer;
        r.update_mesh(&self.mesh, &self.surface.positions_flat(), &self.surface.normals_flat());
        self.inner.upload(r);
        self.outer.upload(r);

        let view = self.camera.view();
        let proj = self.camera.projection();
        r.clear(BACKGROUND);
        r.draw_mesh(&self.mesh, proj * view, self.surface.color(), self.surface.opacity());
        r.draw_points(&self.inner.gpu, view, proj);
        r.draw_points(&self.outer.gpu, view, proj);
    }
}

/// Build the scene inside `container` and start its frame loop.
pub fn mount(container: &HtmlElement, config: VizConfig) -> PortfolioResult<()> {
    let canvas: HtmlCanvasElement = dom::create("canvas")?;
    container.append_child(&canvas)?;

    let renderer = Renderer::new(canvas.clone())?;
    let (width, height) = dom::element_size(container);
    let viewer = ViewerState::new(config.viewer);
    let camera = PerspectiveCamera::looking_at(
        viewer.camera_eye(),
        glam::Vec3::ZERO,
        75.0,
        if height > 0.0 { (width / height) as f32 } else { 1.0 },
    );

    let surface = WaveSurface::new(config.wave);
    let mesh = renderer.create_mesh(&surface.positions_flat(), &surface.normals_flat(), surface.indices())?;
    let inner = Cloud::new(&renderer, ParticleField::new(config.inner))?;
    let outer = Cloud::new(&renderer, ParticleField::new(config.outer))?;
    log::info!(
        "wave viewer mounted: {} surface vertices, {} + {} particles",
        surface.positions().len(),
        inner.field.len(),
        outer.field.len()
    );

    let scene = Rc::new(RefCell::new(WaveScene {
        viewer,
        camera,
        renderer,
        surface,
        mesh,
        inner,
        outer,
    }));

    wire_input(&canvas, &scene)?;

    {
        let scene = scene.clone();
        let container = container.clone();
        frame_loop::on_resize(move || {
            let (w, h) = dom::element_size(&container);
            if w <= 0.0 || h <= 0.0 {
                // hidden panel; keep the last projection
                return;
            }
            let mut scene = scene.borrow_mut();
            scene.camera.set_viewport(w, h);
            scene.renderer.resize(w, h, dom::pixel_ratio());
        })?;
    }

    frame_loop::run(move |now| scene.borrow_mut().frame(now))
}

fn wire_input(canvas: &HtmlCanvasElement, scene: &Rc<RefCell<WaveScene>>) -> PortfolioResult<()> {
    let document = dom::document()?;

    let s = scene.clone();
    dom::listen(&document, "mousemove", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else { return };
        if let Ok((w, h)) = dom::viewport() {
            s.borrow_mut()
                .viewer
                .set_pointer_client(f64::from(event.client_x()), f64::from(event.client_y()), w, h);
        }
    })?;

    let s = scene.clone();
    dom::listen(&document, "touchmove", move |event| {
        let Some(touch) = event
            .dyn_ref::<TouchEvent>()
            .and_then(|e| e.touches().get(0))
        else {
            return;
        };
        if let Ok((w, h)) = dom::viewport() {
            s.borrow_mut()
                .viewer
                .set_pointer_client(f64::from(touch.client_x()), f64::from(touch.client_y()), w, h);
        }
    })?;

    let s = scene.clone();
    dom::listen(canvas, "click", move |_| {
        let on = s.borrow_mut().viewer.toggle_essence();
        log::info!("essence mode {}", if on { "on" } else { "off" });
    })?;

    let s = scene.clone();
    dom::listen(&document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else { return };
        if event.code() == "Space" {
            s.borrow_mut().viewer.request_boost();
        }
    })?;

    Ok(())
}
