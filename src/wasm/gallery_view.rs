//! Circular project gallery and its detail panel.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlImageElement, MouseEvent};

use super::dom;
use super::frame_loop;
use super::render::{Lighting, Renderer, TexturedQuad};
use crate::camera::{ndc_from_client, PerspectiveCamera};
use crate::color::Rgb;
use crate::config::VizConfig;
use crate::content::{render_project_detail, ProjectIndex, PROJECT_INDEX_URL};
use crate::error::PortfolioResult;
use crate::gallery::{DetailNavigator, Gallery, GalleryItem, LoadSummary, LoadTracker};

const BACKGROUND: Rgb = Rgb::new(1.0, 1.0, 1.0);

struct GalleryScene {
    gallery: Gallery,
    nav: DetailNavigator,
    camera: PerspectiveCamera,
    renderer: Renderer,
    quads: Vec<TexturedQuad>,
    tracker: LoadTracker,
    summary: Option<LoadSummary>,
    on_settled: Option<js_sys::Function>,
}

impl GalleryScene {
    fn frame(&self) {
        let view_proj = self.camera.view_projection();
        let opacity = self.gallery.params().frame_opacity;
        self.renderer.clear(BACKGROUND);
        for quad in &self.quads {
            self.renderer.draw_quad(quad, view_proj, opacity);
        }
    }

    fn settle(&mut self, item: usize, outcome: Result<(), String>) {
        let Some(summary) = self.tracker.record(item, outcome) else { return };
        log::info!(
            "gallery images settled: {} loaded, {} failed",
            summary.loaded.len(),
            summary.failed.len()
        );
        self.summary = Some(summary);
        if let Some(resolve) = self.on_settled.take() {
            let _ = resolve.call0(&JsValue::NULL);
        }
    }
}

/// Fetch the project index and every record it lists. A record that fails to
/// load is logged and left out.
async fn load_projects() -> PortfolioResult<Vec<GalleryItem>> {
    let index: ProjectIndex = dom::fetch_json(PROJECT_INDEX_URL).await?;
    let mut items = Vec::with_capacity(index.projects.len());
    for entry in &index.projects {
        match dom::fetch_json::<GalleryItem>(&entry.file).await {
            Ok(item) => items.push(item),
            Err(err) => log::error!("project {}: {err}", entry.file),
        }
    }
    log::info!("{} projects loaded", items.len());
    Ok(items)
}

/// Build the gallery inside `container`. Resolves once every frame image has
/// either loaded or failed; rendering and picking start before that.
pub async fn mount(container: HtmlElement, config: VizConfig) -> PortfolioResult<LoadSummary> {
    let items = load_projects().await?;
    let params = config.gallery;

    let canvas: HtmlCanvasElement = dom::create("canvas")?;
    canvas.style().set_property("cursor", "pointer")?;
    container.append_child(&canvas)?;

    let mut renderer = Renderer::new(canvas.clone())?;
    renderer.lighting = Lighting {
        direction: Vec3::new(0.0, 10.0, 5.0).normalize(),
        ambient: 0.6,
        diffuse: 0.8,
    };
    let (width, height) = dom::element_size(&container);
    let mut camera = PerspectiveCamera::overhead(params.camera_height, params.fov_y_degrees, 1.0);
    camera.set_viewport(width, height);

    let gallery = Gallery::new(items, params);
    let placements = gallery.placements().to_vec();

    let mut resolve_slot = None;
    let settled = js_sys::Promise::new(&mut |resolve, _reject| resolve_slot = Some(resolve));

    let scene = Rc::new(RefCell::new(GalleryScene {
        tracker: LoadTracker::new(placements.len()),
        gallery,
        nav: DetailNavigator::default(),
        camera,
        renderer,
        quads: Vec::new(),
        summary: None,
        on_settled: resolve_slot,
    }));

    wire_picking(&canvas, &scene)?;
    wire_detail_controls(&scene);

    {
        let scene = scene.clone();
        frame_loop::on_resize(move || {
            let (w, h) = dom::element_size(&container);
            if w <= 0.0 || h <= 0.0 {
                return;
            }
            let mut scene = scene.borrow_mut();
            scene.camera.set_viewport(w, h);
            scene.renderer.resize(w, h, dom::pixel_ratio());
        })?;
    }

    {
        let scene = scene.clone();
        frame_loop::run(move |_| scene.borrow().frame())?;
    }

    if placements.is_empty() {
        return Ok(LoadSummary::default());
    }
    for placement in placements {
        let url = scene.borrow().gallery.cover_url(&placement).map(str::to_owned);
        let Some(url) = url else { continue };
        spawn_local(load_frame(scene.clone(), placement.item, url));
    }

    JsFuture::from(settled).await?;
    let summary = scene.borrow().summary.clone().unwrap_or_default();
    Ok(summary)
}

async fn load_frame(scene: Rc<RefCell<GalleryScene>>, item: usize, url: String) {
    log::debug!("loading {url} for project {item}");
    let image = dom::load_image(&url).await;

    let mut guard = scene.borrow_mut();
    let s = &mut *guard;
    let outcome = image
        .map_err(|err| err.to_string())
        .and_then(|image| {
            s.gallery.attach_with(item, image.natural_width(), image.natural_height(), |frame| {
                s.renderer.create_quad(&image, frame.position, frame.width, frame.height)
            })
        })
        .map(|(_, quad)| s.quads.push(quad));
    if let Err(err) = &outcome {
        log::error!("frame for {url}: {err}");
    }
    s.settle(item, outcome);
}

fn wire_picking(canvas: &HtmlCanvasElement, scene: &Rc<RefCell<GalleryScene>>) -> PortfolioResult<()> {
    let s = scene.clone();
    let target = canvas.clone();
    dom::listen(canvas, "click", move |event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else { return };
        let rect = target.get_bounding_client_rect();
        let Some(ndc) = ndc_from_client(
            f64::from(event.client_x()),
            f64::from(event.client_y()),
            [rect.left(), rect.top(), rect.width(), rect.height()],
        ) else {
            return;
        };

        let picked = {
            let scene = s.borrow();
            let ray = scene.camera.ray_from_ndc(ndc);
            scene
                .gallery
                .pick(&ray)
                .and_then(|frame| scene.gallery.item(frame.item).cloned())
        };
        match picked {
            Some(item) => {
                log::debug!("picked {:?}", item.title);
                if let Err(err) = open_detail(&mut s.borrow_mut(), item) {
                    log::warn!("detail view unavailable: {err}");
                }
            }
            None => log::debug!("click hit no frame"),
        }
    })
}

fn open_detail(scene: &mut GalleryScene, item: GalleryItem) -> PortfolioResult<()> {
    let gallery_section: HtmlElement = dom::by_id("project-section")?;
    let detail_section: HtmlElement = dom::by_id("project-detail-section")?;
    dom::set_display(&gallery_section, "none");
    dom::set_display(&detail_section, "block");

    if let Ok(name) = dom::by_id::<Element>("project-detail-name") {
        name.set_text_content(Some(&item.title));
    }
    if let Ok(description) = dom::by_id::<Element>("project-detail-description") {
        description.set_inner_html(&render_project_detail(&item));
    }
    scene.nav.open(item);
    show_current_image(scene);
    Ok(())
}

fn show_current_image(scene: &GalleryScene) {
    if let (Some(path), Ok(img)) = (
        scene.nav.current_image(),
        dom::by_id::<HtmlImageElement>("project-detail-img"),
    ) {
        img.set_src(scene.gallery.params().image_url(path));
    }
    let enabled = scene.nav.controls_enabled();
    for selector in [".prev-btn", ".next-btn"] {
        if let Ok(button) = dom::query::<HtmlButtonElement>(selector) {
            button.set_disabled(!enabled);
        }
    }
}

fn wire_detail_controls(scene: &Rc<RefCell<GalleryScene>>) {
    if let Ok(back) = dom::by_id::<HtmlElement>("back-to-gallery") {
        let result = dom::listen(&back, "click", |_| {
            if let (Ok(gallery), Ok(detail)) = (
                dom::by_id::<HtmlElement>("project-section"),
                dom::by_id::<HtmlElement>("project-detail-section"),
            ) {
                dom::set_display(&detail, "none");
                dom::set_display(&gallery, "block");
            }
        });
        if let Err(err) = result {
            log::warn!("back button: {err}");
        }
    }

    for (selector, delta) in [(".prev-btn", -1), (".next-btn", 1)] {
        let Ok(button) = dom::query::<HtmlElement>(selector) else {
            log::warn!("{selector} not found");
            continue;
        };
        let s = scene.clone();
        let result = dom::listen(&button, "click", move |_| {
            let mut scene = s.borrow_mut();
            if scene.nav.step(delta).is_some() {
                show_current_image(&scene);
            }
        });
        if let Err(err) = result {
            log::warn!("{selector}: {err}");
        }
    }
}
