//! Page wiring: menu, content panels, contact form and the two 3D views.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, Event, FormData, HtmlElement, HtmlFormElement, HtmlImageElement};

use super::{dom, gallery_view, wave_view};
use crate::config::VizConfig;
use crate::contact::{ContactDraft, Delivery, DEFAULT_RECIPIENT};
use crate::content::{
    render_bio, render_ceramic_grid, render_statement_detail, render_statement_list,
    statement_detail_url, Bio, Ceramic, StatementDetail, StatementIndex, BIO_URL,
    CERAMIC_INDEX_URL, STATEMENT_INDEX_URL,
};
use crate::error::{PortfolioError, PortfolioResult};
use crate::gallery::wrap_index;

#[derive(Default)]
struct SiteData {
    bio: Option<Bio>,
    ceramics: Vec<Ceramic>,
    statements: Option<StatementIndex>,
}

struct Site {
    data: RefCell<SiteData>,
    gallery_mounted: Cell<bool>,
}

async fn preload() -> SiteData {
    let mut data = SiteData::default();
    match dom::fetch_json::<Bio>(BIO_URL).await {
        Ok(bio) => data.bio = Some(bio),
        Err(err) => log::error!("bio: {err}"),
    }
    match dom::fetch_json::<Vec<Ceramic>>(CERAMIC_INDEX_URL).await {
        Ok(ceramics) => data.ceramics = ceramics,
        Err(err) => log::error!("ceramics: {err}"),
    }
    match dom::fetch_json::<StatementIndex>(STATEMENT_INDEX_URL).await {
        Ok(index) => data.statements = Some(index),
        Err(err) => log::error!("statements: {err}"),
    }
    data
}

fn config_of(el: &Element) -> VizConfig {
    VizConfig::from_attribute(el.get_attribute("data-config").as_deref())
}

/// Mount the wave viewer, load the content JSON and wire every control.
pub async fn start() -> PortfolioResult<()> {
    match dom::by_id::<HtmlElement>("three-container") {
        Ok(container) => {
            if let Err(err) = wave_view::mount(&container, config_of(&container)) {
                log::error!("wave viewer: {err}");
            }
        }
        Err(err) => log::warn!("wave viewer not mounted: {err}"),
    }

    let site = Rc::new(Site {
        data: RefCell::new(preload().await),
        gallery_mounted: Cell::new(false),
    });

    for section in dom::query_all(".content-section")? {
        hide(&section);
    }
    wire_home()?;
    wire_menu(&site)?;
    wire_ceramic_carousel(&site);
    wire_statements(&site);
    wire_contact_form();
    log::info!("site ready");
    Ok(())
}

fn hide(el: &Element) {
    if let Some(el) = el.dyn_ref::<HtmlElement>() {
        dom::set_display(el, "none");
    }
}

fn show(el: &Element) {
    if let Some(el) = el.dyn_ref::<HtmlElement>() {
        dom::set_display(el, "block");
    }
}

fn clear_active(buttons: &[Element]) {
    for button in buttons {
        let _ = button.class_list().remove_1("active");
    }
}

fn wire_home() -> PortfolioResult<()> {
    let home: HtmlElement = match dom::by_id("home-button") {
        Ok(home) => home,
        Err(err) => {
            log::warn!("{err}");
            return Ok(());
        }
    };
    dom::listen(&home, "click", |_| {
        if let Ok(buttons) = dom::query_all(".menu-btn") {
            clear_active(&buttons);
        }
        for id in ["default-section", "three-container"] {
            if let Ok(el) = dom::by_id::<Element>(id) {
                show(&el);
            }
        }
        if let Ok(sections) = dom::query_all(".content-section") {
            sections.iter().for_each(hide);
        }
        log::info!("home");
    })
}

fn wire_menu(site: &Rc<Site>) -> PortfolioResult<()> {
    let buttons = dom::query_all(".menu-btn")?;
    for button in &buttons {
        let site = site.clone();
        let all = buttons.clone();
        let this = button.clone();
        dom::listen(button, "click", move |_| {
            let Some(section) = this.get_attribute("data-section") else { return };
            clear_active(&all);
            let _ = this.class_list().add_1("active");
            open_section(&site, &section);
        })?;
    }
    Ok(())
}

fn open_section(site: &Rc<Site>, name: &str) {
    for id in ["default-section", "three-container"] {
        if let Ok(el) = dom::by_id::<Element>(id) {
            hide(&el);
        }
    }
    if let Ok(sections) = dom::query_all(".content-section") {
        sections.iter().for_each(hide);
    }
    let Ok(target) = dom::by_id::<Element>(&format!("{name}-section")) else {
        log::warn!("no section named {name}");
        return;
    };
    show(&target);

    let rendered = match name {
        "bio" => render_bio_panel(site),
        "project" => {
            mount_gallery(site);
            Ok(())
        }
        "ceramic" => render_ceramic_panel(site),
        "statement" => render_statement_panel(site),
        _ => Ok(()),
    };
    if let Err(err) = rendered {
        log::warn!("{name} section: {err}");
    }
    log::info!("{name} section opened");
}

fn render_bio_panel(site: &Site) -> PortfolioResult<()> {
    let data = site.data.borrow();
    let Some(bio) = data.bio.as_ref() else {
        return Err(PortfolioError::fetch("bio data unavailable"));
    };
    dom::set_inner_html("bio-text", &render_bio(bio))
}

fn render_ceramic_panel(site: &Site) -> PortfolioResult<()> {
    dom::set_inner_html("ceramic-list", &render_ceramic_grid(&site.data.borrow().ceramics))
}

fn render_statement_panel(site: &Site) -> PortfolioResult<()> {
    let data = site.data.borrow();
    let Some(index) = data.statements.as_ref() else {
        return Err(PortfolioError::fetch("statement index unavailable"));
    };
    dom::set_inner_html("statement-text", &render_statement_list(index))
}

fn mount_gallery(site: &Site) {
    if site.gallery_mounted.replace(true) {
        return;
    }
    let container = match dom::by_id::<HtmlElement>("circular-gallery") {
        Ok(container) => container,
        Err(err) => {
            site.gallery_mounted.set(false);
            log::warn!("gallery not mounted: {err}");
            return;
        }
    };
    let config = config_of(&container);
    spawn_local(async move {
        match gallery_view::mount(container, config).await {
            Ok(summary) => log::info!(
                "gallery ready: {} frames, {} failed",
                summary.loaded.len(),
                summary.failed.len()
            ),
            Err(err) => log::error!("gallery: {err}"),
        }
    });
}

fn closest(event: &Event, selector: &str) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}

fn wire_ceramic_carousel(site: &Rc<Site>) {
    let Ok(list) = dom::by_id::<Element>("ceramic-list") else {
        log::warn!("#ceramic-list not found");
        return;
    };
    let site = site.clone();
    let owner = list.clone();
    let result = dom::listen(&list, "click", move |event| {
        let Some(button) = closest(&event, ".ceramic-nav-btn") else { return };
        let index = button.get_attribute("data-ceramic-index").and_then(|v| v.parse::<usize>().ok());
        let delta = button.get_attribute("data-direction").and_then(|v| v.parse::<isize>().ok());
        let (Some(index), Some(delta)) = (index, delta) else { return };

        let data = site.data.borrow();
        let Some(ceramic) = data.ceramics.get(index) else { return };
        let images = ceramic.image_list();
        let selector = format!(".ceramic-item[data-ceramic-index=\"{index}\"] .ceramic-image");
        let Ok(Some(img)) = owner.query_selector(&selector) else { return };
        let Ok(img) = img.dyn_into::<HtmlImageElement>() else { return };

        let current = img
            .get_attribute("data-image-index")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        let next = wrap_index(current, delta, images.len());
        if let Some(src) = images.get(next) {
            img.set_src(src);
            let _ = img.set_attribute("data-image-index", &next.to_string());
        }
    });
    if let Err(err) = result {
        log::warn!("ceramic carousel: {err}");
    }
}

fn wire_statements(site: &Rc<Site>) {
    let Ok(panel) = dom::by_id::<Element>("statement-text") else {
        log::warn!("#statement-text not found");
        return;
    };
    let site = site.clone();
    let result = dom::listen(&panel, "click", move |event| {
        if closest(&event, ".back-to-statements").is_some() {
            if let Err(err) = render_statement_panel(&site) {
                log::warn!("{err}");
            }
            return;
        }
        let Some(item) = closest(&event, ".statement-item") else { return };
        let Some(id) = item.get_attribute("data-statement-id") else { return };
        spawn_local(async move {
            let url = statement_detail_url(&id);
            let rendered = dom::fetch_json::<StatementDetail>(&url)
                .await
                .and_then(|detail| dom::set_inner_html("statement-text", &render_statement_detail(&detail)));
            if let Err(err) = rendered {
                log::error!("statement {id}: {err}");
            }
        });
    });
    if let Err(err) = result {
        log::warn!("statement list: {err}");
    }
}

fn wire_contact_form() {
    let Ok(form) = dom::by_id::<HtmlFormElement>("contact-form") else {
        log::warn!("#contact-form not found");
        return;
    };
    let target = form.clone();
    let result = dom::listen(&form, "submit", move |event| {
        event.prevent_default();
        let form = target.clone();
        spawn_local(async move {
            if let Err(err) = submit_contact(&form).await {
                log::error!("contact form: {err}");
            }
        });
    });
    if let Err(err) = result {
        log::warn!("contact form: {err}");
    }
}

fn read_draft(form: &HtmlFormElement) -> PortfolioResult<ContactDraft> {
    let data = FormData::new_with_form(form)?;
    let field = |name: &str| data.get(name).as_string().unwrap_or_default();
    Ok(ContactDraft {
        name: field("name"),
        email: field("email"),
        subject: field("subject"),
        message: field("message"),
    })
}

async fn submit_contact(form: &HtmlFormElement) -> PortfolioResult<()> {
    let draft = read_draft(form)?;
    let window = dom::window()?;
    let mailto = draft.mailto_url(DEFAULT_RECIPIENT, |s| String::from(js_sys::encode_uri_component(s)));

    let copied = window
        .navigator()
        .clipboard()
        .write_text(&draft.email_text(DEFAULT_RECIPIENT));
    let delivery = match JsFuture::from(copied).await {
        Ok(_) => {
            form.reset();
            window.alert_with_message(&Delivery::Clipboard.notice(DEFAULT_RECIPIENT))?;
            window.open_with_url(&mailto)?;
            Delivery::Clipboard
        }
        Err(_) => {
            window.location().set_href(&mailto)?;
            form.reset();
            window.alert_with_message(&Delivery::MailtoFallback.notice(DEFAULT_RECIPIENT))?;
            Delivery::MailtoFallback
        }
    };
    log::info!("contact draft delivered via {delivery:?}");
    Ok(())
}
