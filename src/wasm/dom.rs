use serde::de::DeserializeOwned;
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement, Window};

use crate::error::{PortfolioError, PortfolioResult};

pub fn window() -> PortfolioResult<Window> {
    web_sys::window().ok_or_else(|| PortfolioError::missing("window"))
}

pub fn document() -> PortfolioResult<Document> {
    window()?
        .document()
        .ok_or_else(|| PortfolioError::missing("document"))
}

pub fn by_id<T: JsCast>(id: &str) -> PortfolioResult<T> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| PortfolioError::missing(format!("#{id}")))?
        .dyn_into::<T>()
        .map_err(|_| PortfolioError::missing(format!("#{id} has unexpected type")))
}

pub fn create<T: JsCast>(tag: &str) -> PortfolioResult<T> {
    document()?
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(|_| PortfolioError::Js(format!("<{tag}> has unexpected type")))
}

pub fn query<T: JsCast>(selector: &str) -> PortfolioResult<T> {
    document()?
        .query_selector(selector)?
        .ok_or_else(|| PortfolioError::missing(selector))?
        .dyn_into::<T>()
        .map_err(|_| PortfolioError::missing(format!("{selector} has unexpected type")))
}

pub fn query_all(selector: &str) -> PortfolioResult<Vec<Element>> {
    let list = document()?.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub fn set_display(el: &HtmlElement, display: &str) {
    if let Err(err) = el.style().set_property("display", display) {
        log::warn!("could not set display: {err:?}");
    }
}

pub fn set_inner_html(id: &str, html: &str) -> PortfolioResult<()> {
    by_id::<Element>(id)?.set_inner_html(html);
    Ok(())
}

/// Attach a listener for the lifetime of the page.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> PortfolioResult<()>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Viewport size in CSS pixels.
pub fn viewport() -> PortfolioResult<(f64, f64)> {
    let w = window()?;
    let width = w.inner_width()?.as_f64().unwrap_or(0.0);
    let height = w.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width, height))
}

pub fn element_size(el: &HtmlElement) -> (f64, f64) {
    (f64::from(el.client_width()), f64::from(el.client_height()))
}

pub fn pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
}

pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> PortfolioResult<T> {
    let response = gloo_net::http::Request::get(url).send().await?;
    if !response.ok() {
        return Err(PortfolioError::fetch(format!("{url}: HTTP {}", response.status())));
    }
    Ok(response.json::<T>().await?)
}

/// Resolve once the image has decoded, or fail on a load error. There is no
/// timeout; a stalled request never settles.
pub async fn load_image(url: &str) -> PortfolioResult<HtmlImageElement> {
    let image = HtmlImageElement::new()?;
    image.set_cross_origin(Some("anonymous"));
    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&reject));
    });
    image.set_src(url);
    let settled = JsFuture::from(promise).await;
    image.set_onload(None);
    image.set_onerror(None);
    settled.map_err(|_| PortfolioError::image_load(url))?;
    Ok(image)
}
