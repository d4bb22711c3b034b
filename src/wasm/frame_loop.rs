use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};

use super::dom;
use crate::error::PortfolioResult;

/// Drive `tick` from `requestAnimationFrame` until the page goes away. The
/// timestamp passed in is in milliseconds.
pub fn run<F>(mut tick: F) -> PortfolioResult<()>
where
    F: FnMut(f64) + 'static,
{
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::new(move |now: f64| {
        tick(now);

        // schedule next
        let scheduled = dom::window().and_then(|w| {
            let next = f.borrow();
            let Some(next) = next.as_ref() else {
                return Ok(0);
            };
            Ok(w.request_animation_frame(next.as_ref().unchecked_ref())?)
        });
        if let Err(err) = scheduled {
            log::error!("frame loop stopped: {err}");
        }
    }));

    if let Some(first) = g.borrow().as_ref() {
        dom::window()?.request_animation_frame(first.as_ref().unchecked_ref())?;
    }
    Ok(())
}

/// Call `on_resize` now and on every window resize.
pub fn on_resize<F>(mut on_resize: F) -> PortfolioResult<()>
where
    F: FnMut() + 'static,
{
    on_resize();
    let window = dom::window()?;
    dom::listen(&window, "resize", move |_| on_resize())
}
