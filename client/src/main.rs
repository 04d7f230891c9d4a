mod app;
mod auth;
mod config;
mod engine;
mod geocode;
mod legend;
mod loader;
mod params;

use leptos::mount::mount_to;
use std::any::Any;
use std::cell::RefCell;
use wasm_bindgen::JsCast;

thread_local! {
    // Dropping the handle unmounts the app and with it the map session and the
    // legend's event listener, so it lives for the whole page.
    static APP_MOUNT_HANDLE: RefCell<Option<Box<dyn Any>>> = RefCell::new(None);
}

fn main() {
    console_error_panic_hook::set_once();
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    // index.html provides #app; the loading shell sits beside it.
    let Some(target) = document
        .get_element_by_id("app")
        .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        web_sys::console::error_1(&"Missing #app mount point".into());
        return;
    };

    let handle = mount_to(target, app::App);
    APP_MOUNT_HANDLE.with(move |slot| *slot.borrow_mut() = Some(Box::new(handle)));
}
