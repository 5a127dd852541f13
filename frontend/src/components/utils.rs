use super::super::Model;
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut timeout_ref = timeout.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        *timeout_ref = Some(Timeout::new(duration, move || {
            inner_callback();
        }));
    })
}

/// Takes the first picked file and clears the input so picking the same file again fires `change`.
pub fn take_first_file(input: &HtmlInputElement) -> Option<File> {
    let file = input.files().and_then(|files| files.item(0));
    input.set_value("");
    file
}

pub fn click_element(id: &str) {
    let element = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(id))
        .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok());

    match element {
        Some(element) => element.click(),
        None => log::warn!("Element #{} not found", id),
    }
}

pub fn render_error_message(model: &Model) -> Html {
    if let Some(error_msg) = model.controller.error_message() {
        html! {
            <div class="error-message">
                { format!("ERROR: {}", error_msg) }
            </div>
        }
    } else {
        html! {}
    }
}
