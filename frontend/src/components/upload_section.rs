use super::super::{Model, Msg};
use super::utils::{click_element, debounce, take_first_file};
use web_sys::HtmlInputElement;
use yew::prelude::*;

const FILE_INPUT_ID: &str = "file-input";

pub fn render_upload_section(ctx: &Context<Model>) -> Html {
    let handle_change = ctx.link().batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        take_first_file(&input).map(Msg::FileChosen)
    });

    html! {
        <div class="upload-section">
            <input
                type="file"
                id={FILE_INPUT_ID}
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />
            <button
                id="select-button"
                class="select-btn"
                onclick={debounce(300, || click_element(FILE_INPUT_ID))}
            >
                {"SELECT IMAGE"}
            </button>
        </div>
    }
}
