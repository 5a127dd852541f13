use super::super::{Model, Msg};
use super::utils::debounce;
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link().clone();
    let controller = &model.controller;

    html! {
        <>
            { render_preview(model) }
            <button
                id="upload-button"
                class={classes!("upload-btn", (!controller.can_run()).then_some("disabled"))}
                onclick={debounce(300, move || link.send_message(Msg::Analyze))}
                disabled={!controller.can_run()}
            >
                { if controller.in_flight() { "UPLOADING..." } else { "UPLOAD" } }
            </button>
        </>
    }
}

fn render_preview(model: &Model) -> Html {
    match (model.controller.preview(), model.controller.selected_name()) {
        (Some(url), name) => html! {
            <div class="preview">
                <img
                    id="image-preview"
                    src={url.to_string()}
                    alt="Preview"
                    title={name.unwrap_or_default().to_string()}
                />
            </div>
        },
        (None, Some(_)) => html! {
            <div class="preview loading-preview">
                <p>{"Loading preview..."}</p>
            </div>
        },
        (None, None) => html! {},
    }
}
