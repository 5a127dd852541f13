use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <div class="brand">
                <h1 class="brand-title">{"SUN ARMOR"}</h1>
            </div>
            <p class="subtitle">{"AI-Powered Skin Cancer Detection"}</p>
        </header>
    }
}
