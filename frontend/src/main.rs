mod components;
mod runtime;

use components::handlers;
use components::header::render_header;
use components::preview_area::render_preview_area;
use components::results::render_results;
use components::upload_section::render_upload_section;
use components::utils::render_error_message;
use shared::{ClassificationResult, ModelConfig, PipelineError, RunTicket, SelectionId, UploadController};
use web_sys::File;
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // File operations
    FileChosen(File),
    FileRead(SelectionId, Result<Vec<u8>, String>),

    // Analysis operations
    Analyze,
    AnalysisFinished(RunTicket, Result<ClassificationResult, PipelineError>),
}

// Main component
pub struct Model {
    controller: UploadController,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            controller: UploadController::new(ModelConfig::default()),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::FileRead(id, bytes) => handlers::handle_file_read(self, id, bytes),
            Msg::Analyze => handlers::handle_analyze(self, ctx),
            Msg::AnalysisFinished(ticket, outcome) => {
                handlers::handle_analysis_finished(self, ticket, outcome)
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                    <div class="upload-card">
                        { render_upload_section(ctx) }
                        { render_preview_area(self, ctx) }
                        { render_error_message(self) }
                        { render_results(self) }
                    </div>
                </main>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.controller.teardown();
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
