use super::super::{Model, Msg};
use crate::runtime::OrtRuntime;
use futures::future::AbortHandle;
use gloo_file::File as GlooFile;
use shared::{
    ClassificationResult, FileInfo, PipelineError, RunTicket, SelectionId, run_cancellable,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::File;
use yew::prelude::*;

pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: File) -> bool {
    let info = FileInfo::new(file.name(), file.type_(), file.size() as u64);

    match model.controller.select_file(info) {
        Ok(id) => {
            log::info!("Selected {} ({} bytes)", file.name(), file.size());
            read_file(ctx, id, GlooFile::from(file));
        }
        Err(e) => {
            log::warn!("Skipping {}: {}", file.name(), e);
        }
    }
    true
}

fn read_file(ctx: &Context<Model>, id: SelectionId, file: GlooFile) {
    let link = ctx.link().clone();
    spawn_local(async move {
        let bytes = gloo_file::futures::read_as_bytes(&file)
            .await
            .map_err(|e| format!("Failed to read {}: {}", file.name(), e));
        link.send_message(Msg::FileRead(id, bytes));
    });
}

pub fn handle_file_read(model: &mut Model, id: SelectionId, bytes: Result<Vec<u8>, String>) -> bool {
    match bytes {
        Ok(bytes) => match model.controller.file_read(id, bytes) {
            Ok(applied) => applied,
            Err(e) => {
                log::warn!("Discarding read for {}: {}", id, e);
                true
            }
        },
        Err(message) => {
            log::error!("{}", message);
            model.controller.file_read_failed(id, message)
        }
    }
}

pub fn handle_analyze(model: &mut Model, ctx: &Context<Model>) -> bool {
    let (ticket, image) = match model.controller.begin_run() {
        Ok(run) => run,
        Err(e) => {
            log::warn!("Analysis not started: {}", e);
            return true;
        }
    };

    let (handle, registration) = AbortHandle::new_pair();
    model.controller.attach_abort(ticket, handle);

    let config = model.controller.config().clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let outcome = run_cancellable(OrtRuntime, config, image, registration).await;
        link.send_message(Msg::AnalysisFinished(ticket, outcome));
    });

    true
}

pub fn handle_analysis_finished(
    model: &mut Model,
    ticket: RunTicket,
    outcome: Result<ClassificationResult, PipelineError>,
) -> bool {
    model.controller.finish_run(ticket, outcome)
}
