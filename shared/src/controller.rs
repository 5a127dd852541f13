//! State owned by the upload view: what is selected and what the last run produced.
//!
//! All transitions go through [`UploadController`], so combinations such as
//! "a result and an error at once" or "running without an image" cannot be
//! represented.

use derive_more::Display;
use futures::future::AbortHandle;
use uuid::Uuid;

use crate::config::ModelConfig;
use crate::error::PipelineError;
use crate::postprocess::ClassificationResult;
use crate::upload::{FileInfo, UploadedImage, validate_file};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "selection-{}", _0)]
pub struct SelectionId(Uuid);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "run-{}", _0)]
pub struct RunTicket(Uuid);

#[derive(Debug, Clone)]
struct Selection {
    id: SelectionId,
    info: FileInfo,
    image: Option<UploadedImage>,
    preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    Running(RunTicket),
    Done(ClassificationResult),
    Failed(String),
}

/// Text shown in the result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPanel {
    pub message: String,
    pub label: String,
    pub confidence_percent: String,
    pub verdict: String,
}

impl From<&ClassificationResult> for ResultPanel {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            message: "Inference complete.".to_string(),
            label: result
                .predicted_label
                .map(|label| label.to_string())
                .unwrap_or_else(|| "Unlabeled".to_string()),
            confidence_percent: result.confidence_percent(),
            verdict: result.verdict.to_string(),
        }
    }
}

pub struct UploadController {
    config: ModelConfig,
    selection: Option<Selection>,
    status: Status,
    abort: Option<AbortHandle>,
    /// Validation error for a file picked while a run was in flight.
    rejection: Option<String>,
    live: bool,
}

impl UploadController {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            selection: None,
            status: Status::Idle,
            abort: None,
            rejection: None,
            live: true,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Validates a picked file. A valid file replaces the selection, aborts any
    /// in-flight run and clears the previous result or error.
    ///
    /// An invalid file leaves the selection as is. A run already in flight for
    /// that selection keeps going: the error shows until the run resolves and
    /// its outcome takes over.
    pub fn select_file(&mut self, info: FileInfo) -> Result<SelectionId, PipelineError> {
        if let Err(e) = validate_file(&info, self.config.max_upload_bytes) {
            log::warn!("Rejected {} ({}): {}", info.name, info.mime_type, e);
            if self.in_flight() {
                self.rejection = Some(e.to_string());
            } else {
                self.status = Status::Failed(e.to_string());
            }
            return Err(e);
        }

        self.cancel_in_flight();
        self.rejection = None;
        let id = SelectionId(Uuid::new_v4());
        self.selection = Some(Selection {
            id,
            info,
            image: None,
            preview: None,
        });
        self.status = Status::Idle;
        Ok(id)
    }

    /// Stores the bytes read for selection `id` and derives the preview data URL.
    /// Returns `false` when `id` has since been replaced.
    pub fn file_read(&mut self, id: SelectionId, bytes: Vec<u8>) -> Result<bool, PipelineError> {
        let max_bytes = self.config.max_upload_bytes;
        let Some(selection) = self.selection.as_mut().filter(|s| s.id == id) else {
            log::debug!("Dropping bytes for stale {}", id);
            return Ok(false);
        };

        match UploadedImage::new(
            selection.info.name.clone(),
            selection.info.mime_type.clone(),
            bytes,
            max_bytes,
        ) {
            Ok(image) => {
                selection.preview = Some(image.data_url());
                selection.image = Some(image);
                Ok(true)
            }
            Err(e) => {
                self.selection = None;
                self.status = Status::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Records a failure to read the bytes of selection `id`.
    pub fn file_read_failed(&mut self, id: SelectionId, message: impl Into<String>) -> bool {
        if self.current_selection_id() != Some(id) {
            return false;
        }
        self.selection = None;
        self.status = Status::Failed(message.into());
        true
    }

    pub fn begin_run(&mut self) -> Result<(RunTicket, UploadedImage), PipelineError> {
        let outcome = match (&self.selection, &self.status) {
            (None, _) => Err(PipelineError::precondition("Please select an image first")),
            (Some(_), Status::Running(_)) => {
                Err(PipelineError::precondition("An analysis is already running"))
            }
            (Some(Selection { image: None, .. }), _) => {
                Err(PipelineError::precondition("The image is still loading"))
            }
            (Some(Selection { image: Some(image), .. }), _) => Ok(image.clone()),
        };

        match outcome {
            Ok(image) => {
                let ticket = RunTicket(Uuid::new_v4());
                self.status = Status::Running(ticket);
                self.rejection = None;
                log::debug!("Starting {} for {}", ticket, image.name());
                Ok((ticket, image))
            }
            Err(e) => {
                if !self.in_flight() {
                    self.status = Status::Failed(e.to_string());
                }
                Err(e)
            }
        }
    }

    pub fn attach_abort(&mut self, ticket: RunTicket, handle: AbortHandle) {
        if self.live && self.status == Status::Running(ticket) {
            self.abort = Some(handle);
        } else {
            handle.abort();
        }
    }

    /// Applies the outcome of run `ticket`. Outcomes of runs that were
    /// superseded, or that arrive after teardown, are dropped.
    pub fn finish_run(
        &mut self,
        ticket: RunTicket,
        outcome: Result<ClassificationResult, PipelineError>,
    ) -> bool {
        if !self.live || self.status != Status::Running(ticket) {
            log::debug!("Discarding outcome of stale {}", ticket);
            return false;
        }

        self.abort = None;
        self.rejection = None;
        self.status = match outcome {
            Ok(result) => Status::Done(result),
            Err(PipelineError::Cancelled) => Status::Idle,
            Err(e) => Status::Failed(e.to_string()),
        };
        true
    }

    pub fn teardown(&mut self) {
        self.live = false;
        self.cancel_in_flight();
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn in_flight(&self) -> bool {
        matches!(self.status, Status::Running(_))
    }

    pub fn can_run(&self) -> bool {
        self.live
            && self.selection.as_ref().is_some_and(|s| s.image.is_some())
            && !self.in_flight()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.info.name.as_str())
    }

    pub fn preview(&self) -> Option<&str> {
        self.selection.as_ref().and_then(|s| s.preview.as_deref())
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        match &self.status {
            Status::Done(result) => Some(result),
            _ => None,
        }
    }

    pub fn result_panel(&self) -> Option<ResultPanel> {
        self.result().map(ResultPanel::from)
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            Status::Failed(message) => Some(message),
            Status::Running(_) => self.rejection.as_deref(),
            _ => None,
        }
    }

    fn current_selection_id(&self) -> Option<SelectionId> {
        self.selection.as_ref().map(|s| s.id)
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.abort.take() {
            log::debug!("Aborting in-flight inference");
            handle.abort();
        }
        self.rejection = None;
        if self.in_flight() {
            self.status = Status::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocess::{Label, Verdict};

    fn png_info() -> FileInfo {
        FileInfo::new("lesion.png", "image/png", 4)
    }

    fn ready_controller() -> (UploadController, SelectionId) {
        let mut controller = UploadController::new(ModelConfig::default());
        let id = controller.select_file(png_info()).unwrap();
        assert!(controller.file_read(id, vec![1, 2, 3, 4]).unwrap());
        (controller, id)
    }

    fn benign() -> ClassificationResult {
        ClassificationResult::from_logits(&[5.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]).unwrap()
    }

    #[test]
    fn rejected_file_sets_error_without_preview() {
        let mut controller = UploadController::new(ModelConfig::default());
        let err = controller
            .select_file(FileInfo::new("notes.txt", "text/plain", 10))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
        assert_eq!(controller.error_message(), Some("Please select an image file"));
        assert_eq!(controller.preview(), None);
        assert!(!controller.can_run());
    }

    #[test]
    fn oversized_file_is_rejected() {
        let mut controller = UploadController::new(ModelConfig::default());
        let info = FileInfo::new("big.jpg", "image/jpeg", 5 * 1024 * 1024 + 1);
        assert!(controller.select_file(info).is_err());
        assert_eq!(controller.error_message(), Some("File size exceeds 5MB"));
    }

    #[test]
    fn preview_is_a_data_url_once_read() {
        let (controller, _) = ready_controller();
        assert_eq!(controller.preview(), Some("data:image/png;base64,AQIDBA=="));
        assert!(controller.can_run());
    }

    #[test]
    fn bytes_for_replaced_selection_are_ignored() {
        let mut controller = UploadController::new(ModelConfig::default());
        let first = controller.select_file(png_info()).unwrap();
        let second = controller.select_file(png_info()).unwrap();

        assert!(!controller.file_read(first, vec![9]).unwrap());
        assert_eq!(controller.preview(), None);
        assert!(controller.file_read(second, vec![1]).unwrap());
        assert!(controller.preview().is_some());
    }

    #[test]
    fn run_without_selection_is_a_precondition_error() {
        let mut controller = UploadController::new(ModelConfig::default());
        let err = controller.begin_run().unwrap_err();
        assert_eq!(err.to_string(), "Please select an image first");
        assert_eq!(controller.error_message(), Some("Please select an image first"));
    }

    #[test]
    fn run_before_bytes_arrive_is_refused() {
        let mut controller = UploadController::new(ModelConfig::default());
        let id = controller.select_file(png_info()).unwrap();
        assert_eq!(controller.selected_name(), Some("lesion.png"));
        assert!(!controller.can_run());
        assert!(matches!(controller.begin_run(), Err(PipelineError::Precondition(_))));

        assert!(controller.file_read(id, vec![1, 2, 3, 4]).unwrap());
        assert!(controller.can_run());
    }

    #[test]
    fn invalid_pick_mid_run_keeps_the_run() {
        let (mut controller, _) = ready_controller();
        let (ticket, _) = controller.begin_run().unwrap();
        let (handle, _registration) = AbortHandle::new_pair();
        controller.attach_abort(ticket, handle.clone());

        let err = controller
            .select_file(FileInfo::new("notes.txt", "text/plain", 10))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
        assert!(!handle.is_aborted());
        assert!(controller.in_flight());
        assert_eq!(controller.error_message(), Some("Please select an image file"));
        assert_eq!(controller.selected_name(), Some("lesion.png"));

        assert!(controller.finish_run(ticket, Ok(benign())));
        assert!(controller.result_panel().is_some());
        assert_eq!(controller.error_message(), None);
    }

    #[test]
    fn second_run_while_in_flight_is_refused() {
        let (mut controller, _) = ready_controller();
        let (ticket, _) = controller.begin_run().unwrap();
        assert!(controller.in_flight());
        assert!(!controller.can_run());

        assert!(controller.begin_run().is_err());
        assert_eq!(controller.status(), &Status::Running(ticket));
    }

    #[test]
    fn successful_run_fills_result_panel() {
        let (mut controller, _) = ready_controller();
        let (ticket, image) = controller.begin_run().unwrap();
        assert_eq!(image.name(), "lesion.png");

        assert!(controller.finish_run(ticket, Ok(benign())));
        assert!(!controller.in_flight());
        assert_eq!(controller.error_message(), None);

        let panel = controller.result_panel().unwrap();
        assert_eq!(panel.message, "Inference complete.");
        assert_eq!(panel.label, Label::Benign.to_string());
        assert_eq!(panel.verdict, Verdict::NotCancer.to_string());
        assert_eq!(panel.confidence_percent, "90.1");
    }

    #[test]
    fn failed_run_clears_in_flight_and_keeps_selection() {
        let (mut controller, _) = ready_controller();
        let (ticket, _) = controller.begin_run().unwrap();

        let applied = controller.finish_run(
            ticket,
            Err(PipelineError::ModelLoad("404 Not Found".into())),
        );
        assert!(applied);
        assert!(!controller.in_flight());
        assert!(controller.result_panel().is_none());
        assert_eq!(
            controller.error_message(),
            Some("Failed to load model: 404 Not Found")
        );
        assert!(controller.can_run());
    }

    #[test]
    fn new_selection_clears_result_and_invalidates_run() {
        let (mut controller, _) = ready_controller();
        let (ticket, _) = controller.begin_run().unwrap();
        let (handle, _registration) = AbortHandle::new_pair();
        controller.attach_abort(ticket, handle.clone());

        controller.select_file(png_info()).unwrap();
        assert!(handle.is_aborted());
        assert!(!controller.finish_run(ticket, Ok(benign())));
        assert!(controller.result().is_none());
        assert_eq!(controller.status(), &Status::Idle);
    }

    #[test]
    fn nothing_applies_after_teardown() {
        let (mut controller, _) = ready_controller();
        let (ticket, _) = controller.begin_run().unwrap();
        let (handle, _registration) = AbortHandle::new_pair();
        controller.attach_abort(ticket, handle.clone());

        controller.teardown();
        assert!(handle.is_aborted());
        assert!(!controller.finish_run(ticket, Ok(benign())));
        assert!(controller.result().is_none());
        assert!(controller.error_message().is_none());
    }

    #[test]
    fn late_abort_handle_is_aborted_immediately() {
        let (mut controller, _) = ready_controller();
        let (ticket, _) = controller.begin_run().unwrap();
        controller.teardown();

        let (handle, _registration) = AbortHandle::new_pair();
        controller.attach_abort(ticket, handle.clone());
        assert!(handle.is_aborted());
    }

    #[test]
    fn read_failure_resets_selection() {
        let mut controller = UploadController::new(ModelConfig::default());
        let id = controller.select_file(png_info()).unwrap();
        assert!(controller.file_read_failed(id, "Failed to read file"));
        assert_eq!(controller.selected_name(), None);
        assert_eq!(controller.error_message(), Some("Failed to read file"));
    }
}
