pub mod alert;

use crate::api::{AnalysisResult, ApiError, ResumeBackend, SelectedFile};
use crate::utils::background;
use alert::{AlertState, Severity};
use derivative::Derivative;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub const NO_FILE_MESSAGE: &str = "Please select a PDF resume.";
pub const SUCCESS_MESSAGE: &str = "Analysis completed successfully.";
pub const FAILURE_MESSAGE: &str = "Failed to analyze resume.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    Analyzing,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "",
            Phase::Uploading => "📤 Uploading resume...",
            Phase::Analyzing => "🔎 Analyzing resume...",
            Phase::Succeeded => "✅ Analysis complete",
            Phase::Failed => "❌ Analysis failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("upload failed: {0}")]
    Upload(#[source] ApiError),

    #[error("analysis failed: {0}")]
    Analyze(#[source] ApiError),

    #[error("analysis task stopped before reporting a result")]
    Interrupted,
}

impl WorkflowError {
    /// Short description of the step that failed, shown under the alert.
    pub fn step(&self) -> &'static str {
        match self {
            WorkflowError::Upload(_) => "The resume could not be uploaded.",
            WorkflowError::Analyze(_) => "The resume was uploaded but could not be analyzed.",
            WorkflowError::Interrupted => "The analysis was interrupted.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Started,
    MissingFile,
    AlreadyRunning,
}

#[derive(Debug)]
enum EventKind {
    Progress(Phase),
    Finished(Result<AnalysisResult, WorkflowError>),
}

#[derive(Debug)]
struct WorkflowEvent {
    generation: u64,
    kind: EventKind,
}

/// Guarantees exactly one `Finished` event per run, even if the task is
/// dropped or panics before it reports.
struct CompletionGuard {
    generation: u64,
    sender: Option<Sender<WorkflowEvent>>,
}

impl CompletionGuard {
    fn new(generation: u64, sender: Sender<WorkflowEvent>) -> Self {
        Self {
            generation,
            sender: Some(sender),
        }
    }

    fn progress(&self, phase: Phase) {
        if let Some(sender) = &self.sender {
            sender
                .send(WorkflowEvent {
                    generation: self.generation,
                    kind: EventKind::Progress(phase),
                })
                .unwrap_or_default();
        }
    }

    fn finish(mut self, outcome: Result<AnalysisResult, WorkflowError>) {
        if let Some(sender) = self.sender.take() {
            sender
                .send(WorkflowEvent {
                    generation: self.generation,
                    kind: EventKind::Finished(outcome),
                })
                .unwrap_or_default();
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            sender
                .send(WorkflowEvent {
                    generation: self.generation,
                    kind: EventKind::Finished(Err(WorkflowError::Interrupted)),
                })
                .unwrap_or_default();
        }
    }
}

/// Uploads `file` and asks the backend to analyze the extracted text.
pub async fn analyze_file(
    backend: &dyn ResumeBackend,
    file: &SelectedFile,
    on_phase: impl Fn(Phase),
) -> Result<AnalysisResult, WorkflowError> {
    on_phase(Phase::Uploading);
    let upload = backend
        .upload_file(file)
        .await
        .map_err(WorkflowError::Upload)?;
    debug!(resume_id = %upload.resume_id, chars = upload.text.len(), "Resume uploaded");

    on_phase(Phase::Analyzing);
    backend
        .analyze_text(&upload.text, &file.name)
        .await
        .map_err(WorkflowError::Analyze)
}

/// Drives file selection, the upload-then-analyze sequence, and the state
/// the upload screen renders from.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct AnalysisWorkflow {
    #[derivative(Debug = "ignore")]
    backend: Arc<dyn ResumeBackend>,
    selected_file: Option<SelectedFile>,
    loading: bool,
    phase: Phase,
    analysis: Option<AnalysisResult>,
    failure: Option<WorkflowError>,
    alert: AlertState,
    generation: u64,
    #[derivative(Debug = "ignore")]
    events: Option<Receiver<WorkflowEvent>>,
}

impl AnalysisWorkflow {
    pub fn new(backend: Arc<dyn ResumeBackend>, alert_duration: Duration) -> Self {
        Self {
            backend,
            selected_file: None,
            loading: false,
            phase: Phase::Idle,
            analysis: None,
            failure: None,
            alert: AlertState::new(alert_duration),
            generation: 0,
            events: None,
        }
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        info!(file = %file.name, "Selected resume");
        self.selected_file = Some(file);
    }

    pub fn run_analysis(&mut self) -> RunOutcome {
        if self.loading {
            warn!("Analysis already in progress, ignoring request");
            return RunOutcome::AlreadyRunning;
        }

        let Some(file) = self.selected_file.clone() else {
            self.alert.show(NO_FILE_MESSAGE, Severity::Warning);
            return RunOutcome::MissingFile;
        };

        self.generation += 1;
        let generation = self.generation;
        self.loading = true;
        self.phase = Phase::Uploading;
        self.failure = None;

        let (sender, receiver) = mpsc::channel();
        self.events = Some(receiver);

        info!(file = %file.name, generation, "Starting resume analysis");

        let backend = Arc::clone(&self.backend);
        background::spawn("resume-analysis", async move {
            let guard = CompletionGuard::new(generation, sender);
            let outcome = analyze_file(backend.as_ref(), &file, |phase| guard.progress(phase)).await;
            guard.finish(outcome);
        });

        RunOutcome::Started
    }

    /// Applies everything the background task has reported since the last
    /// call. Returns true if any state changed.
    pub fn poll(&mut self) -> bool {
        let mut events = Vec::new();
        let mut disconnected = false;

        if let Some(receiver) = &self.events {
            loop {
                match receiver.try_recv() {
                    Ok(event) => events.push(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }

        let mut changed = !events.is_empty();
        for event in events {
            self.apply(event);
        }

        if disconnected {
            self.events = None;
            if self.loading {
                self.finish(Err(WorkflowError::Interrupted));
                changed = true;
            }
        }

        changed
    }

    fn apply(&mut self, event: WorkflowEvent) {
        if event.generation != self.generation {
            debug!(
                event_generation = event.generation,
                current = self.generation,
                "Discarding stale workflow event"
            );
            return;
        }

        match event.kind {
            EventKind::Progress(phase) => {
                if self.loading {
                    self.phase = phase;
                }
            }
            EventKind::Finished(outcome) => self.finish(outcome),
        }
    }

    fn finish(&mut self, outcome: Result<AnalysisResult, WorkflowError>) {
        if !self.loading {
            return;
        }
        self.loading = false;

        match outcome {
            Ok(analysis) => {
                info!(
                    skills = analysis.skills.len(),
                    score = analysis.job_fit_score,
                    "Resume analysis completed"
                );
                self.analysis = Some(analysis);
                self.phase = Phase::Succeeded;
                self.alert.show(SUCCESS_MESSAGE, Severity::Success);
            }
            Err(e) => {
                error!("Resume analysis failed: {}", e);
                self.phase = Phase::Failed;
                self.failure = Some(e);
                self.alert.show(FAILURE_MESSAGE, Severity::Error);
            }
        }
    }

    pub fn tick_alert(&mut self, now: Instant) -> bool {
        self.alert.tick(now)
    }

    pub fn dismiss_alert(&mut self) {
        self.alert.dismiss();
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn failure(&self) -> Option<&WorkflowError> {
        self.failure.as_ref()
    }

    pub fn alert(&self) -> &AlertState {
        &self.alert
    }
}
