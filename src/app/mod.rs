mod result_view;
mod state;
mod ui;

use crate::api::{ResumeBackend, SelectedFile};
use crate::auth;
use crate::config::Config;
use crate::session::Session;
use crate::utils::color;
use crate::workflow::AnalysisWorkflow;
use eframe::{egui, App};
pub use state::{AuthForm, AuthMode, AuthProgress, Screen};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

const BUSY_REPAINT: Duration = Duration::from_millis(100);

pub struct ResumeAnalyzer {
    backend: Arc<dyn ResumeBackend>,
    session: Session,
    screen: Screen,
    auth_form: AuthForm,
    workflow: AnalysisWorkflow,
}

impl ResumeAnalyzer {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &Config,
        backend: Arc<dyn ResumeBackend>,
        session: Session,
    ) -> Self {
        color::apply_theme(&cc.egui_ctx);
        let screen = Screen::initial(&session);
        info!(?screen, api = %config.api_url, "Initializing AI Resume Analyzer");

        Self {
            workflow: AnalysisWorkflow::new(Arc::clone(&backend), config.alert_duration),
            backend,
            session,
            screen,
            auth_form: AuthForm::default(),
        }
    }

    fn navigate(&mut self, screen: Screen) {
        if self.screen != screen {
            self.auth_form.error = None;
            self.auth_form.notice = None;
            self.screen = screen;
        }
    }

    pub fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .pick_file()
        {
            self.workflow.select_file(SelectedFile::from_path(path));
        }
    }

    pub fn open_selected(&self) {
        if let Some(file) = self.workflow.selected_file() {
            if let Err(e) = open::that(file.path()) {
                error!(file = %file.name, "Failed to open resume: {}", e);
            }
        }
    }

    pub fn submit_auth(&mut self, mode: AuthMode) {
        self.auth_form
            .submit(mode, Arc::clone(&self.backend), self.session.clone());
    }

    pub fn logout(&mut self) {
        if let Err(e) = auth::logout(&self.session) {
            error!("Failed to clear session: {}", e);
        }
        self.auth_form.reset();
        self.navigate(Screen::Login);
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        if self.workflow.poll() {
            ctx.request_repaint();
        }

        if let Some((mode, AuthProgress::Succeeded)) = self.auth_form.poll() {
            self.navigate(mode.next_screen());
            self.auth_form.notice = mode.success_notice().map(str::to_string);
            ctx.request_repaint();
        }

        let now = Instant::now();
        if self.workflow.tick_alert(now) {
            ctx.request_repaint();
        }

        if self.workflow.is_loading() || self.auth_form.is_submitting() {
            ctx.request_repaint_after(BUSY_REPAINT);
        } else if let Some(remaining) = self.workflow.alert().remaining(now) {
            ctx.request_repaint_after(remaining);
        }
    }
}

impl App for ResumeAnalyzer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
