use super::result_view;
use super::{AuthMode, ResumeAnalyzer, Screen};
use crate::utils::color::{self, palette, severity_color};
use crate::utils::file_size::format_size;
use crate::workflow::alert::Severity;
use eframe::egui::{self, Align, Align2, Color32, RichText};

impl ResumeAnalyzer {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("app_bar")
            .frame(
                egui::Frame::none()
                    .fill(palette(color::APP_BAR))
                    .inner_margin(egui::Margin::symmetric(16.0, 10.0)),
            )
            .show(ctx, |ui| self.render_app_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                match self.screen {
                    Screen::Login => self.render_auth(ui, AuthMode::Login),
                    Screen::Register => self.render_auth(ui, AuthMode::Register),
                    Screen::Upload => self.render_upload(ui),
                }
                ui.add_space(20.0);
            });
        });

        self.render_alert(ctx);
    }

    fn render_app_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("AI Resume Analyzer").color(Color32::WHITE));

            if self.session.is_authenticated() {
                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Logout").clicked() {
                        self.logout();
                    }
                    if ui.button("Upload Resume").clicked() {
                        self.navigate(Screen::Upload);
                    }
                });
            }
        });
    }

    fn render_auth(&mut self, ui: &mut egui::Ui, mode: AuthMode) {
        let (title, action, accent) = match mode {
            AuthMode::Login => ("Login", "Sign In", palette(color::PRIMARY)),
            AuthMode::Register => ("Register", "Sign Up", palette(color::SECONDARY)),
        };

        ui.vertical_centered(|ui| {
            ui.set_max_width(360.0);
            ui.heading(title);
            ui.add_space(16.0);

            if let Some(error) = &self.auth_form.error {
                ui.colored_label(severity_color(Severity::Error), error);
                ui.add_space(8.0);
            }
            if let Some(notice) = &self.auth_form.notice {
                ui.colored_label(severity_color(Severity::Success), notice);
                ui.add_space(8.0);
            }

            let enabled = !self.auth_form.is_submitting();
            ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(&mut self.auth_form.credentials.email)
                    .hint_text("Email")
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(8.0);
            let password = ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(&mut self.auth_form.credentials.password)
                    .hint_text("Password")
                    .password(true)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(12.0);

            let submitted_with_enter =
                password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let button = egui::Button::new(RichText::new(action).color(Color32::BLACK))
                .fill(accent)
                .min_size(egui::vec2(ui.available_width(), 36.0));
            let clicked = ui.add_enabled(self.auth_form.can_submit(), button).clicked();

            if (clicked || submitted_with_enter) && self.auth_form.can_submit() {
                self.submit_auth(mode);
            }

            if self.auth_form.is_submitting() {
                ui.add_space(8.0);
                ui.spinner();
            }

            ui.add_space(12.0);
            let (switch_text, switch_to) = match mode {
                AuthMode::Login => ("Don't have an account? Register", Screen::Register),
                AuthMode::Register => ("Already registered? Sign in", Screen::Login),
            };
            let switch = ui.add_enabled(
                !self.auth_form.is_submitting(),
                egui::Link::new(switch_text),
            );
            if switch.clicked() {
                self.navigate(switch_to);
            }
        });
    }

    fn render_upload(&mut self, ui: &mut egui::Ui) {
        ui.heading("Upload Your Resume");
        ui.add_space(10.0);

        egui::Frame::group(ui.style())
            .fill(palette(color::PAPER))
            .inner_margin(egui::Margin::same(16.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!self.workflow.is_loading(), egui::Button::new("📄 Select PDF"))
                        .clicked()
                    {
                        self.pick_file();
                    }

                    let selected = self
                        .workflow
                        .selected_file()
                        .map(|file| match file.size() {
                            Some(size) => format!("{} ({})", file.name, format_size(size)),
                            None => file.name.clone(),
                        });
                    match selected {
                        Some(label) => {
                            ui.label(label);
                            if ui.small_button("Open").clicked() {
                                self.open_selected();
                            }
                        }
                        None => {
                            ui.label(
                                RichText::new("No file selected")
                                    .color(ui.visuals().text_color().gamma_multiply(0.6)),
                            );
                        }
                    }
                });

                ui.add_space(12.0);
                let loading = self.workflow.is_loading();
                let label = if loading { "⏳ Analyzing..." } else { "Analyze Resume" };
                let button = egui::Button::new(RichText::new(label).color(Color32::BLACK))
                    .fill(palette(color::PRIMARY))
                    .min_size(egui::vec2(200.0, 36.0));
                if ui.add_enabled(!loading, button).clicked() {
                    self.workflow.run_analysis();
                }

                if loading {
                    ui.add_space(12.0);
                    ui.label(self.workflow.phase().label());
                    ui.add(
                        egui::ProgressBar::new(0.0)
                            .animate(true)
                            .fill(palette(color::PRIMARY)),
                    );
                }

                if let Some(failure) = self.workflow.failure() {
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new(failure.step())
                            .small()
                            .color(severity_color(Severity::Error)),
                    );
                }
            });

        if let Some(analysis) = self.workflow.analysis() {
            ui.add_space(20.0);
            ui.separator();
            ui.add_space(20.0);
            result_view::render(ui, analysis);
        }
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let alert = self.workflow.alert();
        if !alert.is_visible() {
            return;
        }
        let message = alert.message().to_string();
        let tint = severity_color(alert.severity());

        let mut dismissed = false;
        egui::Area::new("alert")
            .anchor(Align2::CENTER_BOTTOM, [0.0, -24.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(tint.gamma_multiply(0.25))
                    .stroke(egui::Stroke::new(1.0, tint))
                    .inner_margin(egui::Margin::symmetric(14.0, 10.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(tint, &message);
                            ui.add_space(12.0);
                            if ui.small_button("✖").clicked() {
                                dismissed = true;
                            }
                        });
                    });
            });

        if dismissed {
            self.workflow.dismiss_alert();
        }
    }
}
