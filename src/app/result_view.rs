use crate::api::AnalysisResult;
use crate::utils::color::{self, palette};
use eframe::egui::{self, Color32, RichText};

/// Skills, summary, suggestions, then score. Read-only.
pub fn render(ui: &mut egui::Ui, analysis: &AnalysisResult) {
    egui::Frame::group(ui.style())
        .fill(palette(color::PAPER))
        .inner_margin(egui::Margin::same(16.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());

            section(ui, "Skills:");
            ui.horizontal_wrapped(|ui| {
                for skill in &analysis.skills {
                    chip(ui, skill);
                }
            });

            ui.separator();
            section(ui, "Summary:");
            ui.label(&analysis.summary);

            ui.separator();
            section(ui, "Suggestions:");
            for line in numbered(&analysis.suggestions) {
                ui.label(line);
            }

            ui.separator();
            section(ui, "Job Fit Score:");
            ui.label(RichText::new(analysis.score_label()).size(18.0).strong());
        });
}

fn section(ui: &mut egui::Ui, title: &str) {
    ui.add_space(6.0);
    ui.label(RichText::new(title).heading());
    ui.add_space(4.0);
}

fn chip(ui: &mut egui::Ui, text: &str) {
    egui::Frame::none()
        .fill(palette(color::PRIMARY))
        .rounding(12.0)
        .inner_margin(egui::Margin::symmetric(10.0, 4.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(Color32::BLACK));
        });
}

fn numbered(items: &[String]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect()
}
