use crate::workflow::alert::Severity;
use eframe::egui::{self, Color32};

pub const PRIMARY: &str = "#00bcd4";
pub const SECONDARY: &str = "#ff9800";
pub const BACKGROUND: &str = "#121212";
pub const PAPER: &str = "#1e1e1e";
pub const APP_BAR: &str = "#1f1f1f";

pub trait ColorExt {
    fn from_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;
}

impl ColorExt for Color32 {
    fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Color32::from_rgb(r, g, b))
    }
}

pub fn palette(hex: &str) -> Color32 {
    Color32::from_hex(hex).unwrap_or(Color32::GRAY)
}

pub fn severity_color(severity: Severity) -> Color32 {
    match severity {
        Severity::Info => palette("#29b6f6"),
        Severity::Success => palette("#66bb6a"),
        Severity::Warning => palette("#ffa726"),
        Severity::Error => palette("#f44336"),
    }
}

/// Dark visuals with the cyan accent.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = palette(BACKGROUND);
    visuals.window_fill = palette(PAPER);
    visuals.extreme_bg_color = palette(PAPER);
    visuals.selection.bg_fill = palette(PRIMARY).gamma_multiply(0.6);
    visuals.hyperlink_color = palette(PRIMARY);
    ctx.set_visuals(visuals);
}
