use eframe::egui::{Color32, Stroke};

pub const GRID_COLUMNS: usize = 5;
pub const CARD_SIZE: [f32; 2] = [112.0, 64.0];
pub const CONTENT_MAX_WIDTH: f32 = 768.0;

pub const HEADING: Color32 = Color32::from_rgb(31, 41, 55);
pub const MUTED: Color32 = Color32::from_rgb(107, 114, 128);
pub const CARD_FILL: Color32 = Color32::from_rgb(229, 231, 235);
pub const ACCENT: Color32 = Color32::from_rgb(99, 102, 241);
pub const ERROR: Color32 = Color32::from_rgb(185, 28, 28);

pub fn selected_card_stroke() -> Stroke {
    Stroke::new(2.0, ACCENT)
}

pub fn card_stroke() -> Stroke {
    Stroke::new(1.0, CARD_FILL)
}
