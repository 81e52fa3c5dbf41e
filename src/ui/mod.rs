pub mod panels;
pub mod plot;
pub mod table;

use eframe::egui::Color32;

use crate::color::Rgb;

pub fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}
