use eframe::egui::{Color32, RichText, Sense, Ui, Vec2};

use crate::ui::config::UI_CONFIG;

/// Semantic text styles shared by the side panel and the status bar.
pub trait UiStyleExt {
    /// Small dimmed caption.
    fn label_subdued(&mut self, text: impl Into<String>);

    /// "name: value", the value drawn in `color`.
    fn metric(&mut self, name: &str, value: impl ToString, color: Color32);

    fn label_error(&mut self, text: impl Into<String>);

    /// Filled square swatch, e.g. an instrument's line color.
    fn color_chip(&mut self, color: Color32);
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(UI_CONFIG.colors.label));
    }

    fn metric(&mut self, name: &str, value: impl ToString, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 3.0;
            ui.label_subdued(format!("{name}:"));
            ui.label(RichText::new(value.to_string()).small().strong().color(color));
        });
    }

    fn label_error(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(UI_CONFIG.colors.error));
    }

    fn color_chip(&mut self, color: Color32) {
        let (rect, _) = self.allocate_exact_size(Vec2::splat(UI_CONFIG.color_chip_size), Sense::hover());
        self.painter().rect_filled(rect, 2.0, color);
    }
}
