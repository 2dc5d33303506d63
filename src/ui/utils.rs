use eframe::egui::{Context, RichText, Ui, Visuals};

use crate::ui::config::UI_CONFIG;

/// Dark theme with the panel fills from `UI_CONFIG`.
pub fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();
    visuals.panel_fill = UI_CONFIG.colors.side_panel;
    visuals.window_fill = UI_CONFIG.colors.central_panel;
    visuals.extreme_bg_color = UI_CONFIG.colors.central_panel;
    visuals.selection.bg_fill = UI_CONFIG.colors.selection;
    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    ctx.set_visuals(visuals);
}

/// Uppercase section title with breathing room above and below.
pub fn section_heading(ui: &mut Ui, text: &str) {
    ui.add_space(UI_CONFIG.section_spacing);
    ui.label(
        RichText::new(text.to_uppercase())
            .heading()
            .strong()
            .color(UI_CONFIG.colors.heading),
    );
    ui.add_space(UI_CONFIG.section_spacing / 2.0);
}

pub fn subsection_label(text: &str) -> RichText {
    RichText::new(text).color(UI_CONFIG.colors.subsection_heading)
}

pub fn section_separator(ui: &mut Ui) {
    ui.add_space(UI_CONFIG.section_spacing);
    ui.separator();
}

/// Price with roughly four significant decimals, however small the price.
/// No currency sign: a basket may mix quote currencies.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "-".to_string();
    }
    let magnitude = price.abs();
    let decimals = if magnitude >= 1000.0 || magnitude == 0.0 {
        2
    } else if magnitude >= 1.0 {
        4
    } else {
        // Leading zeros after the point, plus significant digits
        ((-magnitude.log10().floor()) as usize + 3).min(10)
    };
    format!("{:.*}", decimals, price)
}
