use eframe::egui::Color32;

/// Panel and text colors
#[derive(Clone, Copy)]
pub struct UiColors {
    /// Dimmed text: hidden instruments, captions, metric names
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    /// Status bar values
    pub metric_value: Color32,
    pub error: Color32,
    pub selection: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
}

#[derive(Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub side_panel_min_width: f32,
    /// Instruments list stops growing past this and scrolls
    pub instrument_list_max_height: f32,
    /// Vertical gap above a section heading (half of it goes below)
    pub section_spacing: f32,
    /// Edge length of the color chip next to an instrument name
    pub color_chip_size: f32,
}

pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,
        heading: Color32::from_rgb(255, 215, 0), // same gold as the mean line
        subsection_heading: Color32::ORANGE,
        metric_value: Color32::from_rgb(230, 230, 230),
        error: Color32::from_rgb(255, 100, 100),
        selection: Color32::from_rgb(40, 70, 110),
        central_panel: Color32::from_rgb(20, 20, 24),
        side_panel: Color32::from_rgb(25, 25, 25),
    },
    side_panel_min_width: 220.0,
    instrument_list_max_height: 180.0,
    section_spacing: 10.0,
    color_chip_size: 10.0,
};
