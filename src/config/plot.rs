//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    /// Gradient stops the instrument palette is sampled from
    pub instrument_gradient_colors: &'static [&'static str],
    /// Line width of a visible primary line/area series
    pub primary_line_width: f32,
    /// Candle body width as a fraction of the candle interval
    pub candle_body_fraction: f64,
    pub candle_up_color: Color32,
    pub candle_down_color: Color32,
    /// Fill opacity applied to band areas (multiplied with the level opacity)
    pub band_fill_opacity_pct: f32,
    /// Height (px) of the main price pane
    pub main_pane_height: f32,
    /// Height (px) given to the indicator pane when a mode is enabled
    pub indicator_pane_height: f32,
    /// Marker radius in the indicator pane
    pub marker_radius: f32,
    pub mean_proximity_marker_color: Color32,
    pub breach_up_marker_color: Color32,
    pub breach_down_marker_color: Color32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    // Hue sweep with no near-black stop, so every line reads on a dark background
    instrument_gradient_colors: &[
        "#4b0082", // Indigo
        "#1e90ff", // Dodger blue
        "#00c853", // Green
        "#ffb703", // Amber
        "#ff4500", // Orange red
        "#d81b60", // Pink
    ],
    primary_line_width: 1.5,
    candle_body_fraction: 0.7,
    candle_up_color: Color32::from_rgb(0, 200, 0),
    candle_down_color: Color32::from_rgb(200, 0, 0),
    band_fill_opacity_pct: 0.15,
    main_pane_height: 420.0,
    indicator_pane_height: 120.0,
    marker_radius: 4.0,
    mean_proximity_marker_color: Color32::from_rgb(0, 191, 255),
    breach_up_marker_color: Color32::from_rgb(0, 200, 0),
    breach_down_marker_color: Color32::from_rgb(200, 0, 0),
};
