/// Every user-facing string in one place.
pub struct UiText {
    pub app_title: &'static str,
    pub plot_x_axis: &'static str,
    pub plot_y_axis: &'static str,

    pub chart_heading: &'static str,
    pub chart_type_label: &'static str,
    pub indicator_label: &'static str,
    pub anchor_label: &'static str,
    pub anchor_helper: &'static str,
    pub reset_view: &'static str,

    pub instruments_heading: &'static str,
    pub show_all: &'static str,
    pub hide_all: &'static str,

    pub bands_heading: &'static str,
    pub bands_enabled: &'static str,
    pub cumulative_mode: &'static str,
    pub filled_areas: &'static str,
    pub sigma_label: &'static str,
    pub opacity_label: &'static str,
    pub weight_label: &'static str,
    pub reset_defaults: &'static str,

    pub status_no_data: &'static str,
    pub status_bands: &'static str,
}

pub const UI_TEXT: UiText = UiText {
    app_title: "Sigma Bands",
    plot_x_axis: "Time (UTC)",
    plot_y_axis: "Price",

    chart_heading: "Chart",
    chart_type_label: "Series type",
    indicator_label: "Indicator pane",
    anchor_label: "Cumulative anchor",
    anchor_helper: "Where the cumulative bands rebase, as a fraction of the loaded range",
    reset_view: "Reset view",

    instruments_heading: "Instruments",
    show_all: "All",
    hide_all: "None",

    bands_heading: "Statistical bands",
    bands_enabled: "Show bands",
    cumulative_mode: "Cumulative (rebased VWAP)",
    filled_areas: "Fill between bands",
    sigma_label: "σ",
    opacity_label: "Opacity",
    weight_label: "Width",
    reset_defaults: "Reset to defaults",

    status_no_data: "No data loaded",
    status_bands: "band points",
};
