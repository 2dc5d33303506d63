use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// How primary instrument series are drawn. Switching it is the only event
/// that rebuilds the whole primary registry.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Area,
    Candlestick,
}

/// What the indicator pane shows. Anything other than `Disabled` keeps the pane alive.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display,
)]
#[serde(rename_all = "camelCase")]
pub enum IndicatorMode {
    #[default]
    Disabled,
    /// Close within a small distance of the basket mean
    #[strum(to_string = "Mean proximity")]
    MeanProximity,
    /// Close outside the band1 envelope
    #[strum(to_string = "Band breach")]
    BandBreach,
}

impl IndicatorMode {
    pub fn is_enabled(self) -> bool {
        self != IndicatorMode::Disabled
    }
}
