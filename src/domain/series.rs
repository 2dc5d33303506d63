use std::fmt;

use crate::domain::bands::BandName;
use crate::domain::instrument::InstrumentId;

/// Which part of a band a series draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BandSign {
    /// The mean line itself
    Center,
    Upper,
    Lower,
    /// Filled area between upper and lower
    Fill,
}

impl BandSign {
    fn symbol(self) -> &'static str {
        match self {
            BandSign::Center => "mid",
            BandSign::Upper => "+",
            BandSign::Lower => "-",
            BandSign::Fill => "fill",
        }
    }
}

/// Stable key for one logical plotted element, independent of its render handle.
///
/// Instrument-owned roles carry the instrument; band roles belong to the basket
/// as a whole. Encoding the owner in the variant keeps keys collision-free no
/// matter what an instrument happens to be called.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeriesIdentity {
    Primary(InstrumentId),
    Band { name: BandName, sign: BandSign },
    Indicator(InstrumentId),
}

impl SeriesIdentity {
    pub fn primary(id: impl Into<InstrumentId>) -> Self {
        SeriesIdentity::Primary(id.into())
    }

    pub fn indicator(id: impl Into<InstrumentId>) -> Self {
        SeriesIdentity::Indicator(id.into())
    }

    pub fn band(name: BandName, sign: BandSign) -> Self {
        SeriesIdentity::Band { name, sign }
    }

    pub fn instrument(&self) -> Option<&InstrumentId> {
        match self {
            SeriesIdentity::Primary(id) | SeriesIdentity::Indicator(id) => Some(id),
            SeriesIdentity::Band { .. } => None,
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, SeriesIdentity::Primary(_))
    }
}

/// Deterministic string form, e.g. "BTCUSDT/primary" or "basket/band:band2:+".
impl fmt::Display for SeriesIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesIdentity::Primary(id) => write!(f, "{}/primary", id),
            SeriesIdentity::Indicator(id) => write!(f, "{}/indicator", id),
            SeriesIdentity::Band { name, sign } => {
                write!(f, "basket/band:{}:{}", name, sign.symbol())
            }
        }
    }
}

/// Current styling of a registered series.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleState {
    Visible,
    Transparent,
}

impl StyleState {
    pub fn from_membership(visible: bool) -> Self {
        if visible {
            StyleState::Visible
        } else {
            StyleState::Transparent
        }
    }
}
