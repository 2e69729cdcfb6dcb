//! PM2.5 to Air Quality Index conversion.
//!
//! Concentrations are mapped onto the 0-500 index by linear interpolation
//! inside the published US EPA breakpoint bands, then classified into one of
//! six health categories.

use thiserror::Error;

/// Highest index on the scale; concentrations above the last band clamp here.
pub const MAX_INDEX: u16 = 500;

/// One concentration band and the index range it maps onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// µg/m³, inclusive
    pub conc_low: f64,
    /// µg/m³, inclusive
    pub conc_high: f64,
    pub index_low: u16,
    pub index_high: u16,
}

const fn band(conc_low: f64, conc_high: f64, index_low: u16, index_high: u16) -> Breakpoint {
    Breakpoint {
        conc_low,
        conc_high,
        index_low,
        index_high,
    }
}

/// PM2.5 breakpoints, ascending and contiguous.
pub const PM25_BREAKPOINTS: [Breakpoint; 7] = [
    band(0.0, 12.0, 0, 50),
    band(12.1, 35.4, 51, 100),
    band(35.5, 55.4, 101, 150),
    band(55.5, 150.4, 151, 200),
    band(150.5, 250.4, 201, 300),
    band(250.5, 350.4, 301, 400),
    band(350.5, 500.4, 401, 500),
];

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AqiError {
    #[error("PM2.5 concentration must be finite and non-negative, got {0}")]
    InvalidConcentration(f64),
}

impl AqiError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AqiError::InvalidConcentration(_) => {
                "The air quality reading was invalid. Please try again later."
            }
        }
    }
}

/// Health category for an index value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Category for an index. Each range is inclusive and boundary values
    /// belong to the lower category.
    pub fn from_index(index: u16) -> Self {
        match index {
            0..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthySensitive,
            151..=200 => Self::Unhealthy,
            201..=300 => Self::VeryUnhealthy,
            _ => Self::Hazardous,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }

    /// Health advisory; empty for categories that need none
    pub fn advisory(&self) -> &'static str {
        match self {
            Self::Good | Self::Moderate => "",
            Self::UnhealthySensitive => "sensitive groups should wear masks",
            Self::Unhealthy => "air is unhealthy, wear a mask",
            Self::VeryUnhealthy => "avoid outdoor activities",
            Self::Hazardous => "emergency conditions",
        }
    }
}

/// A classified index value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiResult {
    pub index: u16,
    pub label: AqiCategory,
    pub advisory: &'static str,
}

/// Convert a PM2.5 concentration (µg/m³) to an index in 0..=500.
///
/// Concentrations above the last band return [`MAX_INDEX`]. Values in the
/// 0.1-wide gaps between published bands (e.g. 12.05) are evaluated at the
/// lower edge of the following band. Negative, NaN and infinite inputs are
/// rejected.
pub fn compute_index(pm25: f64) -> Result<u16, AqiError> {
    if !pm25.is_finite() || pm25 < 0.0 {
        return Err(AqiError::InvalidConcentration(pm25));
    }

    let Some(bp) = PM25_BREAKPOINTS.iter().find(|bp| pm25 <= bp.conc_high) else {
        return Ok(MAX_INDEX);
    };

    let conc = pm25.max(bp.conc_low);
    let slope = f64::from(bp.index_high - bp.index_low) / (bp.conc_high - bp.conc_low);
    let index = slope * (conc - bp.conc_low) + f64::from(bp.index_low);

    // Bounded by the band's index range, so the cast cannot truncate.
    Ok(index.round() as u16)
}

/// Map an index to its category and advisory.
pub fn classify(index: u16) -> AqiResult {
    let label = AqiCategory::from_index(index);
    AqiResult {
        index,
        label,
        advisory: label.advisory(),
    }
}

/// [`compute_index`] followed by [`classify`].
pub fn normalize(pm25: f64) -> Result<AqiResult, AqiError> {
    compute_index(pm25).map(classify)
}
