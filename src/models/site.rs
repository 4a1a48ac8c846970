//! Observatory site definitions.
//!
//! A [`Site`] is a geodetic location with a symbolic name. Sites are
//! constructed once and shared read-only across all window searches.

use qtty::{Degrees, Meters};
use serde::{Deserialize, Serialize};

/// Geodetic observatory location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Symbolic site name, e.g. "CTA-North"
    pub name: String,
    /// Geodetic latitude in degrees (-90 to 90)
    pub latitude: Degrees,
    /// Geodetic longitude in degrees, east positive (-180 to 180)
    pub longitude: Degrees,
    /// Height above sea level in meters
    pub height: Meters,
}

impl Site {
    pub fn new(name: impl Into<String>, latitude: Degrees, longitude: Degrees, height: Meters) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            height,
        }
    }

    /// CTA North site at Roque de los Muchachos, La Palma.
    pub fn cta_north() -> Self {
        Self::new(
            "CTA-North",
            Degrees::new(28.7569),
            Degrees::new(-17.8925),
            Meters::new(2200.0),
        )
    }

    /// CTA South site near Cerro Paranal, Chile.
    pub fn cta_south() -> Self {
        Self::new(
            "CTA-South",
            Degrees::new(-24.6833),
            Degrees::new(-70.3167),
            Meters::new(2100.0),
        )
    }

    /// H.E.S.S. site in the Khomas Highland, Namibia.
    pub fn hess() -> Self {
        Self::new(
            "HESS",
            Degrees::new(-23.271778),
            Degrees::new(16.50022),
            Meters::new(1835.0),
        )
    }

    /// Look up one of the built-in sites by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "CTA-North" => Some(Self::cta_north()),
            "CTA-South" => Some(Self::cta_south()),
            "HESS" => Some(Self::hess()),
            _ => None,
        }
    }
}
