use qtty::Degrees;
use serde::{Deserialize, Serialize};

/// Equatorial target coordinates (ICRS, J2000).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoordinates {
    /// Right ascension in degrees
    pub ra: Degrees,
    /// Declination in degrees
    pub dec: Degrees,
}

impl EquatorialCoordinates {
    pub fn new(ra: Degrees, dec: Degrees) -> Self {
        Self { ra, dec }
    }

    /// Convenience constructor from raw degree values.
    pub fn from_degrees(ra: f64, dec: f64) -> Self {
        Self {
            ra: Degrees::new(ra),
            dec: Degrees::new(dec),
        }
    }
}

impl std::fmt::Display for EquatorialCoordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4}) deg", self.ra.value(), self.dec.value())
    }
}

#[cfg(test)]
mod tests {
    use super::EquatorialCoordinates;

    #[test]
    fn test_from_degrees() {
        let c = EquatorialCoordinates::from_degrees(54.51, -26.939);
        assert_eq!(c.ra.value(), 54.51);
        assert_eq!(c.dec.value(), -26.939);
    }

    #[test]
    fn test_display() {
        let c = EquatorialCoordinates::from_degrees(10.0, -5.0);
        assert_eq!(format!("{}", c), "(10.0000, -5.0000) deg");
    }
}
