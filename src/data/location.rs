use crate::error::{Error, Result};

/// Standardized location of a sounding.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub srs_name: String,
    pub long: f64,
    pub lat: f64,
}

/// Dutch national grid (RD New, EPSG:28992) coordinate [m].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RdCoordinate {
    pub x: f64,
    pub y: f64,
}

// Reference point Amersfoort in WGS84 and RD.
const PHI_0: f64 = 52.155_174_40;
const LAM_0: f64 = 5.387_206_21;
const X_0: f64 = 155_000.0;
const Y_0: f64 = 463_000.0;

// (power of dphi, power of dlam, coefficient)
const R: [(i32, i32, f64); 9] = [
    (0, 1, 190_094.945),
    (1, 1, -11_832.228),
    (2, 1, -114.221),
    (0, 3, -32.391),
    (1, 0, -0.705),
    (3, 1, -2.340),
    (1, 3, -0.608),
    (0, 2, -0.008),
    (2, 3, 0.148),
];

const S: [(i32, i32, f64); 10] = [
    (1, 0, 309_056.544),
    (0, 2, 3_638.893),
    (2, 0, 73.077),
    (1, 2, -157.984),
    (3, 0, 59.788),
    (0, 1, 0.433),
    (2, 2, -6.439),
    (1, 1, -0.032),
    (0, 4, 0.092),
    (1, 4, -0.054),
];

impl Location {
    /// Whether `srs_name` denotes WGS84 geographic coordinates.
    pub fn is_wgs84(&self) -> bool {
        let srs = self.srs_name.trim().to_ascii_uppercase();
        srs == "WGS84" || srs.ends_with(":4326") || srs == "4326"
    }

    /// Convert to RD New with the polynomial approximation of
    /// Schreutelkamp & Strang van Hees (accurate to about a metre).
    pub fn to_rd_new(&self) -> Result<RdCoordinate> {
        if !self.is_wgs84() {
            return Err(Error::UnsupportedSrs(self.srs_name.clone()));
        }
        let dphi = 0.36 * (self.lat - PHI_0);
        let dlam = 0.36 * (self.long - LAM_0);
        let series = |terms: &[(i32, i32, f64)]| -> f64 {
            terms
                .iter()
                .map(|&(p, q, c)| c * dphi.powi(p) * dlam.powi(q))
                .sum()
        };
        Ok(RdCoordinate {
            x: X_0 + series(&R),
            y: Y_0 + series(&S),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, long: f64) -> Location {
        Location {
            srs_name: "EPSG:4326".into(),
            long,
            lat,
        }
    }

    #[test]
    fn amersfoort_is_the_origin() {
        let rd = at(PHI_0, LAM_0).to_rd_new().unwrap();
        assert!((rd.x - X_0).abs() < 1e-6);
        assert!((rd.y - Y_0).abs() < 1e-6);
    }

    #[test]
    fn dam_square_lands_in_the_expected_grid_cell() {
        // Dam square, Amsterdam: roughly RD (121 400, 487 400).
        let rd = at(52.3731, 4.8926).to_rd_new().unwrap();
        assert!((rd.x - 121_400.0).abs() < 200.0, "x = {}", rd.x);
        assert!((rd.y - 487_400.0).abs() < 200.0, "y = {}", rd.y);
    }

    #[test]
    fn other_systems_are_rejected() {
        let loc = Location {
            srs_name: "EPSG:28992".into(),
            long: 1.0,
            lat: 1.0,
        };
        assert!(matches!(loc.to_rd_new(), Err(Error::UnsupportedSrs(_))));
    }
}
