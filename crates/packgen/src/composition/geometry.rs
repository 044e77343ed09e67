//! Prism geometry helpers.
use std::f64::consts::TAU;

use crate::error::{Error, Result};

/// Checks that `sides`, `radius` and `height` describe a regular prism.
pub fn validate_prism(sides: u32, radius: f64, height: f64) -> Result<()> {
    if sides < 3 {
        return Err(Error::InvalidGeometry(format!(
            "a prism needs at least 3 sides, got {sides}"
        )));
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(Error::InvalidGeometry(format!(
            "radius must be > 0, got {radius}"
        )));
    }
    if !(height.is_finite() && height > 0.0) {
        return Err(Error::InvalidGeometry(format!(
            "height must be > 0, got {height}"
        )));
    }
    Ok(())
}

/// Volume of a right prism over a regular polygon with circumradius `radius`.
///
/// `0.5 * sides * radius^2 * sin(2π / sides) * height`
pub fn prism_volume(sides: u32, radius: f64, height: f64) -> Result<f64> {
    validate_prism(sides, radius, height)?;
    let n = f64::from(sides);
    Ok(0.5 * n * radius * radius * (TAU / n).sin() * height)
}

/// Radius of the sphere circumscribing a prism, used to keep freshly placed
/// particles from overlapping.
#[inline]
pub fn self_avoidance_radius(radius: f64, height: f64) -> f64 {
    radius.hypot(height * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hexagonal_prism_volume() {
        let v = prism_volume(6, 0.1, 0.2).unwrap();
        assert!((v - 0.005196152).abs() < 1e-8, "got {v}");
    }

    #[test]
    fn many_sides_approach_cylinder() {
        let v = prism_volume(10_000, 1.0, 1.0).unwrap();
        assert!((v - std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn degenerate_shapes_are_rejected() {
        for sides in [0, 1, 2] {
            assert!(matches!(
                prism_volume(sides, 1.0, 1.0),
                Err(Error::InvalidGeometry(_))
            ));
        }
        assert!(matches!(
            prism_volume(3, 0.0, 1.0),
            Err(Error::InvalidGeometry(_))
        ));
        assert!(matches!(
            prism_volume(3, 1.0, -1.0),
            Err(Error::InvalidGeometry(_))
        ));
        assert!(matches!(
            prism_volume(3, f64::NAN, 1.0),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn self_avoidance_radius_covers_corners() {
        assert!((self_avoidance_radius(3.0, 8.0) - 5.0).abs() < 1e-12);
    }
}
