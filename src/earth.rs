//! The WGS84 earth model.
//!
//! Everything in this crate that turns angles into distances (or back) goes through the
//! [`Ellipsoid`] defined here, almost always [`Ellipsoid::WGS84`]. The constants are the defining
//! parameters of [WGS84] plus a handful of derived values, and are fixed at compile time.
//!
//! [WGS84]: https://nsgreg.nga.mil/doc/view?i=4085

use uom::si::angle::radian;
use uom::si::f64::{Angle, Length};
use uom::si::length::meter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Parameters required for WGS84 ellipsoid
// https://nsgreg.nga.mil/doc/view?i=4085 table 3.1
/// Radius of the earth at the equator in meters.
#[doc(alias = "semi-major axis")]
#[doc(alias = "a")]
pub const EQUATORIAL_RADIUS: f64 = 6_378_137.0;

#[doc(alias = "1/f")]
const INVERSE_FLATTENING: f64 = 298.257_223_563;

/// Flattening of the WGS84 ellipsoid, `(a - b) / a`.
#[doc(alias = "f")]
pub const FLATTENING: f64 = 1.0 / INVERSE_FLATTENING;

// e^2 = 1 - b^2/a^2
//     = 1 - (1 - f)^2
//     = 2 * f - f^2
#[doc(alias = "e^2")]
const ECCENTRICITY_SQ: f64 = 2.0 * FLATTENING - FLATTENING * FLATTENING;

/// First eccentricity of the WGS84 ellipsoid.
///
/// This is `sqrt(2f - f²)`; it is spelled out as a literal because `sqrt` is not `const`.
#[doc(alias = "e")]
pub const ECCENTRICITY: f64 = 0.081_819_190_842_621_5;

/// Radius in meters of the sphere used for [great-circle distances].
///
/// [great-circle distances]: crate::GeodeticPoint::great_circle_distance
#[doc(alias = "R_m")]
pub const MEAN_RADIUS: f64 = 6_372_797.560_856;

/// Angular velocity of the earth about its polar axis in radians per second.
#[doc(alias = "omega")]
pub const ROTATION_RATE: f64 = 7.292_115e-5;

/// An oblate ellipsoid of revolution, described by its equatorial radius and flattening.
///
/// The radii of curvature are total functions of latitude: `1 - e² sin²(φ)` is at least `1 - e²`
/// for every finite `φ`, so latitudes outside [-90°, 90°] produce the same (finite) value as their
/// reflection and never divide by zero. A NaN latitude produces a NaN radius.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ellipsoid {
    equatorial_radius: f64,
    flattening: f64,
    eccentricity_sq: f64,
}

impl Ellipsoid {
    /// The [WGS84](https://en.wikipedia.org/wiki/World_Geodetic_System#WGS_84) reference ellipsoid.
    pub const WGS84: Ellipsoid = Ellipsoid {
        equatorial_radius: EQUATORIAL_RADIUS,
        flattening: FLATTENING,
        eccentricity_sq: ECCENTRICITY_SQ,
    };

    /// Constructs an ellipsoid from its equatorial radius (in meters) and flattening.
    #[must_use]
    pub const fn new(equatorial_radius: f64, flattening: f64) -> Self {
        Self {
            equatorial_radius,
            flattening,
            eccentricity_sq: 2.0 * flattening - flattening * flattening,
        }
    }

    #[must_use]
    pub fn equatorial_radius(&self) -> Length {
        Length::new::<meter>(self.equatorial_radius)
    }

    // b/a = 1 - f
    #[doc(alias = "polar radius")]
    #[must_use]
    pub fn semi_minor_axis(&self) -> Length {
        Length::new::<meter>(self.equatorial_radius * (1.0 - self.flattening))
    }

    #[must_use]
    pub fn flattening(&self) -> f64 {
        self.flattening
    }

    #[must_use]
    pub fn eccentricity_squared(&self) -> f64 {
        self.eccentricity_sq
    }

    #[must_use]
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_sq.sqrt()
    }

    /// Returns the radius of curvature of the meridian at the given latitude, usually called *M*.
    ///
    /// This is the factor that turns a small change in latitude (in radians) into a north-south
    /// distance:
    ///
    /// ```text
    /// M(φ) = a (1 - e²) / (1 - e² sin²(φ))^(3/2)
    /// ```
    #[doc(alias = "M")]
    #[doc(alias = "rho_lat")]
    #[must_use]
    pub fn meridian_radius(&self, latitude: impl Into<Angle>) -> Length {
        let w2 = self.w_squared(latitude.into());
        Length::new::<meter>(
            self.equatorial_radius * (1.0 - self.eccentricity_sq) / (w2 * w2.sqrt()),
        )
    }

    /// Returns the radius of curvature in the prime vertical at the given latitude, usually called
    /// *N*.
    ///
    /// Multiplied by `cos(φ)`, this turns a small change in longitude (in radians) into an
    /// east-west distance:
    ///
    /// ```text
    /// N(φ) = a / sqrt(1 - e² sin²(φ))
    /// ```
    #[doc(alias = "N")]
    #[doc(alias = "prime_vertical_radius")]
    #[must_use]
    pub fn normal_radius(&self, latitude: impl Into<Angle>) -> Length {
        let w2 = self.w_squared(latitude.into());
        Length::new::<meter>(self.equatorial_radius / w2.sqrt())
    }

    /// `1 - e² sin²(φ)`, shared by both radii of curvature.
    fn w_squared(&self, latitude: Angle) -> f64 {
        let sin_lat = latitude.get::<radian>().sin();
        1.0 - self.eccentricity_sq * sin_lat * sin_lat
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use uom::si::angle::degree;

    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    #[test]
    fn eccentricity_literal_matches_flattening() {
        assert_relative_eq!(ECCENTRICITY, Ellipsoid::WGS84.eccentricity(), epsilon = 1e-15);
        assert_relative_eq!(
            ECCENTRICITY * ECCENTRICITY,
            Ellipsoid::WGS84.eccentricity_squared(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn const_constructor_agrees_with_wgs84() {
        let rebuilt = Ellipsoid::new(EQUATORIAL_RADIUS, FLATTENING);
        assert_eq!(rebuilt, Ellipsoid::WGS84);
        assert_eq!(Ellipsoid::default(), Ellipsoid::WGS84);
    }

    #[test]
    fn semi_minor_axis_is_polar_radius() {
        assert_relative_eq!(
            Ellipsoid::WGS84.semi_minor_axis().get::<meter>(),
            6_356_752.314_245,
            epsilon = 1e-6
        );
    }

    // reference values from the closed-form expressions, cross-checked against
    // <https://en.wikipedia.org/wiki/Earth_radius#Radii_of_curvature>
    #[rstest]
    #[case(d(0.), 6_335_439.327_293, 6_378_137.0)]
    #[case(d(45.), 6_367_381.815_620, 6_388_838.290_121)]
    #[case(d(90.), 6_399_593.625_758, 6_399_593.625_758)]
    fn radii_of_curvature(#[case] lat: Angle, #[case] m: f64, #[case] n: f64) {
        let ellipsoid = Ellipsoid::WGS84;
        assert_relative_eq!(ellipsoid.meridian_radius(lat).get::<meter>(), m, epsilon = 1e-5);
        assert_relative_eq!(ellipsoid.normal_radius(lat).get::<meter>(), n, epsilon = 1e-5);
    }

    #[test]
    fn radii_are_symmetric_about_the_equator() {
        let ellipsoid = Ellipsoid::WGS84;
        for lat in [1., 17.5, 45., 63.2, 89.9] {
            assert_eq!(
                ellipsoid.meridian_radius(d(lat)),
                ellipsoid.meridian_radius(d(-lat))
            );
            assert_eq!(ellipsoid.normal_radius(d(lat)), ellipsoid.normal_radius(d(-lat)));
        }
    }

    #[test]
    fn radii_stay_finite_outside_latitude_range() {
        let ellipsoid = Ellipsoid::WGS84;
        for lat in [95., 180., -270., 1e6] {
            assert!(ellipsoid.meridian_radius(d(lat)).get::<meter>().is_finite());
            assert!(ellipsoid.normal_radius(d(lat)).get::<meter>().is_finite());
        }
    }

    #[test]
    fn radii_propagate_nan() {
        let ellipsoid = Ellipsoid::WGS84;
        assert!(ellipsoid.meridian_radius(d(f64::NAN)).get::<meter>().is_nan());
        assert!(ellipsoid.normal_radius(d(f64::NAN)).get::<meter>().is_nan());
    }
}
