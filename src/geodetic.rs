use crate::earth::MEAN_RADIUS;
use crate::error::{Error, Result};
use crate::util::BoundedAngle;
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::fmt::Display;
use std::marker::PhantomData;
use uom::si::f64::{Angle, Length};
use uom::si::{
    angle::{degree, radian},
    length::meter,
};
use uom::ConstZero;

#[cfg(any(test, feature = "approx"))]
use approx::AbsDiffEq;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An Earth-bound location given as latitude and longitude on the [WGS84] ellipsoid.
///
/// The latitude is guaranteed to be in [-90°, 90°]. The longitude is stored as given (any number
/// of turns east of the [IERS Reference Meridian]); [`GeodeticPoint::longitude`] reports it
/// folded into [-180°, 180°).
///
/// Deserialization goes through the same latitude check as [`GeodeticPoint::build`].
///
/// [WGS84]: https://en.wikipedia.org/wiki/World_Geodetic_System#WGS_84
/// [IERS Reference Meridian]: https://en.wikipedia.org/wiki/IERS_Reference_Meridian
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Components", into = "Components"))]
pub struct GeodeticPoint {
    pub(crate) latitude: Angle,
    pub(crate) longitude: Angle,
}

impl GeodeticPoint {
    /// Constructs a location from latitude and longitude.
    ///
    /// Returns [`Error::LatitudeOutOfRange`] if the latitude is not in [-90°, 90°]. A NaN latitude
    /// is accepted and will make every value derived from this point NaN.
    pub fn build(
        Components {
            latitude,
            longitude,
        }: Components,
    ) -> Result<Self> {
        Ok(Self::builder()
            .latitude(latitude)?
            .longitude(longitude)
            .build())
    }

    /// Constructs a location from latitude and longitude given in degrees.
    ///
    /// ```
    /// # use local_xy::GeodeticPoint;
    /// let zurich = GeodeticPoint::from_degrees(47.3769, 8.5417).expect("latitude is in-range");
    /// assert!(GeodeticPoint::from_degrees(91., 0.).is_err());
    /// ```
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64) -> Result<Self> {
        Self::build(Components {
            latitude: Angle::new::<degree>(latitude_deg),
            longitude: Angle::new::<degree>(longitude_deg),
        })
    }

    /// Provides a constructor for a [`GeodeticPoint`].
    pub fn builder() -> Builder<MissingLatitude, MissingLongitude> {
        Builder {
            under_construction: GeodeticPoint {
                latitude: Angle::ZERO,
                longitude: Angle::ZERO,
            },
            has: (PhantomData, PhantomData),
        }
    }

    /// Returns the angle north of the equator ("northing"), in [-90°, 90°].
    #[must_use]
    pub fn latitude(&self) -> Angle {
        self.latitude
    }

    /// Returns the angle east of the IERS Reference Meridian ("easting"), in [-180°, 180°).
    #[must_use]
    pub fn longitude(&self) -> Angle {
        BoundedAngle::new(self.longitude).to_signed_angle()
    }

    /// Computes the [great-circle distance] between two locations on the surface of the earth.
    ///
    /// The earth is approximated as a sphere of radius [`MEAN_RADIUS`], and the central angle is
    /// computed with the [haversine formula], which stays accurate for points that are very close
    /// together. The distance is symmetric, zero for identical points, and never exceeds half the
    /// circumference of that sphere.
    ///
    /// ```
    /// # use local_xy::GeodeticPoint;
    /// # use uom::si::length::kilometer;
    /// let a = GeodeticPoint::from_degrees(0., 0.).unwrap();
    /// let b = GeodeticPoint::from_degrees(0., 1.).unwrap();
    /// let distance = a.great_circle_distance(&b).get::<kilometer>();
    /// assert!((distance - 111.226).abs() < 1e-3);
    /// ```
    ///
    /// [great-circle distance]: https://en.wikipedia.org/wiki/Great-circle_distance
    /// [haversine formula]: https://en.wikipedia.org/wiki/Haversine_formula
    #[doc(alias = "haversine_distance")]
    #[must_use]
    pub fn great_circle_distance(&self, other: &GeodeticPoint) -> Length {
        let central_angle = central_angle_by_haversine(self, other);
        Length::new::<meter>(central_angle.get::<radian>() * MEAN_RADIUS)
    }
}

/// Computes the central angle between two points, in [0°, 180°].
///
/// To turn this angle into [great-circle distance], multiply by the radius of the sphere.
///
/// [great-circle distance]: https://en.wikipedia.org/wiki/Great-circle_distance
pub(crate) fn central_angle_by_haversine(a: &GeodeticPoint, b: &GeodeticPoint) -> Angle {
    let lat_a = a.latitude.get::<radian>(); // φ1
    let lat_b = b.latitude.get::<radian>(); // φ2
    let delta_lat = lat_b - lat_a;
    let delta_lon = b.longitude.get::<radian>() - a.longitude.get::<radian>();

    let sin_half_delta_lat = (0.5 * delta_lat).sin();
    let sin_half_delta_lon = (0.5 * delta_lon).sin();
    let haversine = sin_half_delta_lat * sin_half_delta_lat
        + lat_a.cos() * lat_b.cos() * sin_half_delta_lon * sin_half_delta_lon;
    // rounding can push near-antipodal points just past 1
    let haversine = haversine.clamp(0., 1.);

    Angle::new::<radian>(2. * haversine.sqrt().atan2((1. - haversine).sqrt()))
}

/// Fails unless `latitude` is in [-90°, 90°]; NaN passes through.
pub(crate) fn check_latitude(latitude: Angle) -> Result<Angle> {
    let radians = latitude.get::<radian>();
    if radians < -FRAC_PI_2 || radians > FRAC_PI_2 {
        let latitude_deg = latitude.get::<degree>();
        log::debug!("rejecting latitude {latitude_deg}° outside [-90°, 90°]");
        return Err(Error::LatitudeOutOfRange { latitude_deg });
    }
    Ok(latitude)
}

impl Display for GeodeticPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat = self.latitude();
        let lat_is_positive = lat.is_sign_positive();
        let lat = lat.abs().get::<degree>();
        let lon = self.longitude();
        let lon_is_positive = lon.is_sign_positive();
        let lon = lon.abs().get::<degree>();
        match (lat_is_positive, lon_is_positive) {
            (true, true) => write!(f, "{lat:.6}°N, {lon:.6}°E"),
            (true, false) => write!(f, "{lat:.6}°N, {lon:.6}°W"),
            (false, true) => write!(f, "{lat:.6}°S, {lon:.6}°E"),
            (false, false) => write!(f, "{lat:.6}°S, {lon:.6}°W"),
        }
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for GeodeticPoint {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        // one micrometer on the ground is far below anything a local tangent plane can resolve
        Length::new::<meter>(1e-6)
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.great_circle_distance(other) <= epsilon
    }
}

impl TryFrom<Components> for GeodeticPoint {
    type Error = Error;

    fn try_from(components: Components) -> Result<Self> {
        Self::build(components)
    }
}

impl From<GeodeticPoint> for Components {
    fn from(point: GeodeticPoint) -> Self {
        Components {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

/// A [`GeodeticPoint`] together with a heading.
///
/// The yaw is a right-handed rotation about the local vertical ("up"): zero when facing east,
/// and growing counter-clockwise as seen from above, so a yaw of 90° faces north. This is the
/// convention of an east-north-up frame such as the one produced by
/// [`LocalTangentPlane`](crate::LocalTangentPlane).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodeticPose {
    point: GeodeticPoint,
    yaw: Angle,
}

impl GeodeticPose {
    #[must_use]
    pub fn new(point: GeodeticPoint, yaw: impl Into<Angle>) -> Self {
        Self {
            point,
            yaw: yaw.into(),
        }
    }

    #[must_use]
    pub fn point(&self) -> GeodeticPoint {
        self.point
    }

    #[must_use]
    pub fn latitude(&self) -> Angle {
        self.point.latitude()
    }

    #[must_use]
    pub fn longitude(&self) -> Angle {
        self.point.longitude()
    }

    /// Returns the yaw exactly as it was given (ie, not folded into a single turn).
    #[must_use]
    pub fn yaw(&self) -> Angle {
        self.yaw
    }
}

impl Display for GeodeticPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yaw = BoundedAngle::new(self.yaw).to_signed_angle().get::<degree>();
        write!(f, "{}, yaw {yaw:.6}°", self.point)
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for GeodeticPose {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        GeodeticPoint::default_epsilon()
    }

    /// Positions are compared by ground distance against `epsilon`; yaws are compared modulo a
    /// full turn with a fixed tolerance of 1e-9 radians.
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.point.abs_diff_eq(&other.point, epsilon)
            && BoundedAngle::new(self.yaw).abs_diff_eq(
                &BoundedAngle::new(other.yaw),
                BoundedAngle::default_epsilon(),
            )
    }
}

/// Argument type for [`GeodeticPoint::build`].
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[must_use]
pub struct Components {
    /// The latitude angle of the proposed [`GeodeticPoint`].
    ///
    /// The latitude must be in [-90°, 90°]. If it is not, construction fails.
    pub latitude: Angle,

    /// The longitude angle of the proposed [`GeodeticPoint`].
    pub longitude: Angle,
}

/// Used to indicate that a partially-constructed [`GeodeticPoint`] is missing the latitude.
pub struct MissingLatitude;
/// Used to indicate that a partially-constructed [`GeodeticPoint`] has the latitude set.
pub struct HasLatitude;
/// Used to indicate that a partially-constructed [`GeodeticPoint`] is missing the longitude.
pub struct MissingLongitude;
/// Used to indicate that a partially-constructed [`GeodeticPoint`] has the longitude set.
pub struct HasLongitude;

/// [Builder] for a [`GeodeticPoint`].
///
/// Construct one through [`GeodeticPoint::builder`], and finalize with [`Builder::build`].
///
/// ```
/// # use local_xy::GeodeticPoint;
/// # use uom::si::{angle::degree, f64::Angle};
/// let point = GeodeticPoint::builder()
///     .latitude(Angle::new::<degree>(29.4))?
///     .longitude(Angle::new::<degree>(-98.5))
///     .build();
/// # Ok::<(), local_xy::Error>(())
/// ```
///
/// [Builder]: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
#[derive(Debug)]
#[must_use]
pub struct Builder<Latitude, Longitude> {
    under_construction: GeodeticPoint,
    has: (PhantomData<Latitude>, PhantomData<Longitude>),
}

// manual impls of Clone and Copy to avoid requiring the markers to be Copy + Clone
impl<L1, L2> Clone for Builder<L1, L2> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<L1, L2> Copy for Builder<L1, L2> {}

impl<L1, L2> Builder<L1, L2> {
    /// Sets the latitude of the [`GeodeticPoint`]-to-be.
    ///
    /// The latitude must be in [-90°, 90°]. If it is not, this returns
    /// [`Error::LatitudeOutOfRange`].
    pub fn latitude(mut self, latitude: impl Into<Angle>) -> Result<Builder<HasLatitude, L2>> {
        self.under_construction.latitude = check_latitude(latitude.into())?;
        Ok(Builder {
            under_construction: self.under_construction,
            has: (PhantomData::<HasLatitude>, self.has.1),
        })
    }

    /// Sets the longitude of the [`GeodeticPoint`]-to-be.
    pub fn longitude(mut self, longitude: impl Into<Angle>) -> Builder<L1, HasLongitude> {
        self.under_construction.longitude = longitude.into();
        Builder {
            under_construction: self.under_construction,
            has: (self.has.0, PhantomData::<HasLongitude>),
        }
    }
}

impl Builder<HasLatitude, HasLongitude> {
    #[must_use]
    pub fn build(self) -> GeodeticPoint {
        self.under_construction
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Components, GeodeticPoint, GeodeticPose};
    use crate::earth::MEAN_RADIUS;
    use crate::error::Error;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use quickcheck::quickcheck;
    use rstest::rstest;
    use uom::si::f64::{Angle, Length};
    use uom::si::{angle::degree, length::meter};

    fn d(degrees: f64) -> Angle {
        Angle::new::<degree>(degrees)
    }

    fn p(lat: f64, lon: f64) -> GeodeticPoint {
        GeodeticPoint::from_degrees(lat, lon).expect("latitude is in [-90, 90]")
    }

    /// quickcheck will give us awkward f64 values -- we ignore those
    pub(crate) fn arbitrary_normal(g: &mut quickcheck::Gen) -> f64 {
        loop {
            match <f64 as quickcheck::Arbitrary>::arbitrary(g) {
                0. => break 0.,
                f if f.is_normal() => break f,
                _ => {}
            }
        }
    }

    impl quickcheck::Arbitrary for GeodeticPoint {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let latitude = arbitrary_normal(g).rem_euclid(180.) - 90.;
            let longitude = arbitrary_normal(g).rem_euclid(720.) - 360.;
            Self {
                latitude: d(latitude),
                longitude: d(longitude),
            }
        }
    }

    #[rstest]
    #[case(d(90.000001))]
    #[case(d(-90.5))]
    #[case(d(190.112282))]
    #[case(d(f64::INFINITY))]
    #[case(d(f64::NEG_INFINITY))]
    fn rejects_latitude_outside_range(#[case] latitude: Angle) {
        let result = GeodeticPoint::build(Components {
            latitude,
            longitude: d(7.82),
        });
        assert!(
            matches!(result, Err(Error::LatitudeOutOfRange { .. })),
            "latitude {latitude:?} should be rejected, got {result:?}"
        );
    }

    #[rstest]
    #[case(90.)]
    #[case(-90.)]
    #[case(0.)]
    fn accepts_latitude_at_the_bounds(#[case] latitude: f64) {
        assert_eq!(p(latitude, 0.).latitude(), d(latitude));
    }

    #[test]
    fn nan_latitude_is_not_a_domain_error() {
        let point = GeodeticPoint::from_degrees(f64::NAN, 0.).expect("NaN passes through");
        assert!(point.latitude().get::<degree>().is_nan());
    }

    #[rstest]
    #[case(190., -170.)]
    #[case(-190., 170.)]
    #[case(540., -180.)]
    #[case(359.5, -0.5)]
    fn longitude_is_reported_in_signed_range(#[case] given: f64, #[case] reported: f64) {
        assert_relative_eq!(
            p(0., given).longitude().get::<degree>(),
            reported,
            epsilon = 1e-9
        );
    }

    #[test]
    fn display() {
        insta::assert_snapshot!(p(0., 0.), @"0.000000°N, 0.000000°E");
        // Mt. Fuji
        insta::assert_snapshot!(p(35.3619, 138.7280), @"35.361900°N, 138.728000°E");
        insta::assert_snapshot!(p(-35.3619, -138.7280), @"35.361900°S, 138.728000°W");
        insta::assert_snapshot!(p(35.3619, 221.2720), @"35.361900°N, 138.728000°W");
        insta::assert_snapshot!(
            GeodeticPose::new(p(-12.5, 3.25), d(-270.)),
            @"12.500000°S, 3.250000°E, yaw 90.000000°"
        );
    }

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        let distance = p(0., 0.).great_circle_distance(&p(0., 1.));
        assert_relative_eq!(
            distance.get::<meter>(),
            MEAN_RADIUS * 1.0_f64.to_radians(),
            epsilon = 1e-6
        );
        assert_relative_eq!(distance.get::<meter>(), 111_226.3, epsilon = 0.05);
    }

    #[test]
    fn antipodes_are_half_a_circumference_apart() {
        let half_circumference = std::f64::consts::PI * MEAN_RADIUS;
        for (a, b) in [
            (p(0., 0.), p(0., 180.)),
            (p(90., 0.), p(-90., 0.)),
            (p(45., 10.), p(-45., -170.)),
        ] {
            assert_relative_eq!(
                a.great_circle_distance(&b).get::<meter>(),
                half_circumference,
                epsilon = 1e-3
            );
        }
    }

    #[test]
    fn distance_across_the_anti_meridian_is_short() {
        let west = p(10., 179.9995);
        let east = p(10., -179.9995);
        let distance = west.great_circle_distance(&east).get::<meter>();
        assert!(distance > 100. && distance < 120., "got {distance}");
    }

    #[test]
    fn distance_is_monotonic_in_separation() {
        let origin = p(12., 30.);
        let mut last = Length::new::<meter>(0.);
        for step in 1..=18 {
            let next = origin.great_circle_distance(&p(12., 30. + 10. * f64::from(step)));
            assert!(next > last, "step {step}: {next:?} <= {last:?}");
            last = next;
        }
    }

    quickcheck! {
        fn distance_is_symmetric(a: GeodeticPoint, b: GeodeticPoint) -> bool {
            a.great_circle_distance(&b) == b.great_circle_distance(&a)
        }

        fn distance_to_self_is_zero(a: GeodeticPoint) -> bool {
            a.great_circle_distance(&a) == Length::new::<meter>(0.)
        }

        fn distance_is_bounded(a: GeodeticPoint, b: GeodeticPoint) -> bool {
            let distance = a.great_circle_distance(&b).get::<meter>();
            (0. ..=std::f64::consts::PI * MEAN_RADIUS).contains(&distance)
        }
    }

    #[test]
    fn points_a_full_turn_apart_compare_equal() {
        assert_abs_diff_eq!(p(12., 30.), p(12., 390.));
        assert_abs_diff_eq!(p(12., -180.), p(12., 180.));
    }

    #[test]
    fn serde_validates_latitude() {
        let point = p(47.3769, 8.5417);
        let ser = serde_yaml::to_string(&point).unwrap();
        let de = serde_yaml::from_str::<GeodeticPoint>(&ser).unwrap();
        assert_eq!(point, de);

        let out_of_range = Components {
            latitude: d(100.),
            longitude: d(0.),
        };
        let ser = serde_yaml::to_string(&out_of_range).unwrap();
        assert!(serde_yaml::from_str::<GeodeticPoint>(&ser).is_err());
    }

    #[test]
    fn pose_serde() {
        let pose = GeodeticPose::new(p(29.45, -98.61), d(37.5));
        let ser = serde_yaml::to_string(&pose).unwrap();
        let de = serde_yaml::from_str::<GeodeticPose>(&ser).unwrap();
        assert_eq!(pose, de);
    }
}
