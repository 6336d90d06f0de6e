//! The conversions as plain functions of `f64`s.
//!
//! This is the surface meant for binding layers and message adapters that move bare numbers in
//! and out: geodetic angles are in degrees, yaws in radians, and lengths in meters. Each function
//! builds the typed values from [the crate root](crate), runs the conversion there, and unpacks
//! the result, so the same domain checks apply:
//!
//! - a latitude outside [-90°, 90°] is [`Error::LatitudeOutOfRange`](crate::Error);
//! - a reference latitude at a pole is [`Error::PolarReference`](crate::Error);
//! - NaN inputs produce NaN outputs.
//!
//! Every call is independent; nothing is cached between calls.

use crate::error::Result;
use crate::geodetic::{GeodeticPoint, GeodeticPose};
use crate::local_xy::{LocalPoint, LocalTangentPlane};
use uom::si::angle::{degree, radian};
use uom::si::f64::Angle;
use uom::si::length::meter;

/// Projects `(latitude, longitude)` onto the east-north tangent plane at the reference, returning
/// `(x, y)` in meters.
///
/// ```
/// let (x, y) = local_xy::scalar::local_xy_from_wgs84(0.001, 0., 0., 0.)?;
/// assert_eq!(x, 0.);
/// assert!((y - 110.574).abs() < 1e-3);
/// # Ok::<(), local_xy::Error>(())
/// ```
#[doc(alias = "LocalXyFromWgs84")]
pub fn local_xy_from_wgs84(
    latitude: f64,
    longitude: f64,
    reference_latitude: f64,
    reference_longitude: f64,
) -> Result<(f64, f64)> {
    let point = GeodeticPoint::from_degrees(latitude, longitude)?;
    let plane = plane_at(reference_latitude, reference_longitude)?;
    let local = plane.to_local(&point);
    Ok((local.x().get::<meter>(), local.y().get::<meter>()))
}

/// Maps `(x, y)` in meters on the east-north tangent plane at the reference back to
/// `(latitude, longitude)` in degrees, with the longitude in [-180°, 180°).
#[doc(alias = "Wgs84FromLocalXy")]
pub fn wgs84_from_local_xy(
    x: f64,
    y: f64,
    reference_latitude: f64,
    reference_longitude: f64,
) -> Result<(f64, f64)> {
    let plane = plane_at(reference_latitude, reference_longitude)?;
    let point = plane.to_geodetic(&LocalPoint::from_meters(x, y))?;
    Ok((
        point.latitude().get::<degree>(),
        point.longitude().get::<degree>(),
    ))
}

/// Returns the great-circle distance in meters between two points.
///
/// See [`GeodeticPoint::great_circle_distance`].
#[doc(alias = "GreatCircleDistance")]
pub fn great_circle_distance(
    source_latitude: f64,
    source_longitude: f64,
    destination_latitude: f64,
    destination_longitude: f64,
) -> Result<f64> {
    let source = GeodeticPoint::from_degrees(source_latitude, source_longitude)?;
    let destination = GeodeticPoint::from_degrees(destination_latitude, destination_longitude)?;
    Ok(source.great_circle_distance(&destination).get::<meter>())
}

/// The translation and rotation returned by [`get_relative_transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeTransform {
    /// `[x, y, z]` in meters.
    pub translation: [f64; 3],
    /// Unit quaternion as `[x, y, z, w]`.
    pub rotation: [f64; 4],
}

/// Expresses the pose `(latitude, longitude, yaw)` relative to the reference pose.
///
/// Latitudes and longitudes are in degrees, yaws in radians. See [`GeodeticPose::relative_to`]
/// for the conventions.
///
/// ```
/// # use std::f64::consts::FRAC_PI_2;
/// let relative = local_xy::scalar::get_relative_transform(0., 0., FRAC_PI_2, 0., 0., 0.)?;
/// assert_eq!(relative.translation, [0., 0., 0.]);
/// let [_, _, z, w] = relative.rotation;
/// assert!((z - w).abs() < 1e-15);
/// # Ok::<(), local_xy::Error>(())
/// ```
#[doc(alias = "GetRelativeTransform")]
pub fn get_relative_transform(
    latitude: f64,
    longitude: f64,
    yaw: f64,
    reference_latitude: f64,
    reference_longitude: f64,
    reference_yaw: f64,
) -> Result<RelativeTransform> {
    let pose = GeodeticPose::new(
        GeodeticPoint::from_degrees(latitude, longitude)?,
        Angle::new::<radian>(yaw),
    );
    let reference = GeodeticPose::new(
        GeodeticPoint::from_degrees(reference_latitude, reference_longitude)?,
        Angle::new::<radian>(reference_yaw),
    );
    let transform = pose.relative_to(&reference)?;
    let (qx, qy, qz, qw) = transform.rotation();
    Ok(RelativeTransform {
        translation: transform.translation().map(|c| c.get::<meter>()),
        rotation: [qx, qy, qz, qw],
    })
}

fn plane_at(reference_latitude: f64, reference_longitude: f64) -> Result<LocalTangentPlane> {
    LocalTangentPlane::new(GeodeticPoint::from_degrees(
        reference_latitude,
        reference_longitude,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earth::MEAN_RADIUS;
    use crate::error::Error;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use quickcheck::{quickcheck, TestResult};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    /// Wraps a longitude difference into [-180, 180).
    fn wrapped_difference(a: f64, b: f64) -> f64 {
        (a - b + 180.).rem_euclid(360.) - 180.
    }

    quickcheck! {
        fn roundtrip_within_a_degree(seed: (f64, f64, f64, f64)) -> TestResult {
            let (a, b, c, e) = seed;
            if ![a, b, c, e].iter().all(|v| v.is_finite()) {
                return TestResult::discard();
            }
            let ref_lat = a.rem_euclid(179.998) - 89.999;
            let ref_lon = b.rem_euclid(360.) - 180.;
            let lat = (ref_lat + c.rem_euclid(2.) - 1.).clamp(-89.999_999, 89.999_999);
            let lon = ref_lon + e.rem_euclid(2.) - 1.;

            let (x, y) = local_xy_from_wgs84(lat, lon, ref_lat, ref_lon).unwrap();
            let (lat_back, lon_back) = wgs84_from_local_xy(x, y, ref_lat, ref_lon).unwrap();
            TestResult::from_bool(
                (lat_back - lat).abs() <= 1e-9 && wrapped_difference(lon_back, lon).abs() <= 1e-9,
            )
        }

        fn distance_is_symmetric(seed: (f64, f64, f64, f64)) -> TestResult {
            let (a, b, c, e) = seed;
            if ![a, b, c, e].iter().all(|v| v.is_finite()) {
                return TestResult::discard();
            }
            let (lat_a, lon_a) = (a.rem_euclid(180.) - 90., b);
            let (lat_b, lon_b) = (c.rem_euclid(180.) - 90., e);
            let ab = great_circle_distance(lat_a, lon_a, lat_b, lon_b).unwrap();
            let ba = great_circle_distance(lat_b, lon_b, lat_a, lon_a).unwrap();
            TestResult::from_bool(ab == ba && (0. ..=PI * MEAN_RADIUS).contains(&ab))
        }
    }

    #[test]
    fn origin_is_exact() {
        for (lat, lon) in [(0., 0.), (29.4545, -98.6132), (-45., 179.99), (89.9, -180.)] {
            assert_eq!(local_xy_from_wgs84(lat, lon, lat, lon).unwrap(), (0., 0.));
        }
    }

    #[test]
    fn equator_scenarios() {
        let distance = great_circle_distance(0., 0., 0., 1.).unwrap();
        assert_relative_eq!(distance, MEAN_RADIUS * PI / 180., epsilon = 1e-6);
        assert_eq!(great_circle_distance(12., 34., 12., 34.).unwrap(), 0.);

        let (x, y) = local_xy_from_wgs84(0.001, 0., 0., 0.).unwrap();
        assert_eq!(x, 0.);
        assert_relative_eq!(y, 110.57, epsilon = 0.005);
    }

    #[test]
    fn relative_transform_scenarios() {
        let identity = get_relative_transform(41.5, -81.7, 0.3, 41.5, -81.7, 0.3).unwrap();
        assert_eq!(identity.translation, [0., 0., 0.]);
        assert_eq!(identity.rotation, [0., 0., 0., 1.]);

        let yaw_only = get_relative_transform(0., 0., FRAC_PI_2, 0., 0., 0.).unwrap();
        assert_eq!(yaw_only.translation, [0., 0., 0.]);
        let [x, y, z, w] = yaw_only.rotation;
        assert_eq!([x, y], [0., 0.]);
        assert_relative_eq!(z, FRAC_PI_4.sin(), epsilon = 1e-15);
        assert_relative_eq!(w, FRAC_PI_4.cos(), epsilon = 1e-15);

        let moved = get_relative_transform(0., 0.001, 0., 0., 0., 0.).unwrap();
        assert_relative_eq!(moved.translation[0], 111.319_490_8, epsilon = 1e-6);
        assert_abs_diff_eq!(moved.translation[1], 0.);
    }

    #[test]
    fn inverse_normalizes_longitude() {
        let (x, y) = local_xy_from_wgs84(10., -179.9, 10., 179.9).unwrap();
        assert!(x > 0., "points across the anti-meridian lie east: {x}");
        let (lat, lon) = wgs84_from_local_xy(x, y, 10., 179.9).unwrap();
        assert_relative_eq!(lat, 10., epsilon = 1e-9);
        assert_relative_eq!(lon, -179.9, epsilon = 1e-9);
    }

    #[test]
    fn domain_errors() {
        match local_xy_from_wgs84(91., 0., 0., 0.) {
            Err(Error::LatitudeOutOfRange { latitude_deg }) => {
                assert_relative_eq!(latitude_deg, 91., epsilon = 1e-9);
            }
            other => panic!("expected a latitude error, got {other:?}"),
        }
        assert!(matches!(
            local_xy_from_wgs84(89.9, 0., 90., 0.),
            Err(Error::PolarReference { .. })
        ));
        assert!(matches!(
            wgs84_from_local_xy(0., 0., -90., 0.),
            Err(Error::PolarReference { .. })
        ));
        assert!(matches!(
            wgs84_from_local_xy(0., 1e9, 0., 0.),
            Err(Error::LatitudeOutOfRange { .. })
        ));
        assert!(matches!(
            great_circle_distance(0., 0., -120., 0.),
            Err(Error::LatitudeOutOfRange { .. })
        ));
        assert!(matches!(
            get_relative_transform(0., 0., 0., 95., 0., 0.),
            Err(Error::LatitudeOutOfRange { .. })
        ));
    }

    #[test]
    fn nan_in_nan_out() {
        let (x, y) = local_xy_from_wgs84(f64::NAN, 0., 0., 0.).unwrap();
        assert!(x.is_nan() && y.is_nan());

        assert!(great_circle_distance(0., f64::NAN, 0., 0.).unwrap().is_nan());

        let relative = get_relative_transform(0., 0., f64::NAN, 0., 0., 0.).unwrap();
        assert!(relative.rotation[3].is_nan());
    }
}
