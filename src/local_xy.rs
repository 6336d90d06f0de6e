//! Flat, metric coordinates around a chosen reference point.
//!
//! A [`LocalTangentPlane`] approximates the surface of the earth near a reference
//! [`GeodeticPoint`] by a plane with x pointing east and y pointing north (optionally rotated by a
//! heading). Angular offsets from the reference are scaled into meters with the radii of
//! curvature of the WGS84 ellipsoid, both evaluated at the _reference_ latitude. That makes the
//! projection linear in latitude and longitude, which is what lets [`LocalTangentPlane::to_local`]
//! and [`LocalTangentPlane::to_geodetic`] undo each other exactly (up to rounding), at the price
//! of being a good approximation only within tens of kilometers of the reference.
//!
//! The radii are computed once, when the plane is constructed, and every conversion in either
//! direction uses those same two values. They are never re-evaluated at the converted point.

use crate::earth::Ellipsoid;
use crate::error::{Error, Result};
use crate::geodetic::{check_latitude, GeodeticPoint};
use crate::util::BoundedAngle;
use std::fmt;
use std::fmt::Display;
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

/// The smallest `cos(reference latitude)` a [`LocalTangentPlane`] accepts.
///
/// Below this (within roughly 6 mm of a pole) an east-west offset of a few meters corresponds to
/// thousands of degrees of longitude, so the inverse projection is meaningless.
pub const POLAR_COS_EPSILON: f64 = 1e-9;

/// A position in a [`LocalTangentPlane`], in meters from the plane's reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalPoint {
    x: Length,
    y: Length,
}

impl LocalPoint {
    #[must_use]
    pub fn new(x: impl Into<Length>, y: impl Into<Length>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    #[must_use]
    pub fn from_meters(x: f64, y: f64) -> Self {
        Self::new(Length::new::<meter>(x), Length::new::<meter>(y))
    }

    /// The reference point of any plane.
    #[must_use]
    pub fn origin() -> Self {
        Self::new(Length::ZERO, Length::ZERO)
    }

    /// Easting, unless the plane has a heading.
    #[must_use]
    pub fn x(&self) -> Length {
        self.x
    }

    /// Northing, unless the plane has a heading.
    #[must_use]
    pub fn y(&self) -> Length {
        self.y
    }

    /// Straight-line distance from the plane's reference point.
    #[must_use]
    pub fn distance_from_origin(&self) -> Length {
        let x = self.x.get::<meter>();
        let y = self.y.get::<meter>();
        Length::new::<meter>(x.hypot(y))
    }
}

impl Display for LocalPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.3}m, {:.3}m)",
            self.x.get::<meter>(),
            self.y.get::<meter>()
        )
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for LocalPoint {
    type Epsilon = Length;

    fn default_epsilon() -> Self::Epsilon {
        Length::new::<meter>(1e-9)
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

/// A flat approximation of the earth's surface anchored at a reference [`GeodeticPoint`].
///
/// With no heading, local x points east and local y points north, and the mapping is:
///
/// ```text
/// y = (lat - ref_lat) · M(ref_lat)
/// x = (lon - ref_lon) · N(ref_lat) · cos(ref_lat)
/// ```
///
/// where `M` and `N` are the [meridian](Ellipsoid::meridian_radius) and
/// [normal](Ellipsoid::normal_radius) radii of curvature (angles in radians). The longitude
/// difference is first folded into [-180°, 180°) so that a reference just west of the
/// anti-meridian sees points just east of it as nearby.
///
/// A plane is a plain value; construct one per reference whenever you need it. Construction fails
/// with [`Error::PolarReference`] for references within [`POLAR_COS_EPSILON`] of a pole.
///
/// ```
/// # use local_xy::{GeodeticPoint, LocalTangentPlane};
/// # use uom::si::length::meter;
/// let reference = GeodeticPoint::from_degrees(0., 0.)?;
/// let plane = LocalTangentPlane::new(reference)?;
///
/// let north = GeodeticPoint::from_degrees(0.001, 0.)?;
/// let local = plane.to_local(&north);
/// assert!((local.y().get::<meter>() - 110.574).abs() < 1e-3);
/// assert_eq!(local.x().get::<meter>(), 0.);
///
/// let back = plane.to_geodetic(&local)?;
/// assert!((back.latitude() - north.latitude()).abs().value < 1e-15);
/// # Ok::<(), local_xy::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTangentPlane {
    reference: GeodeticPoint,
    heading: Angle,
    /// M at the reference latitude, in meters.
    meridian_radius: f64,
    /// N at the reference latitude, in meters.
    normal_radius: f64,
    cos_reference_latitude: f64,
    cos_heading: f64,
    sin_heading: f64,
}

impl LocalTangentPlane {
    /// Anchors an east-north plane at `reference`.
    pub fn new(reference: GeodeticPoint) -> Result<Self> {
        Self::with_heading(reference, Angle::ZERO)
    }

    /// Anchors a plane at `reference` whose x axis points `heading` counter-clockwise from east
    /// (as seen from above).
    ///
    /// A heading of 90° therefore makes x point north and y point west.
    pub fn with_heading(reference: GeodeticPoint, heading: impl Into<Angle>) -> Result<Self> {
        let heading = heading.into();
        let reference_latitude = reference.latitude;
        let cos_reference_latitude = reference_latitude.get::<radian>().cos();
        if cos_reference_latitude < POLAR_COS_EPSILON {
            let latitude_deg = reference_latitude.get::<degree>();
            log::debug!("rejecting local tangent plane at polar reference latitude {latitude_deg}°");
            return Err(Error::PolarReference { latitude_deg });
        }

        let ellipsoid = Ellipsoid::WGS84;
        let plane = Self {
            reference,
            heading,
            meridian_radius: ellipsoid.meridian_radius(reference_latitude).get::<meter>(),
            normal_radius: ellipsoid.normal_radius(reference_latitude).get::<meter>(),
            cos_reference_latitude,
            cos_heading: heading.get::<radian>().cos(),
            sin_heading: heading.get::<radian>().sin(),
        };
        log::trace!(
            "local tangent plane at {reference} (heading {}°): M = {} m, N = {} m",
            heading.get::<degree>(),
            plane.meridian_radius,
            plane.normal_radius
        );
        Ok(plane)
    }

    #[must_use]
    pub fn reference(&self) -> GeodeticPoint {
        self.reference
    }

    #[must_use]
    pub fn heading(&self) -> Angle {
        self.heading
    }

    /// The meridian radius of curvature at the reference latitude.
    #[must_use]
    pub fn meridian_radius(&self) -> Length {
        Length::new::<meter>(self.meridian_radius)
    }

    /// The normal radius of curvature at the reference latitude.
    #[must_use]
    pub fn normal_radius(&self) -> Length {
        Length::new::<meter>(self.normal_radius)
    }

    /// Projects `point` onto this plane.
    ///
    /// The reference itself always maps to exactly [`LocalPoint::origin`].
    #[doc(alias = "LocalXyFromWgs84")]
    #[must_use]
    pub fn to_local(&self, point: &GeodeticPoint) -> LocalPoint {
        let delta_lat = (point.latitude - self.reference.latitude).get::<radian>();
        let delta_lon = BoundedAngle::new(point.longitude - self.reference.longitude)
            .to_signed_range();

        let east = delta_lon * self.normal_radius * self.cos_reference_latitude;
        let north = delta_lat * self.meridian_radius;

        let x = self.cos_heading * east + self.sin_heading * north;
        let y = self.cos_heading * north - self.sin_heading * east;
        LocalPoint::from_meters(x, y)
    }

    /// Maps a point on this plane back to latitude and longitude.
    ///
    /// This is the exact inverse of [`LocalTangentPlane::to_local`]. Fails with
    /// [`Error::LatitudeOutOfRange`] if `local` lies so far north or south of the reference that
    /// the resulting latitude would pass a pole.
    #[doc(alias = "Wgs84FromLocalXy")]
    pub fn to_geodetic(&self, local: &LocalPoint) -> Result<GeodeticPoint> {
        let x = local.x.get::<meter>();
        let y = local.y.get::<meter>();
        let east = self.cos_heading * x - self.sin_heading * y;
        let north = self.sin_heading * x + self.cos_heading * y;

        let delta_lat = north / self.meridian_radius;
        let delta_lon = east / (self.normal_radius * self.cos_reference_latitude);

        let latitude = self.reference.latitude + Angle::new::<radian>(delta_lat);
        Ok(GeodeticPoint {
            latitude: check_latitude(latitude)?,
            longitude: self.reference.longitude + Angle::new::<radian>(delta_lon),
        })
    }
}
