//! This library converts between WGS84 latitude/longitude and a flat, metric, local frame anchored
//! at a reference point of your choosing, for robots and vehicles that plan and localize in meters
//! but receive their positions from GNSS.
//!
//! The building blocks are:
//!
//! - [`GeodeticPoint`], a latitude/longitude pair on the WGS84 ellipsoid, and [`GeodeticPose`],
//!   which adds a yaw.
//! - [`LocalTangentPlane`], the east-north plane touching the ellipsoid at a reference point. It
//!   projects [`GeodeticPoint`]s to [`LocalPoint`]s and back.
//! - [`RigidTransform`], a translation plus rotation, which [`GeodeticPose::relative_to`] produces
//!   to express one pose in the frame of another.
//! - [`GeodeticPoint::great_circle_distance`], for distances between points too far apart for a
//!   tangent plane to be accurate.
//! - The [`earth`] module, with the WGS84 constants and the [`Ellipsoid`]'s radii of curvature.
//!
//! Angles and lengths are [`uom`] quantities throughout, so degrees and radians cannot be mixed
//! up. If you are feeding the conversions from a place that only has bare numbers, the [`scalar`]
//! module has the same operations over plain `f64`s.
//!
//! # Conventions
//!
//! The local frame is right-handed with x pointing east, y pointing north, and z pointing up. Yaw
//! is measured counter-clockwise from east about +z, so a yaw of 90° faces north.
//!
//! The tangent-plane projection is an approximation whose error grows with distance from the
//! reference. Keep the reference close to where you operate.
//!
//! # Examples
//!
//! A robot has a mission origin near San Antonio, and gets a GNSS fix a little to the north-east
//! of it:
//!
//! ```
//! use local_xy::{GeodeticPoint, LocalTangentPlane};
//! use uom::si::length::meter;
//!
//! let origin = GeodeticPoint::from_degrees(29.4545, -98.6132)?;
//! let plane = LocalTangentPlane::new(origin)?;
//!
//! let fix = GeodeticPoint::from_degrees(29.4550, -98.6120)?;
//! let local = plane.to_local(&fix);
//! assert!(local.x().get::<meter>() > 0.); // east of the origin
//! assert!(local.y().get::<meter>() > 0.); // and north of it
//!
//! // the projection inverts cleanly
//! let back = plane.to_geodetic(&local)?;
//! assert!(back.great_circle_distance(&fix).get::<meter>() < 1e-6);
//!
//! // and for short hops, the plane agrees closely with the great-circle distance
//! let planar = local.distance_from_origin().get::<meter>();
//! let spherical = origin.great_circle_distance(&fix).get::<meter>();
//! assert!((planar - spherical).abs() < 0.5);
//! # Ok::<(), local_xy::Error>(())
//! ```
//!
//! If the robot also knows which way it is facing, it can express its pose relative to the
//! mission origin's pose for a downstream consumer that works in rigid-body transforms:
//!
//! ```
//! use local_xy::{GeodeticPoint, GeodeticPose};
//! use uom::si::{angle::degree, f64::Angle, length::meter};
//!
//! let origin = GeodeticPose::new(
//!     GeodeticPoint::from_degrees(29.4545, -98.6132)?,
//!     Angle::new::<degree>(0.), // facing east
//! );
//! let robot = GeodeticPose::new(
//!     GeodeticPoint::from_degrees(29.4545, -98.6120)?,
//!     Angle::new::<degree>(90.), // facing north
//! );
//!
//! let transform = robot.relative_to(&origin)?;
//! let [x, y, z] = transform.translation();
//! assert!(x.get::<meter>() > 100.);
//! assert!(y.get::<meter>().abs() < 1e-9);
//! assert_eq!(z.get::<meter>(), 0.);
//! assert!((transform.yaw().get::<degree>() - 90.).abs() < 1e-9);
//!
//! // and the consumer can map it back
//! let recovered = GeodeticPose::from_relative(&origin, &transform)?;
//! assert!(recovered.point().great_circle_distance(&robot.point()).get::<meter>() < 1e-6);
//! # Ok::<(), local_xy::Error>(())
//! ```
//!
//! # Errors
//!
//! Inputs outside the domain of the conversions are reported as an [`Error`] rather than silently
//! clamped: latitudes outside [-90°, 90°], and tangent planes anchored so close to a pole that the
//! east direction is undefined. NaN inputs are not errors; they propagate to NaN outputs.
//!
//! # Features
//!
//! - `serde` (default): `Serialize`/`Deserialize` for the value types. Deserializing a
//!   [`GeodeticPoint`] validates its latitude.
//! - `approx` (default): [`approx`] comparisons for the value types.

mod error;
mod geodetic;
mod local_xy;
mod transform;
mod util;

pub mod earth;
pub mod frames;
pub mod scalar;

pub(crate) type Vector3 = nalgebra::Vector3<f64>;
pub(crate) type UnitQuaternion = nalgebra::Unit<nalgebra::Quaternion<f64>>;
pub(crate) type Isometry3 = nalgebra::Isometry3<f64>;

// the typestate markers only matter to people who name the builder's type
/// Step-by-step construction of a [`GeodeticPoint`].
pub mod builder {
    pub use super::geodetic::{
        Builder, HasLatitude, HasLongitude, MissingLatitude, MissingLongitude,
    };
}
pub use earth::Ellipsoid;
pub use error::{Error, Result};
pub use geodetic::{Components, GeodeticPoint, GeodeticPose};
pub use local_xy::{LocalPoint, LocalTangentPlane, POLAR_COS_EPSILON};
pub use transform::RigidTransform;
