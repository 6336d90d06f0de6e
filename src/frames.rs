//! Names of well-known reference frames.
//!
//! These are plain labels for tagging data handed to frame-aware consumers. Nothing in this crate
//! looks them up or attaches behavior to them.

/// The geodetic latitude/longitude frame on the WGS84 ellipsoid.
pub const WGS84: &str = "/wgs84";

/// The projected Universal Transverse Mercator grid frame.
pub const UTM: &str = "/utm";

/// The east-north tangent plane at a reference point (see
/// [`LocalTangentPlane`](crate::LocalTangentPlane)).
pub const LOCAL_XY: &str = "/local_xy";
