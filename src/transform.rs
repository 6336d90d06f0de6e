//! Rigid-body transforms between poses.
//!
//! The main type here is [`RigidTransform`]: a translation plus a rotation, as consumed by
//! motion-planning and localization code that works in a local metric frame. The usual way to get
//! one is [`GeodeticPose::relative_to`], which expresses one WGS84 pose relative to another.

use crate::error::Result;
use crate::geodetic::GeodeticPose;
use crate::local_xy::{LocalPoint, LocalTangentPlane};
use crate::util::BoundedAngle;
use crate::{Isometry3, UnitQuaternion, Vector3};
use nalgebra::{Point3, Translation3};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::Mul;
use uom::si::angle::radian;
use uom::si::f64::{Angle, Length};
use uom::si::length::meter;
use uom::ConstZero;

#[cfg(any(test, feature = "approx"))]
use approx::{AbsDiffEq, RelativeEq};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A translation and rotation in 3D (an [isometry]).
///
/// A `RigidTransform` describes where a body sits in some parent frame: applying it with
/// [`RigidTransform::transform_point`] takes a point given in the body's frame and returns the
/// same point in the parent frame, ie it first rotates and then translates. In terms of the
/// parent frame, [`translation`](RigidTransform::translation) is the position of the body's
/// origin and [`rotation`](RigidTransform::rotation) is the body's orientation.
///
/// [isometry]: https://en.wikipedia.org/wiki/Rigid_transformation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
// no need for the "inner": indirection
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RigidTransform {
    inner: Isometry3,
}

impl RigidTransform {
    /// The transform that leaves every point where it is.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            inner: Isometry3::identity(),
        }
    }

    /// Constructs a transform that translates by `(x, y, z)` and rotates by `yaw` about +z.
    ///
    /// The rotation is right-handed, so a positive yaw turns +x towards +y.
    #[must_use]
    pub fn from_translation_and_yaw(
        x: impl Into<Length>,
        y: impl Into<Length>,
        z: impl Into<Length>,
        yaw: impl Into<Angle>,
    ) -> Self {
        let translation = Translation3::new(
            x.into().get::<meter>(),
            y.into().get::<meter>(),
            z.into().get::<meter>(),
        );
        let rotation =
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw.into().get::<radian>());
        Self {
            inner: Isometry3::from_parts(translation, rotation),
        }
    }

    /// Returns the translation as `[x, y, z]`.
    #[must_use]
    pub fn translation(&self) -> [Length; 3] {
        let t = self.inner.translation.vector;
        [
            Length::new::<meter>(t.x),
            Length::new::<meter>(t.y),
            Length::new::<meter>(t.z),
        ]
    }

    /// Returns the components of the rotation's [unit quaternion] as `(x, y, z, w)`, where `w` is
    /// the scalar part.
    ///
    /// This is the component order of most robotics message formats, and _not_ the `(w, i, j, k)`
    /// order common in mathematics.
    ///
    /// [unit quaternion]: https://en.wikipedia.org/wiki/Versor
    #[doc(alias = "to_quaternion")]
    #[must_use]
    pub fn rotation(&self) -> (f64, f64, f64, f64) {
        let q = self.inner.rotation.quaternion();
        (q.i, q.j, q.k, q.w)
    }

    /// Returns the rotation about +z, in (-180°, 180°].
    ///
    /// For transforms that only rotate about z (such as those from
    /// [`GeodeticPose::relative_to`]) this is the full rotation.
    #[must_use]
    pub fn yaw(&self) -> Angle {
        let (_roll, _pitch, yaw) = self.inner.rotation.euler_angles();
        Angle::new::<radian>(yaw)
    }

    /// Returns the transform that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            inner: self.inner.inverse(),
        }
    }

    /// Chains two transforms: if `self` places body `B` in frame `A` and `rhs` places body `C` in
    /// `B`'s frame, the result places `C` in frame `A`.
    ///
    /// ```
    /// # use local_xy::RigidTransform;
    /// # use uom::si::{angle::degree, f64::{Angle, Length}, length::meter};
    /// let m = Length::new::<meter>;
    /// let robot_in_map = RigidTransform::from_translation_and_yaw(
    ///     m(10.), m(0.), m(0.), Angle::new::<degree>(90.),
    /// );
    /// let sensor_on_robot = RigidTransform::from_translation_and_yaw(
    ///     m(1.), m(0.), m(0.), Angle::new::<degree>(0.),
    /// );
    /// let sensor_in_map = robot_in_map.and_then(sensor_on_robot);
    /// let [x, y, _] = sensor_in_map.translation();
    /// assert!((x.get::<meter>() - 10.).abs() < 1e-9);
    /// assert!((y.get::<meter>() - 1.).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn and_then(self, rhs: RigidTransform) -> RigidTransform {
        self * rhs
    }

    /// Moves a point from the body's frame into the parent frame.
    #[doc(alias = "apply")]
    #[must_use]
    pub fn transform_point(&self, point: [Length; 3]) -> [Length; 3] {
        let [x, y, z] = point.map(|c| c.get::<meter>());
        let moved = self.inner.transform_point(&Point3::new(x, y, z));
        [
            Length::new::<meter>(moved.x),
            Length::new::<meter>(moved.y),
            Length::new::<meter>(moved.z),
        ]
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: RigidTransform) -> Self::Output {
        RigidTransform {
            inner: self.inner * rhs.inner,
        }
    }
}

impl From<RigidTransform> for nalgebra::Isometry3<f64> {
    fn from(transform: RigidTransform) -> Self {
        transform.inner
    }
}

impl From<nalgebra::Isometry3<f64>> for RigidTransform {
    fn from(inner: nalgebra::Isometry3<f64>) -> Self {
        Self { inner }
    }
}

impl Display for RigidTransform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.translation().map(|c| c.get::<meter>());
        let (qx, qy, qz, qw) = self.rotation();
        write!(
            f,
            "translation: ({x:.3}m, {y:.3}m, {z:.3}m), rotation: ({qx:.6}, {qy:.6}, {qz:.6}, {qw:.6})"
        )
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for RigidTransform {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        Isometry3::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.inner.abs_diff_eq(&other.inner, epsilon)
    }
}

#[cfg(any(test, feature = "approx"))]
impl RelativeEq for RigidTransform {
    fn default_max_relative() -> Self::Epsilon {
        Isometry3::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.inner.relative_eq(&other.inner, epsilon, max_relative)
    }
}

impl GeodeticPose {
    /// Expresses this pose relative to `reference`.
    ///
    /// The translation is where this pose lies in the east-north-up [`LocalTangentPlane`] anchored
    /// at `reference` (z is always zero), so it is measured along the reference's east and north
    /// axes rather than along the reference's heading. The rotation is the yaw difference
    /// `self.yaw() - reference.yaw()` about up, taken as-is without folding it into a single
    /// turn:
    ///
    /// ```text
    /// (x, y, z, w) = (0, 0, sin(Δyaw / 2), cos(Δyaw / 2))
    /// ```
    ///
    /// A pose relative to itself is exactly [`RigidTransform::identity`].
    ///
    /// Fails with [`Error::PolarReference`](crate::Error::PolarReference) if `reference` is too
    /// close to a pole to anchor a tangent plane.
    ///
    /// ```
    /// # use local_xy::{GeodeticPoint, GeodeticPose};
    /// # use uom::si::{angle::degree, f64::Angle};
    /// let here = GeodeticPoint::from_degrees(29.4545, -98.6132)?;
    /// let pose = GeodeticPose::new(here, Angle::new::<degree>(45.));
    /// let reference = GeodeticPose::new(here, Angle::new::<degree>(0.));
    ///
    /// let transform = pose.relative_to(&reference)?;
    /// let (_, _, z, w) = transform.rotation();
    /// assert!((z - 22.5_f64.to_radians().sin()).abs() < 1e-12);
    /// assert!((w - 22.5_f64.to_radians().cos()).abs() < 1e-12);
    /// # Ok::<(), local_xy::Error>(())
    /// ```
    #[doc(alias = "GetRelativeTransform")]
    pub fn relative_to(&self, reference: &GeodeticPose) -> Result<RigidTransform> {
        let plane = LocalTangentPlane::new(reference.point())?;
        let local = plane.to_local(&self.point());
        Ok(RigidTransform::from_translation_and_yaw(
            local.x(),
            local.y(),
            Length::ZERO,
            self.yaw() - reference.yaw(),
        ))
    }

    /// Recovers the pose that [`GeodeticPose::relative_to`] turned into `transform`.
    ///
    /// Only the x and y of the translation and the yaw of the rotation are used. The returned yaw
    /// is in [-180°, 180°).
    pub fn from_relative(reference: &GeodeticPose, transform: &RigidTransform) -> Result<Self> {
        let plane = LocalTangentPlane::new(reference.point())?;
        let [x, y, _] = transform.translation();
        let point = plane.to_geodetic(&LocalPoint::new(x, y))?;
        let yaw = BoundedAngle::new(reference.yaw() + transform.yaw()).to_signed_angle();
        Ok(GeodeticPose::new(point, yaw))
    }
}
