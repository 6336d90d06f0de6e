use std::f64::consts::{PI, TAU};
use uom::si::angle::radian;
use uom::si::f64::Angle;

#[cfg(any(test, feature = "approx"))]
use approx::AbsDiffEq;

/// An angle folded onto a single turn.
///
/// Used wherever a longitude or a yaw has to be compared or reported independently of how many
/// whole turns the caller happened to add to it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BoundedAngle {
    /// Always in [0, 2π).
    radians: f64,
}

impl BoundedAngle {
    pub(crate) fn new(angle: impl Into<Angle>) -> Self {
        let radians = angle.into().get::<radian>().rem_euclid(TAU);
        // rem_euclid can round tiny negative inputs up to exactly TAU
        Self {
            radians: if radians == TAU { 0. } else { radians },
        }
    }

    /// Returns the angle in [0°, 360°) in radians.
    #[cfg(test)]
    pub(crate) fn get_bounded(self) -> f64 {
        self.radians
    }

    /// Returns the angle in [-180°, 180°) in radians.
    pub(crate) fn to_signed_range(self) -> f64 {
        if self.radians < PI {
            self.radians
        } else {
            self.radians - TAU
        }
    }

    /// Returns the angle in [-180°, 180°).
    pub(crate) fn to_signed_angle(self) -> Angle {
        Angle::new::<radian>(self.to_signed_range())
    }
}

#[cfg(any(test, feature = "approx"))]
impl AbsDiffEq<Self> for BoundedAngle {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        // radians
        0.000_000_001
    }

    /// Compares along the shorter way around the circle, so 359.9999° and 0° are close.
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        let difference = Angle::new::<radian>(self.radians - other.radians);
        Self::new(difference).to_signed_range().abs() <= epsilon
    }
}
