//! Errors produced when inputs fall outside the region where the conversions are defined.
//!
//! None of the conversions in this crate can fail for arithmetic reasons; every error here is a
//! domain check performed before any math happens. NaN is _not_ an error: a NaN anywhere in the
//! input simply produces NaN in the output.

use thiserror::Error;

/// The ways a conversion can refuse its input.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// A latitude (of a point, of a reference, or produced by an inverse projection) is outside
    /// [-90°, 90°].
    #[error("latitude {latitude_deg}° is outside [-90°, 90°]")]
    LatitudeOutOfRange { latitude_deg: f64 },

    /// The reference latitude of a local tangent plane is so close to a pole that east-west
    /// distances cannot be turned back into longitudes.
    #[error("reference latitude {latitude_deg}° is too close to a pole to anchor a local tangent plane")]
    PolarReference { latitude_deg: f64 },
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
