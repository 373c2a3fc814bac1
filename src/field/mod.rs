//! Raw vector fields and their texture encoding.

pub mod source;
pub mod encoder;

pub use source::VectorField;
pub use encoder::{EncodedField, FieldEncoder, NEAR_ZERO_MAGNITUDE, NEUTRAL_DIRECTION};
