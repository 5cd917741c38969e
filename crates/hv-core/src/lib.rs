//! hv-core: shared foundation for hvacsim.
//!
//! Contains:
//! - units (uom types + imperial constructors used by the room harness)
//! - numeric (Real + validation and interpolation helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
