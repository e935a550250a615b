//! Data models for the personnel registration form.
//!
//! Wire payloads match the JSON the Django views emit, so field names stay in Spanish
//! where the backend chose them.

mod deletion;
mod document;
mod option;
mod personnel;
mod row;

pub use deletion::*;
pub use document::*;
pub use option::*;
pub use personnel::*;
pub use row::*;
