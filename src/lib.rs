//! Personnel registration form engine.
//!
//! Headless rendition of the client-side logic behind the person registration page:
//! document number masks, board member fields, conditional required fields, the
//! per-row brigade and role cascades of the assignment formset, and the delete button
//! of the persons list.

pub mod bridge;
pub mod config;
pub mod errors;
pub mod form;
pub mod models;
pub mod remote;

pub use config::FormConfig;
pub use errors::FormError;
pub use form::{FormEvent, FormSession, Outcome, UiEffect};
pub use remote::{HttpBackend, OptionFetcher, PersonService};

#[cfg(test)]
mod tests;
