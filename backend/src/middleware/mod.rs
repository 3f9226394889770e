//! Actix middleware wrapping every route of the habit API.

pub mod trace;

pub use trace::Trace;
