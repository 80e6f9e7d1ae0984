//! Orders held by a generic resource actor, with carrier-state and billing actions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
