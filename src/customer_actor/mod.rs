//! Customer records held by a generic resource actor.

pub mod entity;
pub mod error;

pub use error::*;
