//! Subscription billing: the allocation decision, the ledger that owns
//! subscriptions and usage, and the actor that serves it.

pub mod allocator;
pub mod error;
pub mod ledger;
pub mod service;

pub use allocator::*;
pub use error::*;
pub use ledger::*;
pub use service::*;
