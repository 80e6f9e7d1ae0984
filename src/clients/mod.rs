//! Cloneable handles for talking to the actors.

#[macro_use]
mod macros;

pub mod billing_client;
pub mod customer_client;
pub mod order_client;

pub use billing_client::*;
pub use customer_client::*;
pub use order_client::*;
