//! # Courier Billing
//!
//! Subscription billing and carrier status tracking for a delivery back office.
//!
//! - [`domain::normalize`] maps a carrier's raw order state onto one of six
//!   lifecycle states.
//! - [`billing::allocate`] decides how an order is billed against the
//!   customer's subscription; [`billing::BillingLedger`] applies that decision
//!   and keeps the append-only usage records.
//! - Customers and orders live in generic [`actor_framework::ResourceActor`]s,
//!   the ledger in [`billing::BillingService`]; [`app_system::DeliverySystem`]
//!   starts them and wires the clients together.
//!
//! ```no_run
//! # use courier_billing::{app_system::DeliverySystem, config::BillingConfig};
//! # async fn demo() -> Result<(), String> {
//! let system = DeliverySystem::new(&BillingConfig::default()).map_err(|e| e.to_string())?;
//! // system.customer_client / system.billing_client / system.order_client
//! system.shutdown().await
//! # }
//! ```

pub mod actor_framework;
pub mod app_system;
pub mod billing;
pub mod clients;
pub mod config;
pub mod customer_actor;
pub mod domain;
pub mod messages;
pub mod order_actor;

#[cfg(test)]
mod mock_framework;
