use thiserror::Error;

/// Errors that can occur during subscription and usage operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BillingError {
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),
    #[error("Customer {customer_id} already has an overlapping active subscription: {existing}")]
    OverlappingSubscription { customer_id: String, existing: String },
    #[error("Invalid subscription: {0}")]
    InvalidSubscription(String),
    #[error("Subscription is not active: {0}")]
    NotActive(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
