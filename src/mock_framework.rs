//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] for resource actors or [`create_mock_billing`]
//! for the billing service, then drive the returned receiver with the
//! `expect_*` helpers to answer each request by hand.

use tokio::sync::{mpsc, oneshot};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use crate::billing::BillingError;
use crate::clients::BillingClient;
use crate::domain::{Allocation, OrderRef, ServiceType};
use crate::messages::BillingRequest;

/// Creates a client whose requests land on a receiver the test controls.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

pub fn create_mock_billing(buffer_size: usize) -> (BillingClient, mpsc::Receiver<BillingRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (BillingClient::new(sender), receiver)
}

/// Next message must be a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message must be a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message must be a Delete request
pub async fn expect_delete<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<(), FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message must be an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, oneshot::Sender<Result<T::ActionResult, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Next message must be an Allocate request
pub async fn expect_allocate(
    receiver: &mut mpsc::Receiver<BillingRequest>,
) -> Option<(String, ServiceType, OrderRef, oneshot::Sender<Result<Allocation, BillingError>>)> {
    match receiver.recv().await {
        Some(BillingRequest::Allocate { customer_id, service_type, order, respond_to }) => {
            Some((customer_id, service_type, order, respond_to))
        }
        _ => None,
    }
}

/// Next message must be a ReleaseUsage request
pub async fn expect_release_usage(
    receiver: &mut mpsc::Receiver<BillingRequest>,
) -> Option<(String, oneshot::Sender<Result<u32, BillingError>>)> {
    match receiver.recv().await {
        Some(BillingRequest::ReleaseUsage { order_id, respond_to }) => Some((order_id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::CustomerClient;
    use crate::domain::{Customer, CustomerCreate};

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<Customer>(10);
        let client = CustomerClient::new(inner);

        let create_task = tokio::spawn(async move {
            client.create_customer(CustomerCreate::new("Test", "test@example.com")).await
        });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(params.name, "Test");
        responder.send(Ok("customer_1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("customer_1".to_string()));
    }

    #[tokio::test]
    async fn test_mock_billing() {
        let (client, mut receiver) = create_mock_billing(10);
        let date = chrono::NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        let task = tokio::spawn(async move {
            let order = OrderRef { id: "order_1".into(), number: "ORD-1".into(), date };
            client.allocate("customer_1".into(), ServiceType::SameDay, order).await
        });

        let (customer_id, service_type, order, responder) =
            expect_allocate(&mut receiver).await.expect("Expected Allocate request");
        assert_eq!(customer_id, "customer_1");
        assert_eq!(service_type, ServiceType::SameDay);
        assert_eq!(order.number, "ORD-1");
        responder.send(Err(BillingError::ActorCommunicationError("store offline".into()))).unwrap();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(BillingError::ActorCommunicationError(_))));
    }
}
