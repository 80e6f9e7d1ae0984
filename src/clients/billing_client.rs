use chrono::NaiveDate;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::billing::BillingError;
use crate::domain::{
    Allocation, OrderRef, ServiceType, Subscription, SubscriptionCreate, SubscriptionPatch,
    UsageRecord, UsageSummary,
};
use crate::messages::BillingRequest;

/// Client for the billing service.
#[derive(Clone)]
pub struct BillingClient {
    sender: mpsc::Sender<BillingRequest>,
}

impl BillingClient {
    pub fn new(sender: mpsc::Sender<BillingRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), BillingError> {
        debug!("Sending shutdown request");
        self.sender
            .send(BillingRequest::Shutdown)
            .await
            .map_err(|e| BillingError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(BillingClient => fn create_subscription(params: SubscriptionCreate) -> String as BillingRequest::CreateSubscription, Error = BillingError);
client_method!(BillingClient => fn get_subscription(id: String) -> Option<Subscription> as BillingRequest::GetSubscription, Error = BillingError);
client_method!(BillingClient => fn list_subscriptions(customer_id: String) -> Vec<Subscription> as BillingRequest::ListSubscriptions, Error = BillingError);
client_method!(BillingClient => fn list_active_subscriptions(customer_id: String) -> Vec<Subscription> as BillingRequest::ListActiveSubscriptions, Error = BillingError);
client_method!(BillingClient => fn update_subscription(id: String, patch: SubscriptionPatch) -> Subscription as BillingRequest::UpdateSubscription, Error = BillingError);
client_method!(BillingClient => fn cancel_subscription(id: String) -> Subscription as BillingRequest::CancelSubscription, Error = BillingError);
client_method!(BillingClient => fn expire_lapsed(today: NaiveDate) -> Vec<String> as BillingRequest::ExpireLapsed, Error = BillingError);
client_method!(BillingClient => fn allocate(customer_id: String, service_type: ServiceType, order: OrderRef) -> Allocation as BillingRequest::Allocate, Error = BillingError);
client_method!(BillingClient => fn release_usage(order_id: String) -> u32 as BillingRequest::ReleaseUsage, Error = BillingError);
client_method!(BillingClient => fn usage_for(subscription_id: String) -> Vec<UsageRecord> as BillingRequest::UsageFor, Error = BillingError);
client_method!(BillingClient => fn usage_summary(subscription_id: String) -> UsageSummary as BillingRequest::UsageSummary, Error = BillingError);
