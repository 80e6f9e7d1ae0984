use chrono::NaiveDate;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::{BillingError, BillingLedger};
use crate::clients::BillingClient;
use crate::config::FallbackRates;
use crate::domain::{
    Allocation, OrderRef, ServiceType, Subscription, SubscriptionCreate, SubscriptionPatch,
};
use crate::messages::{BillingRequest, ServiceResponse};

/// Actor that owns the billing ledger.
///
/// Every request is handled to completion before the next one is read, so the
/// lookup, decision and usage append of one allocation can never interleave
/// with another allocation for the same subscription.
pub struct BillingService {
    receiver: mpsc::Receiver<BillingRequest>,
    ledger: BillingLedger,
    fallback: FallbackRates,
}

impl BillingService {
    pub fn new(buffer_size: usize, fallback: FallbackRates) -> (Self, BillingClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            ledger: BillingLedger::new(),
            fallback,
        };
        (service, BillingClient::new(sender))
    }

    #[instrument(name = "billing_service", skip(self))]
    pub async fn run(mut self) {
        info!("BillingService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                BillingRequest::CreateSubscription { params, respond_to } => {
                    self.handle_create_subscription(params, respond_to);
                }
                BillingRequest::GetSubscription { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.ledger.get_subscription(&id).cloned()));
                }
                BillingRequest::ListSubscriptions { customer_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.ledger.list_subscriptions(&customer_id)));
                }
                BillingRequest::ListActiveSubscriptions { customer_id, respond_to } => {
                    let active = self.ledger.list_active_subscriptions(&customer_id);
                    let _ = respond_to.send(Ok(active));
                }
                BillingRequest::UpdateSubscription { id, patch, respond_to } => {
                    self.handle_update_subscription(id, patch, respond_to);
                }
                BillingRequest::CancelSubscription { id, respond_to } => {
                    let _ = respond_to.send(self.ledger.cancel_subscription(&id));
                }
                BillingRequest::ExpireLapsed { today, respond_to } => {
                    self.handle_expire_lapsed(today, respond_to);
                }
                BillingRequest::Allocate { customer_id, service_type, order, respond_to } => {
                    self.handle_allocate(customer_id, service_type, order, respond_to);
                }
                BillingRequest::ReleaseUsage { order_id, respond_to } => {
                    self.handle_release_usage(order_id, respond_to);
                }
                BillingRequest::UsageFor { subscription_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.ledger.usage_for(&subscription_id)));
                }
                BillingRequest::UsageSummary { subscription_id, respond_to } => {
                    let _ = respond_to.send(self.ledger.usage_summary(&subscription_id));
                }
                BillingRequest::Shutdown => {
                    info!("BillingService shutting down");
                    break;
                }
            }
        }

        info!("BillingService stopped");
    }

    #[instrument(
        fields(customer_id = %params.customer_id, service_type = %params.service_type),
        skip(self, params, respond_to)
    )]
    fn handle_create_subscription(
        &mut self,
        params: SubscriptionCreate,
        respond_to: ServiceResponse<String, BillingError>,
    ) {
        debug!("Processing create_subscription request");
        let result = self.ledger.create_subscription(params);
        if let Err(e) = &result {
            warn!(error = %e, "Subscription rejected");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(fields(subscription_id = %id), skip(self, patch, respond_to))]
    fn handle_update_subscription(
        &mut self,
        id: String,
        patch: SubscriptionPatch,
        respond_to: ServiceResponse<Subscription, BillingError>,
    ) {
        debug!(?patch, "Processing update_subscription request");
        let _ = respond_to.send(self.ledger.update_subscription(&id, patch));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_expire_lapsed(
        &mut self,
        today: NaiveDate,
        respond_to: ServiceResponse<Vec<String>, BillingError>,
    ) {
        debug!("Processing expire_lapsed request");
        let _ = respond_to.send(Ok(self.ledger.expire_lapsed(today)));
    }

    #[instrument(
        fields(customer_id = %customer_id, service_type = %service_type, order_id = %order.id),
        skip(self, customer_id, order, respond_to)
    )]
    fn handle_allocate(
        &mut self,
        customer_id: String,
        service_type: ServiceType,
        order: OrderRef,
        respond_to: ServiceResponse<Allocation, BillingError>,
    ) {
        debug!("Processing allocate request");
        let allocation = self
            .ledger
            .allocate(&customer_id, service_type, &order, &self.fallback);
        info!(
            deducted_orders = allocation.deducted_orders,
            additional_fee = allocation.additional_fee,
            within_subscription = allocation.is_within_subscription,
            "Order allocated"
        );
        let _ = respond_to.send(Ok(allocation));
    }

    #[instrument(fields(order_id = %order_id), skip(self, order_id, respond_to))]
    fn handle_release_usage(
        &mut self,
        order_id: String,
        respond_to: ServiceResponse<u32, BillingError>,
    ) {
        debug!("Processing release_usage request");
        let _ = respond_to.send(Ok(self.ledger.release_usage(&order_id)));
    }
}

// Seeding the ledger before the actor starts.
#[cfg(test)]
impl BillingService {
    pub fn ledger_mut(&mut self) -> &mut BillingLedger {
        &mut self.ledger
    }
}
