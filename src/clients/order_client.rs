use tracing::{error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::{BillingClient, CustomerClient};
use crate::domain::{NormalizedStatus, Order, OrderCreate};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};

/// Client for interacting with the Order actor.
///
/// Order creation is orchestrated here: the customer is validated, the order
/// stored, billed against the customer's subscription, and the billing
/// outcome attached to it.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    customer_client: CustomerClient,
    billing_client: BillingClient,
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        customer_client: CustomerClient,
        billing_client: BillingClient,
    ) -> Self {
        Self {
            inner,
            customer_client,
            billing_client,
        }
    }

    #[instrument(
        skip(self, params),
        fields(
            order_number = %params.order_number,
            customer_id = %params.customer_id,
            service_type = %params.service_type
        )
    )]
    pub async fn create_order(&self, params: OrderCreate) -> Result<Order, OrderError> {
        info!("Processing create_order request");

        // Step 1: Validate customer
        match self.customer_client.get_customer(params.customer_id.clone()).await {
            Ok(Some(customer)) => info!(customer_name = %customer.name, "Customer validation successful"),
            Ok(None) => {
                error!("Customer not found");
                return Err(OrderError::InvalidCustomer(params.customer_id));
            }
            Err(e) => {
                error!(error = %e, "Customer validation failed");
                return Err(OrderError::InvalidCustomer(format!("Customer validation failed: {}", e)));
            }
        }

        // Step 2: Store the order
        let customer_id = params.customer_id.clone();
        let service_type = params.service_type;
        let order_id = self.inner.create(params).await.map_err(OrderError::from)?;
        let order = self
            .inner
            .get(order_id.clone())
            .await
            .map_err(OrderError::from)?
            .ok_or_else(|| OrderError::NotFound(order_id.clone()))?;

        // Step 3: Bill against the subscription, removing the order if that fails
        let allocation = match self
            .billing_client
            .allocate(customer_id, service_type, order.order_ref())
            .await
        {
            Ok(allocation) => allocation,
            Err(e) => {
                error!(error = %e, order_id = %order_id, "Allocation failed");
                if let Err(cleanup) = self.inner.delete(order_id.clone()).await {
                    warn!(error = %cleanup, order_id = %order_id, "Could not remove unbilled order");
                }
                return Err(OrderError::BillingFailed(e.to_string()));
            }
        };

        // Step 4: Attach the outcome, rolling back order and usage if that fails
        if let Err(e) = self
            .inner
            .perform_action(order_id.clone(), OrderAction::AttachBilling(allocation.clone()))
            .await
        {
            error!(error = %e, order_id = %order_id, "Attaching billing failed");
            self.roll_back(&order_id).await;
            return Err(OrderError::from(e));
        }

        info!(
            order_id = %order_id,
            deducted_orders = allocation.deducted_orders,
            additional_fee = allocation.additional_fee,
            "Order created"
        );
        Ok(Order {
            billing: Some(allocation),
            ..order
        })
    }

    /// Undoes steps 2 and 3 for an order the caller is told failed.
    async fn roll_back(&self, order_id: &str) {
        if let Err(e) = self.inner.delete(order_id.to_string()).await {
            warn!(error = %e, order_id = %order_id, "Could not remove unbilled order");
        }
        match self.billing_client.release_usage(order_id.to_string()).await {
            Ok(released) => info!(order_id = %order_id, released, "Usage released"),
            Err(e) => error!(error = %e, order_id = %order_id, "Usage left recorded for a failed order"),
        }
    }

    /// Records a raw carrier state for the order and returns its normalized status.
    #[instrument(skip(self))]
    pub async fn update_carrier_state(&self, id: String, raw_state: String) -> Result<NormalizedStatus, OrderError> {
        match self.inner.perform_action(id, OrderAction::UpdateCarrierState(raw_state)).await {
            Ok(OrderActionResult::UpdateCarrierState(status)) => {
                info!(%status, "Carrier state recorded");
                Ok(status)
            }
            Ok(other) => Err(OrderError::ActorCommunicationError(format!("Unexpected result: {:?}", other))),
            Err(e) => Err(OrderError::from(e)),
        }
    }
}

impl_client_methods!(OrderClient, Order, OrderError, order);
