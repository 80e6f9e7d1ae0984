use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::actor_framework::{Entity, ResourceActor};
use crate::billing::BillingService;
use crate::clients::{BillingClient, CustomerClient, OrderClient};
use crate::config::{BillingConfig, ConfigError};
use crate::domain::{Customer, Order};

fn id_sequence(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

fn spawn_resource<T: Entity<Id = String>>(
    buffer_size: usize,
    prefix: &'static str,
    handles: &mut Vec<tokio::task::JoinHandle<()>>,
) -> crate::actor_framework::ResourceClient<T> {
    let (actor, client) = ResourceActor::<T>::new(buffer_size, id_sequence(prefix));
    handles.push(tokio::spawn(actor.run()));
    client
}

/// Owns every actor task and hands out the clients used to reach them.
pub struct DeliverySystem {
    pub customer_client: CustomerClient,
    pub order_client: OrderClient,
    pub billing_client: BillingClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl DeliverySystem {
    /// Starts the customer, billing and order actors, in dependency order.
    ///
    /// The configuration is validated first; nothing is spawned if it is
    /// rejected. Must be called from within a Tokio runtime.
    #[instrument(name = "delivery_system", skip(config))]
    pub fn new(config: &BillingConfig) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            error!(error = %e, "Rejected billing configuration");
            return Err(e);
        }
        let fallback = config.fallback_rates()?;
        let mut handles = Vec::new();
        let buffer = config.channel_buffer;

        info!(buffer, "Starting delivery system");

        let customer_client = CustomerClient::new(spawn_resource::<Customer>(buffer, "customer", &mut handles));

        let (billing_service, billing_client) = BillingService::new(buffer, fallback);
        handles.push(tokio::spawn(billing_service.run()));

        let order_client = OrderClient::new(
            spawn_resource::<Order>(buffer, "order", &mut handles),
            customer_client.clone(),
            billing_client.clone(),
        );

        info!("Delivery system started");

        Ok(Self {
            customer_client,
            order_client,
            billing_client,
            handles,
        })
    }

    /// Stops the billing service, closes every channel and waits for all tasks.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down delivery system");

        if let Err(e) = self.billing_client.shutdown().await {
            error!(error = %e, "Billing shutdown request failed");
        }

        // Resource actors stop once every client clone is gone
        drop(self.order_client);
        drop(self.customer_client);
        drop(self.billing_client);

        let mut failures = 0;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                failures += 1;
            }
        }

        if failures > 0 {
            return Err(format!("{} actor task(s) failed during shutdown", failures));
        }
        info!("Delivery system shutdown complete");
        Ok(())
    }
}
