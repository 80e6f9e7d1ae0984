use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{error, info, Instrument};

use courier_billing::app_system::{setup_tracing, DeliverySystem};
use courier_billing::config::BillingConfig;
use courier_billing::domain::{CrossTypeHandling, CustomerCreate, OrderCreate, ServiceType, SubscriptionCreate};

fn day(y: i32, m: u32, d: u32) -> Result<NaiveDate, String> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| format!("invalid date {y}-{m}-{d}"))
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = BillingConfig::load(path.as_deref()).map_err(|e| e.to_string())?;
    setup_tracing(&config.log_filter);

    info!(?config, "Starting courier billing");

    let system = DeliverySystem::new(&config).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("customer_onboarding");
    let (customer_id, subscription_id) = async {
        info!("Creating customer and subscription");
        let customer_id = system
            .customer_client
            .create_customer(CustomerCreate::new("Acme Florists", "orders@acme.example"))
            .await
            .map_err(|e| e.to_string())?;

        let subscription_id = system
            .billing_client
            .create_subscription(SubscriptionCreate {
                customer_id: customer_id.clone(),
                service_type: ServiceType::SameDay,
                start_date: day(2026, 10, 1)?,
                end_date: day(2026, 10, 31)?,
                total_orders: 2,
                price: 90.0,
                out_of_subscription_same_day_price: 15.0,
                out_of_subscription_direct_price: 12.0,
                cross_type_handling: CrossTypeHandling::FixedFee,
                cross_type_same_day_fee: None,
                cross_type_direct_fee: Some(10.0),
                cross_type_orders_deducted: None,
            })
            .await
            .map_err(|e| e.to_string())?;
        Ok::<_, String>((customer_id, subscription_id))
    }
    .instrument(span)
    .await?;

    info!(customer_id = %customer_id, subscription_id = %subscription_id, "Customer onboarded");

    let bookings = [
        ("ORD-1001", ServiceType::Direct, day(2026, 10, 5)?),
        ("ORD-1002", ServiceType::SameDay, day(2026, 10, 6)?),
        ("ORD-1003", ServiceType::SameDay, day(2026, 10, 7)?),
        ("ORD-1004", ServiceType::SameDay, day(2026, 10, 8)?),
    ];

    let span = tracing::info_span!("order_processing");
    async {
        for (number, service_type, order_date) in bookings {
            let params = OrderCreate::new(number, customer_id.clone(), service_type, order_date);
            match system.order_client.create_order(params).await {
                Ok(order) => {
                    let status = system
                        .order_client
                        .update_carrier_state(order.id.clone(), "ORDER_ASSIGNED".to_string())
                        .await;
                    info!(order_id = %order.id, ?status, billing = ?order.billing, "Order processed");
                }
                Err(e) => error!(error = %e, order_number = number, "Order processing failed"),
            }
        }
    }
    .instrument(span)
    .await;

    let summary = system
        .billing_client
        .usage_summary(subscription_id)
        .await
        .map_err(|e| e.to_string())?;
    let rendered = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    println!("{rendered}");

    system.shutdown().await?;

    info!("Courier billing completed successfully");
    Ok(())
}
