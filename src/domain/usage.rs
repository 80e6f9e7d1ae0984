use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ServiceType;

/// How a single order was billed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub deducted_orders: u32,
    pub additional_fee: f64,
    pub subscription_id: Option<String>,
    pub is_within_subscription: bool,
}

impl Allocation {
    /// Billed outside any subscription context.
    pub fn out_of_subscription(fee: f64, subscription_id: Option<String>) -> Self {
        Self {
            deducted_orders: 0,
            additional_fee: fee,
            subscription_id,
            is_within_subscription: false,
        }
    }
}

/// Ledger entry written when an order is allocated against a subscription.
/// Never updated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: String,
    pub subscription_id: String,
    pub order_id: String,
    pub order_number: String,
    pub service_type: ServiceType,
    pub order_date: NaiveDate,
    pub is_within_subscription: bool,
    pub deducted_orders: u32,
    pub additional_fee: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Quota and fee totals for one subscription, derived from its usage records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub subscription_id: String,
    pub total_orders: u32,
    pub used_orders: u32,
    pub remaining_orders: u32,
    pub additional_fees: f64,
    pub record_count: usize,
}
