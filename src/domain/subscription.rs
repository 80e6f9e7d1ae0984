use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ServiceType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

/// Billing policy for orders whose type differs from the subscription's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossTypeHandling {
    /// Charge a flat fee per crossing order; quota is untouched.
    FixedFee,
    /// Consume quota units per crossing order.
    DeductOrders,
}

/// A prepaid order bundle held by one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub customer_id: String,
    pub service_type: ServiceType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_orders: u32,
    pub status: SubscriptionStatus,
    pub price: f64,
    pub out_of_subscription_same_day_price: f64,
    pub out_of_subscription_direct_price: f64,
    pub cross_type_handling: CrossTypeHandling,
    pub cross_type_same_day_fee: Option<f64>,
    pub cross_type_direct_fee: Option<f64>,
    pub cross_type_orders_deducted: Option<u32>,
}

impl Subscription {
    pub fn from_create_params(id: String, params: SubscriptionCreate) -> Self {
        Self {
            id,
            customer_id: params.customer_id,
            service_type: params.service_type,
            start_date: params.start_date,
            end_date: params.end_date,
            total_orders: params.total_orders,
            status: SubscriptionStatus::Active,
            price: params.price,
            out_of_subscription_same_day_price: params.out_of_subscription_same_day_price,
            out_of_subscription_direct_price: params.out_of_subscription_direct_price,
            cross_type_handling: params.cross_type_handling,
            cross_type_same_day_fee: params.cross_type_same_day_fee,
            cross_type_direct_fee: params.cross_type_direct_fee,
            cross_type_orders_deducted: params.cross_type_orders_deducted,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Window bounds are inclusive on both ends.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn overlaps(&self, other: &Subscription) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }

    pub fn out_of_subscription_price(&self, service_type: ServiceType) -> f64 {
        service_type.pick(
            self.out_of_subscription_same_day_price,
            self.out_of_subscription_direct_price,
        )
    }

    pub fn cross_type_fee(&self, service_type: ServiceType) -> f64 {
        service_type
            .pick(self.cross_type_same_day_fee, self.cross_type_direct_fee)
            .unwrap_or(0.0)
    }

    pub fn cross_type_units(&self) -> u32 {
        self.cross_type_orders_deducted.unwrap_or(1)
    }

    /// Checks the record's own fields, without regard to other subscriptions.
    pub fn validate(&self) -> Result<(), String> {
        if self.start_date > self.end_date {
            return Err(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            ));
        }
        let amounts = [
            ("price", Some(self.price)),
            ("out_of_subscription_same_day_price", Some(self.out_of_subscription_same_day_price)),
            ("out_of_subscription_direct_price", Some(self.out_of_subscription_direct_price)),
            ("cross_type_same_day_fee", self.cross_type_same_day_fee),
            ("cross_type_direct_fee", self.cross_type_direct_fee),
        ];
        for (name, amount) in amounts {
            if let Some(value) = amount {
                if !value.is_finite() || value < 0.0 {
                    return Err(format!("{name} must be a non-negative amount, got {value}"));
                }
            }
        }
        if self.cross_type_orders_deducted == Some(0) {
            return Err("cross_type_orders_deducted must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Payload for creating a new subscription. New subscriptions start active.
#[derive(Debug, Clone)]
pub struct SubscriptionCreate {
    pub customer_id: String,
    pub service_type: ServiceType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_orders: u32,
    pub price: f64,
    pub out_of_subscription_same_day_price: f64,
    pub out_of_subscription_direct_price: f64,
    pub cross_type_handling: CrossTypeHandling,
    pub cross_type_same_day_fee: Option<f64>,
    pub cross_type_direct_fee: Option<f64>,
    pub cross_type_orders_deducted: Option<u32>,
}

/// Payload for editing pricing, policy and quota of an existing subscription.
///
/// Status changes go through cancel/expire, not through a patch.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionPatch {
    pub end_date: Option<NaiveDate>,
    pub total_orders: Option<u32>,
    pub price: Option<f64>,
    pub out_of_subscription_same_day_price: Option<f64>,
    pub out_of_subscription_direct_price: Option<f64>,
    pub cross_type_handling: Option<CrossTypeHandling>,
    pub cross_type_same_day_fee: Option<f64>,
    pub cross_type_direct_fee: Option<f64>,
    pub cross_type_orders_deducted: Option<u32>,
}

impl Subscription {
    pub fn apply(&mut self, patch: SubscriptionPatch) {
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(total_orders) = patch.total_orders {
            self.total_orders = total_orders;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(price) = patch.out_of_subscription_same_day_price {
            self.out_of_subscription_same_day_price = price;
        }
        if let Some(price) = patch.out_of_subscription_direct_price {
            self.out_of_subscription_direct_price = price;
        }
        if let Some(handling) = patch.cross_type_handling {
            self.cross_type_handling = handling;
        }
        if patch.cross_type_same_day_fee.is_some() {
            self.cross_type_same_day_fee = patch.cross_type_same_day_fee;
        }
        if patch.cross_type_direct_fee.is_some() {
            self.cross_type_direct_fee = patch.cross_type_direct_fee;
        }
        if patch.cross_type_orders_deducted.is_some() {
            self.cross_type_orders_deducted = patch.cross_type_orders_deducted;
        }
    }
}
