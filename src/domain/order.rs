use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Allocation, NormalizedStatus, ServiceType};

/// A delivery order booked by a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub customer_id: String,
    pub service_type: ServiceType,
    pub order_date: NaiveDate,
    /// Last state string reported by the carrier, verbatim.
    pub carrier_state: Option<String>,
    pub status: NormalizedStatus,
    /// Billing outcome, attached once right after creation.
    pub billing: Option<Allocation>,
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub order_number: String,
    pub customer_id: String,
    pub service_type: ServiceType,
    pub order_date: NaiveDate,
}

impl OrderCreate {
    pub fn new(
        order_number: impl Into<String>,
        customer_id: impl Into<String>,
        service_type: ServiceType,
        order_date: NaiveDate,
    ) -> Self {
        Self {
            order_number: order_number.into(),
            customer_id: customer_id.into(),
            service_type,
            order_date,
        }
    }
}

/// Reference to an order as recorded against a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRef {
    pub id: String,
    pub number: String,
    pub date: NaiveDate,
}

impl Order {
    pub fn order_ref(&self) -> OrderRef {
        OrderRef {
            id: self.id.clone(),
            number: self.order_number.clone(),
            date: self.order_date,
        }
    }
}
