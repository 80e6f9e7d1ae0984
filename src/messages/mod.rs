//! Typed request messages for hand-written services. Each variant carries its
//! parameters and a oneshot channel for the reply.

use chrono::NaiveDate;
use tokio::sync::oneshot;

use crate::billing::BillingError;
use crate::domain::{
    Allocation, OrderRef, ServiceType, Subscription, SubscriptionCreate, SubscriptionPatch,
    UsageRecord, UsageSummary,
};

pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

#[derive(Debug)]
pub enum BillingRequest {
    CreateSubscription {
        params: SubscriptionCreate,
        respond_to: ServiceResponse<String, BillingError>,
    },
    GetSubscription {
        id: String,
        respond_to: ServiceResponse<Option<Subscription>, BillingError>,
    },
    ListSubscriptions {
        customer_id: String,
        respond_to: ServiceResponse<Vec<Subscription>, BillingError>,
    },
    ListActiveSubscriptions {
        customer_id: String,
        respond_to: ServiceResponse<Vec<Subscription>, BillingError>,
    },
    UpdateSubscription {
        id: String,
        patch: SubscriptionPatch,
        respond_to: ServiceResponse<Subscription, BillingError>,
    },
    CancelSubscription {
        id: String,
        respond_to: ServiceResponse<Subscription, BillingError>,
    },
    ExpireLapsed {
        today: NaiveDate,
        respond_to: ServiceResponse<Vec<String>, BillingError>,
    },
    Allocate {
        customer_id: String,
        service_type: ServiceType,
        order: OrderRef,
        respond_to: ServiceResponse<Allocation, BillingError>,
    },
    ReleaseUsage {
        order_id: String,
        respond_to: ServiceResponse<u32, BillingError>,
    },
    UsageFor {
        subscription_id: String,
        respond_to: ServiceResponse<Vec<UsageRecord>, BillingError>,
    },
    UsageSummary {
        subscription_id: String,
        respond_to: ServiceResponse<UsageSummary, BillingError>,
    },
    Shutdown,
}
