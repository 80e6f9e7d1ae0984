use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tracing::{info, warn};

use super::allocator::allocate;
use super::BillingError;
use crate::config::FallbackRates;
use crate::domain::{
    Allocation, OrderRef, ServiceType, Subscription, SubscriptionCreate, SubscriptionPatch,
    SubscriptionStatus, UsageRecord, UsageSummary,
};

/// In-memory store of subscriptions and their usage records.
///
/// Usage is append-only; consumed quota is always recomputed from the records.
#[derive(Debug, Default)]
pub struct BillingLedger {
    subscriptions: HashMap<String, Subscription>,
    usage: Vec<UsageRecord>,
    next_subscription_id: u64,
    next_usage_id: u64,
}

impl BillingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Subscriptions ---

    pub fn create_subscription(
        &mut self,
        params: SubscriptionCreate,
    ) -> Result<String, BillingError> {
        let id = format!("sub_{}", self.next_subscription_id + 1);
        let subscription = Subscription::from_create_params(id.clone(), params);
        subscription.validate().map_err(BillingError::InvalidSubscription)?;
        self.ensure_no_overlap(&subscription)?;

        self.next_subscription_id += 1;
        info!(
            subscription_id = %id,
            customer_id = %subscription.customer_id,
            "Subscription created"
        );
        self.subscriptions.insert(id.clone(), subscription);
        Ok(id)
    }

    pub fn get_subscription(&self, id: &str) -> Option<&Subscription> {
        self.subscriptions.get(id)
    }

    /// All subscriptions of a customer, oldest window first.
    pub fn list_subscriptions(&self, customer_id: &str) -> Vec<Subscription> {
        let mut subs: Vec<Subscription> = self
            .subscriptions
            .values()
            .filter(|s| s.customer_id == customer_id)
            .cloned()
            .collect();
        subs.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
        subs
    }

    pub fn list_active_subscriptions(&self, customer_id: &str) -> Vec<Subscription> {
        let mut subs = self.list_subscriptions(customer_id);
        subs.retain(Subscription::is_active);
        subs
    }

    /// Edits pricing, policy, quota or end date. Existing usage records keep
    /// the values they were billed with.
    pub fn update_subscription(
        &mut self,
        id: &str,
        patch: SubscriptionPatch,
    ) -> Result<Subscription, BillingError> {
        let mut updated = self
            .subscriptions
            .get(id)
            .cloned()
            .ok_or_else(|| BillingError::SubscriptionNotFound(id.to_string()))?;
        updated.apply(patch);
        updated.validate().map_err(BillingError::InvalidSubscription)?;
        self.ensure_no_overlap(&updated)?;

        self.subscriptions.insert(id.to_string(), updated.clone());
        info!(subscription_id = %id, "Subscription updated");
        Ok(updated)
    }

    pub fn cancel_subscription(&mut self, id: &str) -> Result<Subscription, BillingError> {
        let sub = self
            .subscriptions
            .get_mut(id)
            .ok_or_else(|| BillingError::SubscriptionNotFound(id.to_string()))?;
        if !sub.is_active() {
            return Err(BillingError::NotActive(id.to_string()));
        }
        sub.status = SubscriptionStatus::Cancelled;
        info!(subscription_id = %id, "Subscription cancelled");
        Ok(sub.clone())
    }

    /// Marks every active subscription whose window ended before `today` as expired.
    pub fn expire_lapsed(&mut self, today: NaiveDate) -> Vec<String> {
        let mut expired: Vec<String> = self
            .subscriptions
            .values_mut()
            .filter(|s| s.is_active() && s.end_date < today)
            .map(|s| {
                s.status = SubscriptionStatus::Expired;
                s.id.clone()
            })
            .collect();
        expired.sort();
        if !expired.is_empty() {
            info!(count = expired.len(), %today, "Expired lapsed subscriptions");
        }
        expired
    }

    /// The active subscription an order dated `date` is billed against: the one
    /// whose window contains the date, otherwise the most recently started one.
    pub fn active_subscription_for(
        &self,
        customer_id: &str,
        date: NaiveDate,
    ) -> Option<&Subscription> {
        let active = || {
            self.subscriptions
                .values()
                .filter(move |s| s.customer_id == customer_id && s.is_active())
        };
        active()
            .find(|s| s.covers(date))
            .or_else(|| {
                active().max_by(|a, b| {
                    a.start_date
                        .cmp(&b.start_date)
                        .then_with(|| a.id.cmp(&b.id))
                })
            })
    }

    fn ensure_no_overlap(&self, candidate: &Subscription) -> Result<(), BillingError> {
        if !candidate.is_active() {
            return Ok(());
        }
        let clash = self.subscriptions.values().find(|s| {
            s.id != candidate.id
                && s.customer_id == candidate.customer_id
                && s.is_active()
                && s.overlaps(candidate)
        });
        match clash {
            Some(existing) => {
                warn!(
                    customer_id = %candidate.customer_id,
                    existing = %existing.id,
                    "Rejected overlapping active subscription"
                );
                Err(BillingError::OverlappingSubscription {
                    customer_id: candidate.customer_id.clone(),
                    existing: existing.id.clone(),
                })
            }
            None => Ok(()),
        }
    }

    // --- Usage ---

    pub fn append_usage(&mut self, record: UsageRecord) {
        self.usage.push(record);
    }

    /// Drops the usage recorded for an order whose creation was rolled back
    /// and returns the quota units given back.
    ///
    /// Only for orders that never completed; billed orders keep their records.
    pub fn release_usage(&mut self, order_id: &str) -> u32 {
        let before = self.usage.len();
        let mut released = 0;
        self.usage.retain(|r| {
            if r.order_id == order_id {
                released += r.deducted_orders;
                false
            } else {
                true
            }
        });
        let dropped = before - self.usage.len();
        if dropped > 0 {
            info!(order_id, records = dropped, released, "Released usage of rolled back order");
        }
        released
    }

    pub fn sum_deducted_orders(&self, subscription_id: &str) -> u32 {
        self.usage
            .iter()
            .filter(|r| r.subscription_id == subscription_id)
            .map(|r| r.deducted_orders)
            .sum()
    }

    pub fn usage_for(&self, subscription_id: &str) -> Vec<UsageRecord> {
        self.usage
            .iter()
            .filter(|r| r.subscription_id == subscription_id)
            .cloned()
            .collect()
    }

    pub fn usage_summary(&self, subscription_id: &str) -> Result<UsageSummary, BillingError> {
        let sub = self
            .subscriptions
            .get(subscription_id)
            .ok_or_else(|| BillingError::SubscriptionNotFound(subscription_id.to_string()))?;
        let records = self.usage.iter().filter(|r| r.subscription_id == subscription_id);

        let (used_orders, additional_fees, record_count) =
            records.fold((0u32, 0.0f64, 0usize), |acc, r| {
                (acc.0 + r.deducted_orders, acc.1 + r.additional_fee, acc.2 + 1)
            });
        Ok(UsageSummary {
            subscription_id: subscription_id.to_string(),
            total_orders: sub.total_orders,
            used_orders,
            remaining_orders: sub.total_orders.saturating_sub(used_orders),
            additional_fees,
            record_count,
        })
    }

    // --- Allocation ---

    /// Looks up the customer's subscription, decides the billing outcome and
    /// appends a usage record when the decision was made inside a subscription.
    pub fn allocate(
        &mut self,
        customer_id: &str,
        service_type: ServiceType,
        order: &OrderRef,
        fallback: &FallbackRates,
    ) -> Allocation {
        let subscription = self.active_subscription_for(customer_id, order.date);
        let used = subscription.map_or(0, |s| self.sum_deducted_orders(&s.id));
        let decision = allocate(subscription, used, service_type, order.date, fallback);

        if decision.record_usage {
            if let Some(subscription_id) = decision.allocation.subscription_id.clone() {
                self.next_usage_id += 1;
                let record = UsageRecord {
                    id: format!("usage_{}", self.next_usage_id),
                    subscription_id,
                    order_id: order.id.clone(),
                    order_number: order.number.clone(),
                    service_type,
                    order_date: order.date,
                    is_within_subscription: decision.allocation.is_within_subscription,
                    deducted_orders: decision.allocation.deducted_orders,
                    additional_fee: decision.allocation.additional_fee,
                    recorded_at: Utc::now(),
                };
                self.append_usage(record);
            }
        }
        decision.allocation
    }
}
