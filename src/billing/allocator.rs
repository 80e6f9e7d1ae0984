//! The billing decision for a single order.
//!
//! [`allocate`] is pure: the ledger hands it the selected subscription and the
//! quota already consumed, and records whatever it decides.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::FallbackRates;
use crate::domain::{Allocation, CrossTypeHandling, ServiceType, Subscription};

/// Outcome of [`allocate`]: the billing result plus whether a usage record
/// must be appended for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub allocation: Allocation,
    pub record_usage: bool,
}

/// Decides how an order of `service_type` dated `order_date` is billed.
///
/// `subscription` is the customer's active subscription, if any, and
/// `used_orders` the sum of quota already deducted against it.
pub fn allocate(
    subscription: Option<&Subscription>,
    used_orders: u32,
    service_type: ServiceType,
    order_date: NaiveDate,
    fallback: &FallbackRates,
) -> Decision {
    let Some(sub) = subscription else {
        debug!(%service_type, "No active subscription, billing fallback rate");
        return Decision {
            allocation: Allocation::out_of_subscription(fallback.rate_for(service_type), None),
            record_usage: false,
        };
    };

    if !sub.covers(order_date) {
        debug!(subscription_id = %sub.id, %order_date, "Order outside subscription window");
        return Decision {
            allocation: Allocation::out_of_subscription(
                sub.out_of_subscription_price(service_type),
                Some(sub.id.clone()),
            ),
            record_usage: false,
        };
    }

    let remaining = sub.total_orders.saturating_sub(used_orders);
    let overage = || {
        Allocation::out_of_subscription(
            sub.out_of_subscription_price(service_type),
            Some(sub.id.clone()),
        )
    };
    let covered = |units: u32| Allocation {
        deducted_orders: units,
        additional_fee: 0.0,
        subscription_id: Some(sub.id.clone()),
        is_within_subscription: true,
    };

    let allocation = if service_type == sub.service_type {
        if remaining > 0 {
            covered(1)
        } else {
            overage()
        }
    } else {
        match sub.cross_type_handling {
            CrossTypeHandling::FixedFee => Allocation {
                deducted_orders: 0,
                additional_fee: sub.cross_type_fee(service_type),
                subscription_id: Some(sub.id.clone()),
                is_within_subscription: false,
            },
            CrossTypeHandling::DeductOrders => {
                let units = sub.cross_type_units();
                if remaining >= units {
                    covered(units)
                } else {
                    overage()
                }
            }
        }
    };

    debug!(
        subscription_id = %sub.id,
        remaining,
        deducted = allocation.deducted_orders,
        fee = allocation.additional_fee,
        "Allocated order against subscription"
    );
    Decision { allocation, record_usage: true }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SubscriptionCreate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fallback() -> FallbackRates {
        FallbackRates::new(25.0, 35.0).unwrap()
    }

    fn same_day_plan(total_orders: u32, handling: CrossTypeHandling) -> Subscription {
        Subscription::from_create_params(
            "sub_1".to_string(),
            SubscriptionCreate {
                customer_id: "customer_1".to_string(),
                service_type: ServiceType::SameDay,
                start_date: date(2026, 1, 1),
                end_date: date(2026, 1, 31),
                total_orders,
                price: 200.0,
                out_of_subscription_same_day_price: 15.0,
                out_of_subscription_direct_price: 12.0,
                cross_type_handling: handling,
                cross_type_same_day_fee: None,
                cross_type_direct_fee: Some(10.0),
                cross_type_orders_deducted: None,
            },
        )
    }

    #[test]
    fn no_subscription_uses_fallback_rate() {
        let d = allocate(None, 0, ServiceType::Direct, date(2026, 1, 5), &fallback());
        assert_eq!(d.allocation, Allocation::out_of_subscription(35.0, None));
        assert!(!d.record_usage);

        let d = allocate(None, 0, ServiceType::SameDay, date(2026, 1, 5), &fallback());
        assert_eq!(d.allocation.additional_fee, 25.0);
        assert_eq!(d.allocation.deducted_orders, 0);
    }

    #[test]
    fn outside_window_ignores_remaining_quota() {
        let sub = same_day_plan(5, CrossTypeHandling::FixedFee);
        for order_date in [date(2025, 12, 31), date(2026, 2, 1)] {
            let d = allocate(Some(&sub), 0, ServiceType::SameDay, order_date, &fallback());
            assert_eq!(d.allocation.deducted_orders, 0);
            assert_eq!(d.allocation.additional_fee, 15.0);
            assert_eq!(d.allocation.subscription_id.as_deref(), Some("sub_1"));
            assert!(!d.record_usage);
        }
    }

    #[test]
    fn native_orders_consume_quota_then_pay_overage() {
        let sub = same_day_plan(2, CrossTypeHandling::FixedFee);
        let day = date(2026, 1, 10);

        let first = allocate(Some(&sub), 0, ServiceType::SameDay, day, &fallback());
        assert_eq!((first.allocation.deducted_orders, first.allocation.additional_fee), (1, 0.0));
        assert!(first.allocation.is_within_subscription);

        let second = allocate(Some(&sub), 1, ServiceType::SameDay, day, &fallback());
        assert_eq!((second.allocation.deducted_orders, second.allocation.additional_fee), (1, 0.0));

        let third = allocate(Some(&sub), 2, ServiceType::SameDay, day, &fallback());
        assert_eq!((third.allocation.deducted_orders, third.allocation.additional_fee), (0, 15.0));
        assert!(!third.allocation.is_within_subscription);
        assert!(third.record_usage);
    }

    #[test]
    fn cross_type_fixed_fee_beats_overage_rate() {
        let sub = same_day_plan(2, CrossTypeHandling::FixedFee);
        let d = allocate(Some(&sub), 0, ServiceType::Direct, date(2026, 1, 10), &fallback());
        assert_eq!(d.allocation.deducted_orders, 0);
        assert_eq!(d.allocation.additional_fee, 10.0);
        assert!(!d.allocation.is_within_subscription);
    }

    #[test]
    fn cross_type_fixed_fee_defaults_to_zero() {
        let mut sub = same_day_plan(2, CrossTypeHandling::FixedFee);
        sub.cross_type_direct_fee = None;
        let d = allocate(Some(&sub), 0, ServiceType::Direct, date(2026, 1, 10), &fallback());
        assert_eq!(d.allocation.additional_fee, 0.0);
    }

    #[test]
    fn cross_type_deduction_never_partial() {
        let mut sub = same_day_plan(3, CrossTypeHandling::DeductOrders);
        sub.cross_type_orders_deducted = Some(2);
        let day = date(2026, 1, 10);

        let d = allocate(Some(&sub), 1, ServiceType::Direct, day, &fallback());
        assert_eq!(d.allocation.deducted_orders, 2);
        assert!(d.allocation.is_within_subscription);

        // One unit left, two required
        let d = allocate(Some(&sub), 2, ServiceType::Direct, day, &fallback());
        assert_eq!(d.allocation.deducted_orders, 0);
        assert_eq!(d.allocation.additional_fee, 12.0);
        assert!(!d.allocation.is_within_subscription);
    }

    #[test]
    fn over_consumed_quota_never_goes_negative() {
        // Quota lowered after usage was recorded
        let sub = same_day_plan(1, CrossTypeHandling::DeductOrders);
        let d = allocate(Some(&sub), 4, ServiceType::SameDay, date(2026, 1, 10), &fallback());
        assert_eq!(d.allocation.deducted_orders, 0);
        assert_eq!(d.allocation.additional_fee, 15.0);
    }
}
