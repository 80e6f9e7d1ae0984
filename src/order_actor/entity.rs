use tracing::warn;

use crate::actor_framework::Entity;
use crate::domain::{normalize, NormalizedStatus, Order, OrderCreate};
use super::actions::{OrderAction, OrderActionResult};

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = (); // Billing and booking fields are immutable
    type Action = OrderAction;
    type ActionResult = OrderActionResult;

    /// Creates a new Order from creation parameters.
    ///
    /// # Notes
    /// The order starts as `pending` with no carrier state and no billing.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, String> {
        if params.order_number.trim().is_empty() {
            return Err("Order number required".to_string());
        }
        Ok(Self {
            id,
            order_number: params.order_number,
            customer_id: params.customer_id,
            service_type: params.service_type,
            order_date: params.order_date,
            carrier_state: None,
            status: NormalizedStatus::Pending,
            billing: None,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    /// A billed order is referenced by a usage record and must stay.
    fn on_delete(&self) -> Result<(), String> {
        if self.billing.is_some() {
            return Err(format!("Order {} has been billed", self.id));
        }
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, String> {
        match action {
            OrderAction::UpdateCarrierState(raw) => {
                let status = normalize(&raw);
                if self.status.is_terminal() && status != self.status {
                    warn!(order_id = %self.id, from = %self.status, to = %status, "Carrier moved order out of a terminal state");
                }
                self.carrier_state = Some(raw);
                self.status = status;
                Ok(OrderActionResult::UpdateCarrierState(status))
            }
            OrderAction::AttachBilling(allocation) => {
                if self.billing.is_some() {
                    return Err(format!("Order {} already billed", self.id));
                }
                self.billing = Some(allocation);
                Ok(OrderActionResult::AttachBilling(()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Allocation, ServiceType};
    use chrono::NaiveDate;

    fn order() -> Order {
        let params = OrderCreate::new(
            "ORD-7",
            "customer_1",
            ServiceType::Direct,
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        );
        Order::from_create_params("order_7".into(), params).unwrap()
    }

    #[test]
    fn carrier_state_is_normalized_and_kept_verbatim() {
        let mut order = order();
        let result = order.handle_action(OrderAction::UpdateCarrierState("order_in_transit".into())).unwrap();
        assert_eq!(result, OrderActionResult::UpdateCarrierState(NormalizedStatus::InTransit));
        assert_eq!(order.carrier_state.as_deref(), Some("order_in_transit"));

        order.handle_action(OrderAction::UpdateCarrierState("SOMETHING_NEW".into())).unwrap();
        assert_eq!(order.status, NormalizedStatus::Pending);
    }

    #[test]
    fn billing_attaches_once_and_blocks_delete() {
        let mut order = order();
        order.on_delete().unwrap();

        let allocation = Allocation::out_of_subscription(35.0, None);
        order.handle_action(OrderAction::AttachBilling(allocation.clone())).unwrap();
        assert!(order.handle_action(OrderAction::AttachBilling(allocation)).is_err());
        assert!(order.on_delete().is_err());
    }
}
