use crate::domain::{Allocation, NormalizedStatus};

/// Custom actions for Order entities.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Records a raw carrier state and its normalized status.
    UpdateCarrierState(String),
    /// Attaches the billing outcome.
    ///
    /// # Errors
    /// Fails if the order has already been billed.
    AttachBilling(Allocation),
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    UpdateCarrierState(NormalizedStatus),
    AttachBilling(()),
}
