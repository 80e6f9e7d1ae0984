use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Lifecycle state shown for an order, independent of the carrier's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizedStatus {
    #[default]
    Pending,
    Assigned,
    PickedUp,
    InTransit,
    Delivered,
    Cancelled,
}

impl NormalizedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizedStatus::Pending => "pending",
            NormalizedStatus::Assigned => "assigned",
            NormalizedStatus::PickedUp => "picked_up",
            NormalizedStatus::InTransit => "in_transit",
            NormalizedStatus::Delivered => "delivered",
            NormalizedStatus::Cancelled => "cancelled",
        }
    }

    /// No further carrier updates are expected once an order is delivered or cancelled.
    pub fn is_terminal(&self) -> bool {
        matches!(self, NormalizedStatus::Delivered | NormalizedStatus::Cancelled)
    }
}

impl fmt::Display for NormalizedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a raw carrier order state onto a [`NormalizedStatus`].
///
/// Matching is case-insensitive but otherwise exact. Anything unrecognized,
/// including an empty or whitespace-padded string, is reported as `Pending`
/// rather than rejected.
pub fn normalize(raw: &str) -> NormalizedStatus {
    match raw.to_uppercase().as_str() {
        "NOT_ASSIGNED" | "ORDER_PLACED" | "PENDING" => NormalizedStatus::Pending,
        "ASSIGNED" | "ORDER_ASSIGNED" => NormalizedStatus::Assigned,
        "PICKED_UP" | "ORDER_PICKED_UP" => NormalizedStatus::PickedUp,
        "IN_TRANSIT" | "ORDER_IN_TRANSIT" => NormalizedStatus::InTransit,
        "DELIVERED" | "ORDER_DELIVERED" => NormalizedStatus::Delivered,
        "CANCELLED" | "ORDER_CANCELLED" => NormalizedStatus::Cancelled,
        other => {
            debug!(raw_state = %other, "Unrecognized carrier state, defaulting to pending");
            NormalizedStatus::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_known_carrier_state() {
        let table = [
            ("NOT_ASSIGNED", NormalizedStatus::Pending),
            ("ORDER_PLACED", NormalizedStatus::Pending),
            ("PENDING", NormalizedStatus::Pending),
            ("ASSIGNED", NormalizedStatus::Assigned),
            ("ORDER_ASSIGNED", NormalizedStatus::Assigned),
            ("PICKED_UP", NormalizedStatus::PickedUp),
            ("ORDER_PICKED_UP", NormalizedStatus::PickedUp),
            ("IN_TRANSIT", NormalizedStatus::InTransit),
            ("ORDER_IN_TRANSIT", NormalizedStatus::InTransit),
            ("DELIVERED", NormalizedStatus::Delivered),
            ("ORDER_DELIVERED", NormalizedStatus::Delivered),
            ("CANCELLED", NormalizedStatus::Cancelled),
            ("ORDER_CANCELLED", NormalizedStatus::Cancelled),
        ];
        for (raw, expected) in table {
            assert_eq!(normalize(raw), expected, "{raw}");
            assert_eq!(normalize(&raw.to_lowercase()), expected, "{raw} lowercased");
        }
    }

    #[test]
    fn mixed_case_is_accepted() {
        assert_eq!(normalize("Order_Picked_Up"), NormalizedStatus::PickedUp);
        assert_eq!(normalize("in_Transit"), NormalizedStatus::InTransit);
    }

    #[test]
    fn unknown_and_empty_default_to_pending() {
        assert_eq!(normalize(""), NormalizedStatus::Pending);
        assert_eq!(normalize("RETURNED_TO_SENDER"), NormalizedStatus::Pending);
        assert_eq!(normalize("DELIVERED_LATE"), NormalizedStatus::Pending);
    }

    #[test]
    fn padded_states_are_not_recognized() {
        assert_eq!(normalize(" DELIVERED "), NormalizedStatus::Pending);
        assert_eq!(normalize("order_assigned\n"), NormalizedStatus::Pending);
        assert_eq!(normalize("\tIN_TRANSIT"), NormalizedStatus::Pending);
    }

    #[test]
    fn terminal_states() {
        assert!(NormalizedStatus::Delivered.is_terminal());
        assert!(NormalizedStatus::Cancelled.is_terminal());
        assert!(!NormalizedStatus::InTransit.is_terminal());
        assert_eq!(NormalizedStatus::PickedUp.to_string(), "picked_up");
    }
}
