use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery product an order is booked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "same-day")]
    SameDay,
    #[serde(rename = "direct")]
    Direct,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::SameDay => "same-day",
            ServiceType::Direct => "direct",
        }
    }

    /// Picks the value matching this service type.
    pub fn pick<T>(&self, same_day: T, direct: T) -> T {
        match self {
            ServiceType::SameDay => same_day,
            ServiceType::Direct => direct,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_dashboard_names() {
        assert_eq!(serde_json::to_string(&ServiceType::SameDay).unwrap(), "\"same-day\"");
        let parsed: ServiceType = serde_json::from_str("\"direct\"").unwrap();
        assert_eq!(parsed, ServiceType::Direct);
    }

    #[test]
    fn pick_selects_by_type() {
        assert_eq!(ServiceType::SameDay.pick(1, 2), 1);
        assert_eq!(ServiceType::Direct.pick(1, 2), 2);
    }
}
