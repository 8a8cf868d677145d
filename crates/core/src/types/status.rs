//! Role and status enums for marketplace entities.
//!
//! All of these are persisted as lowercase/display text columns and parsed
//! back with `FromStr`, so repository code can surface bad database values
//! as data-corruption errors instead of panicking.

use serde::{Deserialize, Serialize};

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// A regular shopper.
    #[default]
    Customer,
    /// Full access to the admin listing and deletion endpoints.
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// The type tag of a saved address.
///
/// A user's address list holds at most one address of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Default,
    Home,
    Office,
}

impl std::fmt::Display for AddressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Home => write!(f, "home"),
            Self::Office => write!(f, "office"),
        }
    }
}

impl std::str::FromStr for AddressKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "home" => Ok(Self::Home),
            "office" => Ok(Self::Office),
            _ => Err(format!("invalid address kind: {s}")),
        }
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order received, not yet handed to a carrier.
    #[default]
    Processing,
    /// Handed to the delivery partner. Stock is decremented on this transition.
    Shipped,
    /// Received by the customer. The shop's balance is credited on this transition.
    Delivered,
    /// Customer requested a refund.
    ProcessingRefund,
    /// Seller approved the refund. Stock is returned on this transition.
    RefundApproved,
}

impl OrderStatus {
    /// Whether an order may move from this status to `next`.
    ///
    /// The lifecycle is a one-way chain:
    /// processing -> shipped -> delivered -> `processing_refund` -> `refund_approved`.
    /// Regressions and skipped steps are rejected so the stock and balance
    /// side effects of each transition fire exactly once.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Processing, Self::Shipped)
                | (Self::Shipped, Self::Delivered)
                | (Self::Delivered, Self::ProcessingRefund)
                | (Self::ProcessingRefund, Self::RefundApproved)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::ProcessingRefund => write!(f, "processing_refund"),
            Self::RefundApproved => write!(f, "refund_approved"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "processing_refund" => Ok(Self::ProcessingRefund),
            "refund_approved" => Ok(Self::RefundApproved),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_roundtrip() {
        for role in [UserRole::Customer, UserRole::Admin] {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_user_role_rejects_unknown() {
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_address_kind_roundtrip() {
        for kind in [AddressKind::Default, AddressKind::Home, AddressKind::Office] {
            let parsed: AddressKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_order_status_roundtrip() {
        for status in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::ProcessingRefund,
            OrderStatus::RefundApproved,
        ] {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_order_status_transitions_are_forward_only() {
        use OrderStatus::{Delivered, Processing, ProcessingRefund, RefundApproved, Shipped};

        assert!(Processing.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Delivered.can_transition_to(ProcessingRefund));
        assert!(ProcessingRefund.can_transition_to(RefundApproved));

        // No regressions, no repeats, no skipped steps.
        assert!(!Delivered.can_transition_to(Shipped));
        assert!(!Delivered.can_transition_to(Delivered));
        assert!(!Processing.can_transition_to(Delivered));
        assert!(!Processing.can_transition_to(ProcessingRefund));
        assert!(!Shipped.can_transition_to(RefundApproved));
        assert!(!RefundApproved.can_transition_to(ProcessingRefund));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&OrderStatus::ProcessingRefund).unwrap();
        assert_eq!(json, "\"processing_refund\"");
    }
}
