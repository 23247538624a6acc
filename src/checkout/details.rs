//! Checkout form details

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delivery address entered at the first checkout step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient's full name
    pub name: String,

    /// Contact phone number
    pub phone: String,

    /// Contact email
    pub email: String,

    /// Street address
    pub street: String,

    /// City
    pub city: String,

    /// State
    pub state: String,

    /// Postal code
    pub pincode: String,
}

impl fmt::Display for ShippingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {} - {}",
            self.name, self.street, self.city, self.state, self.pincode
        )
    }
}

/// A delivery slot or payment method name was not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
}

/// Delivery speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliverySlot {
    /// 3-5 business days
    #[default]
    Standard,

    /// Same day, for a surcharge
    Express,
}

impl DeliverySlot {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DeliverySlot::Standard => "standard",
            DeliverySlot::Express => "express",
        }
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DeliverySlot::Standard => "Standard Delivery (3-5 days)",
            DeliverySlot::Express => "Express Delivery (Same day)",
        }
    }
}

impl FromStr for DeliverySlot {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(DeliverySlot::Standard),
            "express" => Ok(DeliverySlot::Express),
            other => Err(UnknownOption {
                kind: "delivery slot",
                value: other.to_string(),
            }),
        }
    }
}

/// How the order will be paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// UPI apps
    Upi,

    /// Credit or debit card
    Card,

    /// Cash on delivery
    #[default]
    Cod,
}

impl PaymentMethod {
    /// Every payment method, in display order.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Upi,
        PaymentMethod::Card,
        PaymentMethod::Cod,
    ];

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
            PaymentMethod::Cod => "cod",
        }
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Cod => "Cash on Delivery",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| UnknownOption {
                kind: "payment method",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_are_standard_and_cash_on_delivery() {
        assert_eq!(DeliverySlot::default(), DeliverySlot::Standard);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cod);
    }

    #[test]
    fn options_parse_wire_names() -> TestResult {
        assert_eq!("express".parse::<DeliverySlot>()?, DeliverySlot::Express);
        assert_eq!("upi".parse::<PaymentMethod>()?, PaymentMethod::Upi);
        assert!("overnight".parse::<DeliverySlot>().is_err());
        assert!("cheque".parse::<PaymentMethod>().is_err());

        Ok(())
    }

    #[test]
    fn address_displays_on_one_line() {
        let address = ShippingAddress {
            name: "Asha Rao".to_string(),
            street: "12 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
            ..ShippingAddress::default()
        };

        assert_eq!(
            address.to_string(),
            "Asha Rao, 12 MG Road, Bengaluru, Karnataka - 560001"
        );
    }
}
