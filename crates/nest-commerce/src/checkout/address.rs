//! Address types.

use crate::error::CommerceError;
use crate::ids::{AddressId, UserId};
use serde::{Deserialize, Serialize};

/// Country used when an address doesn't name one.
pub const DEFAULT_COUNTRY: &str = "Uzbekistan";

/// A saved shipping address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Address {
    /// Address ID.
    pub id: AddressId,
    /// Owner.
    pub user_id: UserId,
    /// Recipient name.
    pub full_name: String,
    /// Contact phone.
    pub phone: String,
    /// Street address.
    pub address_line1: String,
    /// Apartment, suite, etc.
    pub address_line2: Option<String>,
    /// City.
    pub city: String,
    /// State/region.
    pub state: Option<String>,
    /// Postal/ZIP code.
    pub postal_code: String,
    /// Country name.
    pub country: String,
    /// At most one address per user is the default.
    pub is_default: bool,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Address {
    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address_line1.clone()];
        if let Some(ref line2) = self.address_line2 {
            parts.push(line2.clone());
        }
        parts.push(self.city.clone());
        if let Some(ref state) = self.state {
            parts.push(state.clone());
        }
        parts.push(self.postal_code.clone());
        parts.push(self.country.clone());
        parts.join(", ")
    }

    /// Street portion copied onto an order.
    pub fn street(&self) -> String {
        match &self.address_line2 {
            Some(line2) if !line2.is_empty() => format!("{}, {}", self.address_line1, line2),
            _ => self.address_line1.clone(),
        }
    }
}

/// Input for creating or updating a saved address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressDraft {
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl Default for AddressDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            phone: String::new(),
            address_line1: String::new(),
            address_line2: None,
            city: String::new(),
            state: None,
            postal_code: String::new(),
            country: default_country(),
            is_default: false,
        }
    }
}

impl AddressDraft {
    /// Check that every required field is present.
    pub fn validate(&self) -> Result<(), CommerceError> {
        require("full_name", &self.full_name)?;
        require("phone", &self.phone)?;
        require("address_line1", &self.address_line1)?;
        require("city", &self.city)?;
        require("postal_code", &self.postal_code)?;
        require("country", &self.country)?;
        Ok(())
    }
}

/// Shipping fields captured on an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ShippingDetails {
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub shipping_city: String,
    #[serde(default)]
    pub shipping_postal_code: String,
    #[serde(default, alias = "phone")]
    pub shipping_phone: String,
}

impl ShippingDetails {
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            shipping_address: address.into(),
            shipping_city: city.into(),
            shipping_postal_code: String::new(),
            shipping_phone: phone.into(),
        }
    }

    /// Copy the shipping fields from a saved address.
    pub fn from_address(address: &Address) -> Self {
        Self {
            shipping_address: address.street(),
            shipping_city: address.city.clone(),
            shipping_postal_code: address.postal_code.clone(),
            shipping_phone: address.phone.clone(),
        }
    }

    /// Set the postal code.
    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.shipping_postal_code = postal_code.into();
        self
    }

    /// Check that address, city and phone are present.
    pub fn validate(&self) -> Result<(), CommerceError> {
        require("shipping_address", &self.shipping_address)?;
        require("shipping_city", &self.shipping_city)?;
        require("shipping_phone", &self.shipping_phone)?;
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), CommerceError> {
    if value.trim().is_empty() {
        return Err(CommerceError::MissingField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved() -> Address {
        Address {
            id: AddressId::new(1),
            user_id: UserId::new(1),
            full_name: "Aziza Karimova".to_string(),
            phone: "+998901234567".to_string(),
            address_line1: "12 Amir Temur St".to_string(),
            address_line2: Some("Apt 4".to_string()),
            city: "Tashkent".to_string(),
            state: None,
            postal_code: "100000".to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            is_default: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_shipping_from_address() {
        let shipping = ShippingDetails::from_address(&saved());
        assert_eq!(shipping.shipping_address, "12 Amir Temur St, Apt 4");
        assert_eq!(shipping.shipping_city, "Tashkent");
        assert!(shipping.validate().is_ok());
    }

    #[test]
    fn test_missing_shipping_fields() {
        let shipping = ShippingDetails::new("1 Main St", "", "+1");
        assert!(matches!(
            shipping.validate(),
            Err(CommerceError::MissingField("shipping_city"))
        ));

        let shipping = ShippingDetails::new("1 Main St", "Samarkand", " ");
        assert!(matches!(
            shipping.validate(),
            Err(CommerceError::MissingField("shipping_phone"))
        ));
    }

    #[test]
    fn test_one_line() {
        let line = saved().one_line();
        assert!(line.contains("Tashkent"));
        assert!(line.ends_with("Uzbekistan"));
    }

    #[test]
    fn test_draft_default_country() {
        let draft: AddressDraft = serde_json::from_str(
            r#"{"full_name":"A","phone":"1","address_line1":"x","city":"y","postal_code":"z"}"#,
        )
        .unwrap();
        assert_eq!(draft.country, DEFAULT_COUNTRY);
        assert!(draft.validate().is_ok());
    }
}
