//! Stored subscription documents

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    delivery::{DeliveryError, DeliveryWindow, parse_date},
    plans::PlanTier,
    subscriptions::{Contact, DeliveryAddress, SubscriptionError, SubscriptionOrder},
};

/// A subscription as held in the document store.
///
/// Field names, the free-form plan string and the ISO date strings match what the
/// storefront writes. Convert to [`SubscriptionOrder`] before using one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    /// Document id, when read back from the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Plan name, in any casing.
    pub subscription_type: String,

    /// Price charged for the plan.
    pub price: Decimal,

    /// Street address.
    pub address_line1: String,

    /// City.
    pub city: String,

    /// Province.
    pub province: String,

    /// Postal code.
    pub zipcode: String,

    /// Dietary notes.
    #[serde(default)]
    pub meal_preferences: String,

    /// First delivery date.
    pub start_date: String,

    /// Last delivery date.
    pub end_date: String,

    /// Recipient name.
    pub user_name: String,

    /// Recipient phone.
    pub user_phone: String,

    /// Delivery route.
    pub city_quarter: String,

    /// Owner.
    pub user_id: String,

    /// Creation time.
    pub timestamp: Timestamp,
}

impl TryFrom<SubscriptionRecord> for SubscriptionOrder {
    type Error = SubscriptionError;

    fn try_from(record: SubscriptionRecord) -> Result<Self, Self::Error> {
        let plan: PlanTier = record.subscription_type.parse()?;
        let start = parse_date(&record.start_date)?;
        let end = parse_date(&record.end_date)?;

        let window = DeliveryWindow::new(start, end).map_err(|err| match err {
            DeliveryError::InvertedWindow { start, end } => {
                SubscriptionError::InvalidWindow { start, end }
            }
            other => SubscriptionError::Delivery(other),
        })?;

        let meal_preferences = record.meal_preferences.trim();

        Ok(SubscriptionOrder {
            id: record.id.map(|id| id.parse()).transpose()?,
            plan,
            price: record.price,
            window,
            address: DeliveryAddress {
                line1: record.address_line1,
                city: record.city,
                province: record.province,
                zipcode: record.zipcode,
                city_quarter: record.city_quarter.parse()?,
            },
            contact: Contact {
                name: record.user_name,
                phone: record.user_phone,
            },
            meal_preferences: (!meal_preferences.is_empty())
                .then(|| meal_preferences.to_string()),
            user_id: record.user_id.parse()?,
            created_at: record.timestamp,
        })
    }
}

impl From<&SubscriptionOrder> for SubscriptionRecord {
    fn from(order: &SubscriptionOrder) -> Self {
        Self {
            id: order.id.as_ref().map(ToString::to_string),
            subscription_type: order.plan.to_string(),
            price: order.price,
            address_line1: order.address.line1.clone(),
            city: order.address.city.clone(),
            province: order.address.province.clone(),
            zipcode: order.address.zipcode.clone(),
            meal_preferences: order.meal_preferences.clone().unwrap_or_default(),
            start_date: order.window.start().to_string(),
            end_date: order.window.end().to_string(),
            user_name: order.contact.name.clone(),
            user_phone: order.contact.phone.clone(),
            city_quarter: order.address.city_quarter.to_string(),
            user_id: order.user_id.to_string(),
            timestamp: order.created_at,
        }
    }
}

/// Parse a list of stored subscriptions from YAML.
///
/// # Errors
///
/// Returns an error if the YAML is malformed.
pub fn records_from_yaml_str(
    yaml: &str,
) -> Result<Vec<SubscriptionRecord>, serde_norway::Error> {
    serde_norway::from_str(yaml)
}
