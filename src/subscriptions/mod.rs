//! Subscriptions
//!
//! A subscription is created once at checkout from a validated form. Afterwards only
//! its owner may edit or cancel it. Every change is returned as a new value together
//! with the store write that persists it.

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    delivery::{DeliveryError, DeliveryWindow},
    identifiers::{IdentifierError, SubscriptionId, UserId},
    plans::{PlanError, PlanTier},
    pricing::{PricingError, Totals},
    session::Session,
    store::{DocumentPath, StoreWrite},
};

pub mod address;
pub mod form;
pub mod record;

pub use address::{CityQuarter, Contact, DeliveryAddress, UnknownCityQuarter, format_phone};
pub use form::{
    Field, FieldError, FieldErrors, SubscriptionForm, ValidForm, validate_address, validate_phone,
};
pub use record::SubscriptionRecord;

/// Errors raised by subscription operations.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// One or more form fields failed validation.
    #[error("invalid subscription details: {0}")]
    Validation(FieldErrors),

    /// The session user does not own the subscription.
    #[error("user {user} does not own this subscription")]
    NotOwner {
        /// The user who attempted the change.
        user: UserId,
    },

    /// The end date is before the start date.
    #[error("end date {end} is before start date {start}")]
    InvalidWindow {
        /// Requested start date.
        start: Date,

        /// Requested end date.
        end: Date,
    },

    /// The subscription has not been stored yet, so it has no document id.
    #[error("subscription has not been saved")]
    Unsaved,

    /// The stored plan name is not recognised.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// A stored date is invalid or the window overflows.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// The stored city quarter is not recognised.
    #[error(transparent)]
    CityQuarter(#[from] UnknownCityQuarter),

    /// A stored identifier is not a valid store key.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
}

impl From<FieldErrors> for SubscriptionError {
    fn from(errors: FieldErrors) -> Self {
        SubscriptionError::Validation(errors)
    }
}

/// Changes a subscriber may make to an existing subscription.
///
/// Fields left as `None` are kept. The end date is never recomputed: it only changes
/// when `end_date` is given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionUpdate {
    /// New first delivery date.
    pub start_date: Option<Date>,

    /// New last delivery date.
    pub end_date: Option<Date>,

    /// New delivery address. Its text fields are trimmed and must not be empty.
    pub address: Option<DeliveryAddress>,

    /// New phone number, in any common format.
    pub phone: Option<String>,

    /// New dietary notes. An empty string clears them.
    pub meal_preferences: Option<String>,
}

/// A tiffin subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionOrder {
    id: Option<SubscriptionId>,
    plan: PlanTier,
    price: Decimal,
    window: DeliveryWindow,
    address: DeliveryAddress,
    contact: Contact,
    meal_preferences: Option<String>,
    user_id: UserId,
    created_at: Timestamp,
}

impl SubscriptionOrder {
    /// Create a subscription from a checkout form.
    ///
    /// The price comes from the plan and the end date is derived from the start date.
    ///
    /// # Errors
    ///
    /// - [`SubscriptionError::Validation`]: the form has missing or malformed fields.
    /// - [`SubscriptionError::Delivery`]: the delivery window overflows the calendar.
    pub fn create(
        form: &SubscriptionForm,
        plan: PlanTier,
        session: &Session,
        now: Timestamp,
    ) -> Result<Self, SubscriptionError> {
        let ValidForm {
            contact,
            address,
            start_date,
            meal_preferences,
        } = form.validate()?;

        let window = DeliveryWindow::for_plan(start_date, plan)?;

        debug!(
            user = %session.user_id,
            %plan,
            start = %window.start(),
            end = %window.end(),
            "created subscription"
        );

        Ok(Self {
            id: None,
            plan,
            price: plan.price(),
            window,
            address,
            contact,
            meal_preferences,
            user_id: session.user_id.clone(),
            created_at: now,
        })
    }

    /// Attach the document id assigned by the store.
    #[must_use]
    pub fn with_id(self, id: SubscriptionId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    /// Apply a subscriber's changes, returning the updated subscription.
    ///
    /// # Errors
    ///
    /// - [`SubscriptionError::NotOwner`]: the session user is not the owner.
    /// - [`SubscriptionError::InvalidWindow`]: the resulting end date is before the
    ///   start date.
    /// - [`SubscriptionError::Validation`]: the new phone number is malformed or the new
    ///   address has an empty field.
    pub fn update(
        &self,
        session: &Session,
        update: SubscriptionUpdate,
    ) -> Result<Self, SubscriptionError> {
        self.ensure_owner(session)?;

        let start = update.start_date.unwrap_or(self.window.start());
        let end = update.end_date.unwrap_or(self.window.end());

        let window = DeliveryWindow::new(start, end).map_err(|err| match err {
            DeliveryError::InvertedWindow { start, end } => {
                SubscriptionError::InvalidWindow { start, end }
            }
            other => SubscriptionError::Delivery(other),
        })?;

        let address = match update.address {
            Some(address) => validate_address(&address)?,
            None => self.address.clone(),
        };

        let contact = match update.phone {
            Some(raw) => Contact {
                phone: validate_phone(&raw)?,
                ..self.contact.clone()
            },
            None => self.contact.clone(),
        };

        let meal_preferences = match update.meal_preferences {
            Some(notes) if notes.trim().is_empty() => None,
            Some(notes) => Some(notes.trim().to_string()),
            None => self.meal_preferences.clone(),
        };

        debug!(user = %session.user_id, start = %start, end = %end, "updated subscription");

        Ok(Self {
            window,
            address,
            contact,
            meal_preferences,
            ..self.clone()
        })
    }

    /// Check that the session user may cancel this subscription.
    ///
    /// Returns the write that deletes it.
    ///
    /// # Errors
    ///
    /// - [`SubscriptionError::NotOwner`]: the session user is not the owner.
    /// - [`SubscriptionError::Unsaved`]: the subscription has no document id.
    pub fn ensure_can_cancel(
        &self,
        session: &Session,
    ) -> Result<StoreWrite<SubscriptionRecord>, SubscriptionError> {
        self.ensure_owner(session)?;

        Ok(StoreWrite::Delete {
            path: self.document_path()?,
        })
    }

    /// The write that stores this subscription's current state.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionError::Unsaved`] if the subscription has no document id.
    pub fn store_write(&self) -> Result<StoreWrite<SubscriptionRecord>, SubscriptionError> {
        Ok(StoreWrite::Update {
            path: self.document_path()?,
            document: SubscriptionRecord::from(self),
        })
    }

    fn document_path(&self) -> Result<DocumentPath, SubscriptionError> {
        self.id
            .as_ref()
            .map(DocumentPath::subscription)
            .ok_or(SubscriptionError::Unsaved)
    }

    fn ensure_owner(&self, session: &Session) -> Result<(), SubscriptionError> {
        if session.is_user(&self.user_id) {
            return Ok(());
        }

        warn!(user = %session.user_id, owner = %self.user_id, "rejected change by non-owner");

        Err(SubscriptionError::NotOwner {
            user: session.user_id.clone(),
        })
    }

    /// Plan price plus tax. Bonus deliveries and shipping are free.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if a stored price is too large to tax.
    pub fn totals(&self) -> Result<Totals, PricingError> {
        Totals::from_subtotal(self.price)
    }

    /// Store document id, once saved.
    pub fn id(&self) -> Option<&SubscriptionId> {
        self.id.as_ref()
    }

    /// Subscribed plan.
    pub fn plan(&self) -> PlanTier {
        self.plan
    }

    /// Price charged for the plan, before tax.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Delivery window.
    pub fn window(&self) -> DeliveryWindow {
        self.window
    }

    /// Delivery address.
    pub fn address(&self) -> &DeliveryAddress {
        &self.address
    }

    /// Recipient.
    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    /// Dietary notes.
    pub fn meal_preferences(&self) -> Option<&str> {
        self.meal_preferences.as_deref()
    }

    /// Owner of the subscription.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// When the subscription was created.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    fn session(user: &str) -> TestResult<Session> {
        Ok(Session::new(user.parse()?, format!("{user}@example.com")))
    }

    fn form() -> SubscriptionForm {
        SubscriptionForm {
            name: "Asha Patel".to_string(),
            phone: "403 555 1234".to_string(),
            address_line1: "12 Elbow Dr".to_string(),
            city: "Calgary".to_string(),
            province: "AB".to_string(),
            zipcode: "T2S 1A1".to_string(),
            city_quarter: "SW".to_string(),
            start_date: "2024-06-01".to_string(),
            meal_preferences: "No onion".to_string(),
        }
    }

    fn order() -> TestResult<SubscriptionOrder> {
        let created = SubscriptionOrder::create(
            &form(),
            PlanTier::Weekly,
            &session("owner")?,
            "2024-05-30T14:00:00Z".parse()?,
        )?;

        Ok(created.with_id("sub1".parse()?))
    }

    #[test]
    fn create_derives_price_and_end_date() -> TestResult {
        let order = order()?;

        assert_eq!(order.price(), Decimal::from(70));
        assert_eq!(order.window().end(), date(2024, 6, 8));
        assert_eq!(order.user_id().as_str(), "owner");
        assert_eq!(order.contact().phone, "403-555-1234");
        assert_eq!(order.meal_preferences(), Some("No onion"));

        Ok(())
    }

    #[test]
    fn create_rejects_incomplete_form() -> TestResult {
        let incomplete = SubscriptionForm {
            zipcode: String::new(),
            ..form()
        };

        let result = SubscriptionOrder::create(
            &incomplete,
            PlanTier::Monthly,
            &session("owner")?,
            Timestamp::UNIX_EPOCH,
        );

        assert!(
            matches!(result, Err(SubscriptionError::Validation(ref errors)) if errors.get(Field::Zipcode).is_some()),
            "expected a zipcode error, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn totals_add_tax_to_the_plan_price() -> TestResult {
        let totals = order()?.totals()?;

        assert_eq!(totals.tax(), Decimal::new(350, 2));
        assert_eq!(totals.total(), Decimal::new(7350, 2));

        Ok(())
    }

    #[test]
    fn start_date_change_keeps_end_date() -> TestResult {
        let order = order()?;

        let updated = order.update(
            &session("owner")?,
            SubscriptionUpdate {
                start_date: Some(date(2024, 6, 3)),
                ..SubscriptionUpdate::default()
            },
        )?;

        assert_eq!(updated.window().start(), date(2024, 6, 3));
        assert_eq!(updated.window().end(), date(2024, 6, 8));

        Ok(())
    }

    #[test]
    fn inverted_window_is_rejected() -> TestResult {
        let order = order()?;

        let result = order.update(
            &session("owner")?,
            SubscriptionUpdate {
                end_date: Some(date(2024, 5, 31)),
                ..SubscriptionUpdate::default()
            },
        );

        assert!(
            matches!(
                result,
                Err(SubscriptionError::InvalidWindow { start, end })
                    if start == date(2024, 6, 1) && end == date(2024, 5, 31)
            ),
            "expected InvalidWindow, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn update_normalises_phone_and_clears_notes() -> TestResult {
        let order = order()?;

        let updated = order.update(
            &session("owner")?,
            SubscriptionUpdate {
                phone: Some("(587) 555-0000".to_string()),
                meal_preferences: Some(String::new()),
                ..SubscriptionUpdate::default()
            },
        )?;

        assert_eq!(updated.contact().phone, "587-555-0000");
        assert_eq!(updated.meal_preferences(), None);

        Ok(())
    }

    #[test]
    fn update_rejects_malformed_phone() -> TestResult {
        let result = order()?.update(
            &session("owner")?,
            SubscriptionUpdate {
                phone: Some("12".to_string()),
                ..SubscriptionUpdate::default()
            },
        );

        assert!(
            matches!(result, Err(SubscriptionError::Validation(_))),
            "expected Validation, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn update_rejects_blank_address() -> TestResult {
        let order = order()?;
        let blank = DeliveryAddress {
            line1: "  ".to_string(),
            city: String::new(),
            province: String::new(),
            zipcode: String::new(),
            city_quarter: CityQuarter::NorthEast,
        };

        let result = order.update(
            &session("owner")?,
            SubscriptionUpdate {
                address: Some(blank),
                ..SubscriptionUpdate::default()
            },
        );

        let Err(SubscriptionError::Validation(errors)) = result else {
            return Err(format!("expected Validation, got {result:?}").into());
        };

        assert!(errors.get(Field::AddressLine1).is_some(), "{errors}");
        assert!(errors.get(Field::City).is_some(), "{errors}");
        assert!(errors.get(Field::Province).is_some(), "{errors}");
        assert!(errors.get(Field::Zipcode).is_some(), "{errors}");

        Ok(())
    }

    #[test]
    fn update_trims_a_new_address() -> TestResult {
        let moved = order()?.update(
            &session("owner")?,
            SubscriptionUpdate {
                address: Some(DeliveryAddress {
                    line1: " 88 Falconridge Blvd NE ".to_string(),
                    city: "Calgary".to_string(),
                    province: "AB".to_string(),
                    zipcode: "T3J 1A1".to_string(),
                    city_quarter: CityQuarter::NorthEast,
                }),
                ..SubscriptionUpdate::default()
            },
        )?;

        assert_eq!(moved.address().line1, "88 Falconridge Blvd NE");
        assert_eq!(moved.address().city_quarter, CityQuarter::NorthEast);

        Ok(())
    }

    #[test]
    fn only_the_owner_may_edit_or_cancel() -> TestResult {
        let order = order()?;
        let intruder = session("someone-else")?;

        let edit = order.update(&intruder, SubscriptionUpdate::default());
        let cancel = order.ensure_can_cancel(&intruder);

        let intruder_id: UserId = "someone-else".parse()?;

        assert!(
            matches!(edit, Err(SubscriptionError::NotOwner { ref user }) if user == &intruder_id),
            "expected NotOwner, got {edit:?}"
        );
        assert!(
            matches!(cancel, Err(SubscriptionError::NotOwner { ref user }) if user == &intruder_id),
            "expected NotOwner, got {cancel:?}"
        );

        Ok(())
    }

    #[test]
    fn cancel_deletes_the_document() -> TestResult {
        let write = order()?.ensure_can_cancel(&session("owner")?)?;

        assert!(
            matches!(write, StoreWrite::Delete { ref path } if path.to_string() == "subscriptions/sub1"),
            "expected a delete of subscriptions/sub1, got {write:?}"
        );

        Ok(())
    }

    #[test]
    fn unsaved_subscription_has_no_store_path() -> TestResult {
        let unsaved = SubscriptionOrder::create(
            &form(),
            PlanTier::Weekly,
            &session("owner")?,
            Timestamp::UNIX_EPOCH,
        )?;

        let result = unsaved.store_write();

        assert!(
            matches!(result, Err(SubscriptionError::Unsaved)),
            "expected Unsaved, got {result:?}"
        );

        Ok(())
    }
}
