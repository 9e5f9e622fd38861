//! Subscription checkout form

use std::fmt;

use jiff::civil::Date;
use smallvec::SmallVec;
use tracing::warn;

use crate::{
    delivery::parse_date,
    subscriptions::address::{CityQuarter, Contact, DeliveryAddress, format_phone},
};

/// A form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Recipient name.
    Name,

    /// Recipient phone.
    Phone,

    /// Street address.
    AddressLine1,

    /// City.
    City,

    /// Province.
    Province,

    /// Postal code.
    Zipcode,

    /// Delivery route.
    CityQuarter,

    /// First delivery date.
    StartDate,
}

impl Field {
    /// Field name as used by the storefront forms.
    pub fn name(self) -> &'static str {
        match self {
            Field::Name => "userName",
            Field::Phone => "userPhone",
            Field::AddressLine1 => "addressLine1",
            Field::City => "city",
            Field::Province => "province",
            Field::Zipcode => "zipcode",
            Field::CityQuarter => "cityQuarter",
            Field::StartDate => "startDate",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Phone => "Phone number",
            Field::AddressLine1 => "Address Line 1",
            Field::City => "City",
            Field::Province => "Province",
            Field::Zipcode => "Zipcode",
            Field::CityQuarter => "City Quarter",
            Field::StartDate => "Start Date",
        }
    }
}

/// One failed field and the message shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The field that failed.
    pub field: Field,

    /// Message for the user.
    pub message: String,
}

/// Every failed field from one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(SmallVec<[FieldError; 8]>);

impl FieldErrors {
    fn required(&mut self, field: Field) {
        self.push(field, format!("{} is required", field.label()));
    }

    fn push(&mut self, field: Field, message: String) {
        self.0.push(FieldError { field, message });
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// Iterate over the failures in form order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }

            write!(f, "{}: {}", error.field.name(), error.message)?;
        }

        Ok(())
    }
}

/// Raw checkout form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionForm {
    /// Recipient name.
    pub name: String,

    /// Recipient phone, in any common format.
    pub phone: String,

    /// Street address.
    pub address_line1: String,

    /// City.
    pub city: String,

    /// Province.
    pub province: String,

    /// Postal code.
    pub zipcode: String,

    /// One of `Downtown`, `NE`, `NW`, `SE`, `SW`.
    pub city_quarter: String,

    /// First delivery date (`YYYY-MM-DD`).
    pub start_date: String,

    /// Optional dietary notes.
    pub meal_preferences: String,
}

/// Checked checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidForm {
    /// Recipient.
    pub contact: Contact,

    /// Delivery address.
    pub address: DeliveryAddress,

    /// First delivery date.
    pub start_date: Date,

    /// Dietary notes, if any were given.
    pub meal_preferences: Option<String>,
}

impl SubscriptionForm {
    /// Validate every field, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns the failed fields, in form order, if any field is missing or malformed.
    pub fn validate(&self) -> Result<ValidForm, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = required(&mut errors, Field::Name, &self.name);
        let phone = required(&mut errors, Field::Phone, &self.phone)
            .and_then(|raw| check_phone(&mut errors, raw));
        let line1 = required(&mut errors, Field::AddressLine1, &self.address_line1);
        let city = required(&mut errors, Field::City, &self.city);
        let province = required(&mut errors, Field::Province, &self.province);
        let zipcode = required(&mut errors, Field::Zipcode, &self.zipcode);
        let city_quarter = required(&mut errors, Field::CityQuarter, &self.city_quarter)
            .and_then(|raw| match raw.parse::<CityQuarter>() {
                Ok(quarter) => Some(quarter),
                Err(err) => {
                    errors.push(Field::CityQuarter, err.to_string());
                    None
                }
            });
        let start_date = required(&mut errors, Field::StartDate, &self.start_date).and_then(
            |raw| match parse_date(raw) {
                Ok(date) => Some(date),
                Err(err) => {
                    errors.push(Field::StartDate, err.to_string());
                    None
                }
            },
        );

        let (
            Some(name),
            Some(phone),
            Some(line1),
            Some(city),
            Some(province),
            Some(zipcode),
            Some(city_quarter),
            Some(start_date),
        ) = (
            name,
            phone,
            line1,
            city,
            province,
            zipcode,
            city_quarter,
            start_date,
        )
        else {
            warn!(%errors, "rejected subscription form");

            return Err(errors);
        };

        let meal_preferences = self.meal_preferences.trim();

        Ok(ValidForm {
            contact: Contact {
                name: name.to_string(),
                phone,
            },
            address: DeliveryAddress {
                line1: line1.to_string(),
                city: city.to_string(),
                province: province.to_string(),
                zipcode: zipcode.to_string(),
                city_quarter,
            },
            start_date,
            meal_preferences: (!meal_preferences.is_empty()).then(|| meal_preferences.to_string()),
        })
    }
}

/// Normalise a phone number entered on its own, e.g. when editing a subscription.
///
/// # Errors
///
/// Returns the phone field error if the number is empty or does not have ten digits.
pub fn validate_phone(raw: &str) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::default();

    required(&mut errors, Field::Phone, raw)
        .and_then(|raw| check_phone(&mut errors, raw))
        .ok_or(errors)
}

/// Check a replacement delivery address, trimming each field.
///
/// # Errors
///
/// Returns every address field that is empty or whitespace.
pub fn validate_address(address: &DeliveryAddress) -> Result<DeliveryAddress, FieldErrors> {
    let mut errors = FieldErrors::default();

    let line1 = required(&mut errors, Field::AddressLine1, &address.line1);
    let city = required(&mut errors, Field::City, &address.city);
    let province = required(&mut errors, Field::Province, &address.province);
    let zipcode = required(&mut errors, Field::Zipcode, &address.zipcode);

    let (Some(line1), Some(city), Some(province), Some(zipcode)) = (line1, city, province, zipcode)
    else {
        warn!(%errors, "rejected delivery address");

        return Err(errors);
    };

    Ok(DeliveryAddress {
        line1: line1.to_string(),
        city: city.to_string(),
        province: province.to_string(),
        zipcode: zipcode.to_string(),
        city_quarter: address.city_quarter,
    })
}

fn check_phone(errors: &mut FieldErrors, raw: &str) -> Option<String> {
    let phone = format_phone(raw);

    if phone.is_none() {
        errors.push(Field::Phone, "Phone number must have 10 digits".to_string());
    }

    phone
}

fn required<'a>(errors: &mut FieldErrors, field: Field, value: &'a str) -> Option<&'a str> {
    let value = value.trim();

    if value.is_empty() {
        errors.required(field);
        return None;
    }

    Some(value)
}
