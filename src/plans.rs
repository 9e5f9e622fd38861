//! Subscription plans

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when resolving a plan tier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The plan name did not match any known tier.
    #[error("unrecognized subscription plan: {0:?}")]
    Unrecognized(String),
}

/// A recurring tiffin subscription tier.
///
/// Each tier has a fixed price and a fixed number of delivery days. Every tier
/// includes one free Saturday tiffin per week, and those bonus days still count
/// toward the delivery window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PlanTier {
    /// One week of deliveries.
    Weekly,

    /// Four weeks of deliveries.
    Monthly,
}

impl PlanTier {
    /// All tiers, in display order.
    pub const ALL: [PlanTier; 2] = [PlanTier::Weekly, PlanTier::Monthly];

    /// Canonical name of the tier.
    pub fn name(self) -> &'static str {
        match self {
            PlanTier::Weekly => "Weekly",
            PlanTier::Monthly => "Monthly",
        }
    }

    /// Subscription price in major currency units.
    pub fn price(self) -> Decimal {
        match self {
            PlanTier::Weekly => Decimal::from(70),
            PlanTier::Monthly => Decimal::from(280),
        }
    }

    /// Number of non-Sunday days the delivery window spans.
    pub fn delivery_days(self) -> u32 {
        self.paid_deliveries() + self.bonus_deliveries()
    }

    /// Deliveries covered by the subscription price.
    pub fn paid_deliveries(self) -> u32 {
        match self {
            PlanTier::Weekly => 5,
            PlanTier::Monthly => 20,
        }
    }

    /// Saturday deliveries given for free.
    pub fn bonus_deliveries(self) -> u32 {
        match self {
            PlanTier::Weekly => 1,
            PlanTier::Monthly => 4,
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlanTier {
    type Err = PlanError;

    /// Parses a plan name, ignoring surrounding whitespace and letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        PlanTier::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| PlanError::Unrecognized(s.to_string()))
    }
}

impl TryFrom<String> for PlanTier {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlanTier> for String {
    fn from(value: PlanTier) -> Self {
        value.name().to_string()
    }
}
