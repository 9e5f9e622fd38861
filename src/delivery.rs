//! Delivery windows
//!
//! A subscription delivers on every day except Sunday. The window for a plan starts
//! the day after the chosen start date and ends on the day the plan's delivery-day
//! count is reached.

use jiff::{
    ToSpan,
    civil::{Date, Weekday},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::plans::{PlanError, PlanTier};

/// Errors raised while computing or validating delivery windows.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The plan tier was not recognized.
    #[error(transparent)]
    InvalidPlan(#[from] PlanError),

    /// The date string was not a valid ISO-8601 calendar date.
    #[error("invalid date {input:?}: {source}")]
    InvalidDate {
        /// The rejected input.
        input: String,

        /// The underlying parse error.
        source: jiff::Error,
    },

    /// The window would run past the last supported calendar date.
    #[error("delivery window starting {0} runs past the supported date range")]
    DateOutOfRange(Date),

    /// The end of a window was before its start.
    #[error("delivery window ends on {end}, before it starts on {start}")]
    InvertedWindow {
        /// Requested start date.
        start: Date,

        /// Requested end date.
        end: Date,
    },
}

/// Returns true if deliveries happen on `date`.
pub fn is_delivery_day(date: Date) -> bool {
    date.weekday() != Weekday::Sunday
}

/// Compute the last delivery date for a plan starting on `start`.
///
/// The start date itself is never counted. Each following day that is not a Sunday
/// counts as one delivery day (Saturdays included), and the date on which the plan's
/// delivery-day count is reached is returned.
///
/// # Errors
///
/// Returns [`DeliveryError::DateOutOfRange`] if the window would pass the maximum
/// representable date.
pub fn compute_end_date(start: Date, plan: PlanTier) -> Result<Date, DeliveryError> {
    let days = usize::try_from(plan.delivery_days())
        .map_err(|_err| DeliveryError::DateOutOfRange(start))?;

    let end = start
        .series(1.day())
        .skip(1)
        .filter(|date| is_delivery_day(*date))
        .nth(days.saturating_sub(1))
        .ok_or(DeliveryError::DateOutOfRange(start))?;

    debug!(%start, %end, %plan, "computed delivery window");

    Ok(end)
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns [`DeliveryError::InvalidDate`] if the input is not a valid date.
pub fn parse_date(input: &str) -> Result<Date, DeliveryError> {
    input
        .trim()
        .parse::<Date>()
        .map_err(|source| DeliveryError::InvalidDate {
            input: input.to_string(),
            source,
        })
}

/// Compute the end date from loosely typed boundary input.
///
/// Both the date and the plan name are validated before the window is computed; the
/// plan name is matched case-insensitively and the result is an ISO-8601 date.
///
/// # Errors
///
/// - [`DeliveryError::InvalidDate`]: `start` is not an ISO-8601 date.
/// - [`DeliveryError::InvalidPlan`]: `plan` is not a known tier.
/// - [`DeliveryError::DateOutOfRange`]: the window overflows the calendar.
pub fn end_date_for(start: &str, plan: &str) -> Result<String, DeliveryError> {
    let start = parse_date(start)?;
    let plan = plan.parse::<PlanTier>()?;

    Ok(compute_end_date(start, plan)?.to_string())
}

/// An inclusive range of dates during which a subscription receives deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryWindow {
    start: Date,
    end: Date,
}

impl DeliveryWindow {
    /// Create a window from explicit dates.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::InvertedWindow`] if `end` is before `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, DeliveryError> {
        if end < start {
            return Err(DeliveryError::InvertedWindow { start, end });
        }

        Ok(Self { start, end })
    }

    /// Create the window for `plan` starting on `start`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::DateOutOfRange`] if the end date overflows.
    pub fn for_plan(start: Date, plan: PlanTier) -> Result<Self, DeliveryError> {
        Ok(Self {
            start,
            end: compute_end_date(start, plan)?,
        })
    }

    /// First day of the window.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Last day of the window.
    pub fn end(&self) -> Date {
        self.end
    }

    /// Returns true if `date` falls within the window, inclusive of both ends.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}
