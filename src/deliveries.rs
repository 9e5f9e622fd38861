//! Delivery list and subscriber views

use jiff::civil::Date;
use tracing::debug;

use crate::{session::Session, subscriptions::SubscriptionOrder};

/// Subscriptions that receive a tiffin on `date`, grouped by city quarter.
///
/// A subscription is included when `date` falls within its window, inclusive of
/// both ends. Within a quarter the input order is kept.
pub fn deliveries_on<'a>(
    orders: impl IntoIterator<Item = &'a SubscriptionOrder>,
    date: Date,
) -> Vec<&'a SubscriptionOrder> {
    let mut due: Vec<_> = orders
        .into_iter()
        .filter(|order| order.window().contains(date))
        .collect();

    due.sort_by_key(|order| order.address().city_quarter);

    debug!(%date, count = due.len(), "collected deliveries");

    due
}

/// The signed-in user's own subscriptions, in input order.
pub fn subscriptions_of<'a>(
    orders: impl IntoIterator<Item = &'a SubscriptionOrder>,
    session: &Session,
) -> Vec<&'a SubscriptionOrder> {
    let mine: Vec<_> = orders
        .into_iter()
        .filter(|order| session.is_user(order.user_id()))
        .collect();

    debug!(user = %session.user_id, count = mine.len(), "collected subscriptions");

    mine
}
