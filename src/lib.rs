//! Tiffin
//!
//! Tiffin is the pricing and scheduling core of a meal-subscription storefront: delivery
//! windows for subscription plans, cart totals with tax, menu and inventory editing, and
//! the store writes that persist them.

pub mod admins;
pub mod cart;
pub mod config;
pub mod deliveries;
pub mod delivery;
pub mod identifiers;
pub mod inventory;
pub mod menu;
pub mod plans;
pub mod prelude;
pub mod pricing;
pub mod session;
pub mod store;
pub mod subscriptions;
pub mod summary;
