//! Tiffin prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    admins::{AdminError, AdminRecord, find_admin, register},
    cart::{Cart, CartError, CartLine, CartLineRecord, CartOrder},
    config::{ConfigError, StorefrontConfig},
    deliveries::{deliveries_on, subscriptions_of},
    delivery::{DeliveryError, DeliveryWindow, compute_end_date, end_date_for},
    identifiers::{CategoryId, IdentifierError, ItemId, SubscriptionId, UserId},
    inventory::{
        Inventory, InventoryCategory, InventoryEdit, InventoryError, InventoryItem,
        parse_stock_quantity,
    },
    menu::{ItemEdit, ItemUpdatePlan, Menu, MenuCategory, MenuError, MenuItem},
    plans::{PlanError, PlanTier},
    pricing::{PricingError, Totals},
    session::Session,
    store::{DocumentPath, StoreWrite, WritePlan},
    subscriptions::{
        CityQuarter, SubscriptionError, SubscriptionForm, SubscriptionOrder, SubscriptionRecord,
        SubscriptionUpdate, validate_address,
    },
    summary::{
        SummaryError, write_cart_summary, write_subscription_list, write_subscription_summary,
    },
};
