//! Tiffin CLI

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use jiff::Timestamp;
use tiffin::{
    cart::Cart,
    config::StorefrontConfig,
    deliveries::{deliveries_on, subscriptions_of},
    delivery::{end_date_for, parse_date},
    identifiers::{ItemId, UserId},
    menu::fixtures::{self, PricedMenu},
    plans::PlanTier,
    session::Session,
    subscriptions::{SubscriptionForm, SubscriptionOrder, record::records_from_yaml_str},
    summary::{
        write_cart_summary, write_delivery_list, write_subscription_list,
        write_subscription_summary,
    },
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tiffin", about = "Tiffin storefront CLI", long_about = None)]
struct Cli {
    /// Storefront config file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the last delivery date for a plan
    EndDate(EndDateArgs),

    /// Price a cart of menu items and print the order summary
    Checkout(CheckoutArgs),

    /// Create a subscription and print its summary
    Plan(PlanArgs),

    /// List the subscriptions delivering on a date
    Deliveries(DeliveriesArgs),

    /// List one subscriber's subscriptions
    Mine(MineArgs),
}

#[derive(Debug, Args)]
struct EndDateArgs {
    /// First day of the subscription (YYYY-MM-DD)
    #[arg(long)]
    start: String,

    /// Weekly or Monthly, any casing
    #[arg(long)]
    plan: String,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Menu fixture; defaults to the configured menu
    #[arg(long)]
    menu: Option<PathBuf>,

    /// Menu item id to add; repeat to add more than one unit
    #[arg(long = "item", required = true)]
    items: Vec<ItemId>,
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Weekly or Monthly, any casing
    #[arg(long)]
    plan: PlanTier,

    /// Subscriber user id
    #[arg(long)]
    user: String,

    /// Subscriber email
    #[arg(long, default_value = "")]
    email: String,

    #[command(flatten)]
    form: FormArgs,
}

#[derive(Debug, Args)]
struct FormArgs {
    /// Recipient name
    #[arg(long, default_value = "")]
    name: String,

    /// Recipient phone
    #[arg(long, default_value = "")]
    phone: String,

    /// Street address
    #[arg(long, default_value = "")]
    address: String,

    /// City
    #[arg(long, default_value = "")]
    city: String,

    /// Province
    #[arg(long, default_value = "")]
    province: String,

    /// Postal code
    #[arg(long, default_value = "")]
    zipcode: String,

    /// Downtown, NE, NW, SE or SW
    #[arg(long, default_value = "")]
    quarter: String,

    /// First day of the subscription (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    start: String,

    /// Dietary notes
    #[arg(long, default_value = "")]
    preferences: String,
}

impl From<FormArgs> for SubscriptionForm {
    fn from(args: FormArgs) -> Self {
        Self {
            name: args.name,
            phone: args.phone,
            address_line1: args.address,
            city: args.city,
            province: args.province,
            zipcode: args.zipcode,
            city_quarter: args.quarter,
            start_date: args.start,
            meal_preferences: args.preferences,
        }
    }
}

#[derive(Debug, Args)]
struct MineArgs {
    /// Subscription list (YAML sequence of stored subscriptions)
    #[arg(long)]
    subscriptions: PathBuf,

    /// Subscriber user id
    #[arg(long)]
    user: String,

    /// Subscriber email
    #[arg(long, default_value = "")]
    email: String,
}

#[derive(Debug, Args)]
struct DeliveriesArgs {
    /// Subscription list (YAML sequence of stored subscriptions)
    #[arg(long)]
    subscriptions: PathBuf,

    /// Delivery date (YYYY-MM-DD)
    #[arg(long)]
    date: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = cli
        .config
        .as_deref()
        .map_or_else(|| Ok(StorefrontConfig::default()), StorefrontConfig::load);

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().ok().map(|config| config.log_level.clone()))
        .unwrap_or_else(|| StorefrontConfig::default().log_level);

    if init_logging(&log_level).is_err() {
        return ExitCode::FAILURE;
    }

    let result = config
        .map_err(|error| format!("failed to load config: {error}"))
        .and_then(|config| run(cli.command, &config));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|error| error.to_string())
}

fn run(command: Commands, config: &StorefrontConfig) -> Result<(), String> {
    match command {
        Commands::EndDate(args) => end_date(&args),
        Commands::Checkout(args) => checkout(args, config),
        Commands::Plan(args) => plan(args, config),
        Commands::Deliveries(args) => deliveries(&args),
        Commands::Mine(args) => mine(args, config),
    }
}

fn end_date(args: &EndDateArgs) -> Result<(), String> {
    let end = end_date_for(&args.start, &args.plan).map_err(|error| error.to_string())?;

    writeln!(io::stdout().lock(), "{end}").map_err(|error| error.to_string())
}

fn checkout(args: CheckoutArgs, config: &StorefrontConfig) -> Result<(), String> {
    let menu_path = args
        .menu
        .or_else(|| config.menu.clone())
        .ok_or("no menu given; pass --menu or set `menu` in the config")?;

    let PricedMenu { menu, currency } = load_menu(&menu_path)?;
    let currency = match currency {
        Some(currency) => currency,
        None => config.currency().map_err(|error| error.to_string())?,
    };

    let mut cart = Cart::new();

    for id in &args.items {
        let (_, item) = menu
            .find_item(id)
            .ok_or_else(|| format!("item {id} is not on the menu"))?;

        cart = cart.add_item(item).map_err(|error| error.to_string())?;
    }

    let order = cart.checkout().map_err(|error| error.to_string())?;

    write_cart_summary(io::stdout().lock(), &order, currency).map_err(|error| error.to_string())
}

fn load_menu(path: &Path) -> Result<PricedMenu, String> {
    let priced = fixtures::load(path)
        .map_err(|error| format!("failed to load menu {}: {error}", path.display()))?;

    debug!(path = %path.display(), items = priced.menu.len(), "loaded menu");

    Ok(priced)
}

fn plan(args: PlanArgs, config: &StorefrontConfig) -> Result<(), String> {
    let user_id: UserId = args.user.parse().map_err(|error| format!("invalid user: {error}"))?;
    let session = Session::new(user_id, args.email);
    let currency = config.currency().map_err(|error| error.to_string())?;

    let order = SubscriptionOrder::create(
        &SubscriptionForm::from(args.form),
        args.plan,
        &session,
        Timestamp::now(),
    )
    .map_err(|error| error.to_string())?;

    write_subscription_summary(io::stdout().lock(), &order, currency)
        .map_err(|error| error.to_string())
}

fn load_subscriptions(path: &Path) -> Result<Vec<SubscriptionOrder>, String> {
    let contents = fs::read_to_string(path)
        .map_err(|error| format!("failed to read subscriptions {}: {error}", path.display()))?;

    let orders = records_from_yaml_str(&contents)
        .map_err(|error| format!("failed to parse subscriptions: {error}"))?
        .into_iter()
        .map(SubscriptionOrder::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| format!("invalid subscription: {error}"))?;

    debug!(total = orders.len(), "loaded subscriptions");

    Ok(orders)
}

fn deliveries(args: &DeliveriesArgs) -> Result<(), String> {
    let date = parse_date(&args.date).map_err(|error| error.to_string())?;
    let orders = load_subscriptions(&args.subscriptions)?;

    let due = deliveries_on(&orders, date);

    write_delivery_list(io::stdout().lock(), date, &due).map_err(|error| error.to_string())
}

fn mine(args: MineArgs, config: &StorefrontConfig) -> Result<(), String> {
    let user_id: UserId = args.user.parse().map_err(|error| format!("invalid user: {error}"))?;
    let session = Session::new(user_id, args.email);
    let currency = config.currency().map_err(|error| error.to_string())?;
    let orders = load_subscriptions(&args.subscriptions)?;

    let own = subscriptions_of(&orders, &session);

    write_subscription_list(io::stdout().lock(), &own, currency).map_err(|error| error.to_string())
}
