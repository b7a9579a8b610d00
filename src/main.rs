use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use marketplace_client::flows::cart::CartEngine;
use marketplace_client::flows::catalog::CatalogBrowser;
use marketplace_client::flows::checkout::{CheckoutFlow, FlowState};
use marketplace_client::flows::listings::ListingManager;
use marketplace_client::flows::purchases::{PurchaseHistory, status_label};
use marketplace_client::forms::ShippingAddressForm;
use marketplace_client::models::{PaymentMethod, Product, format_usd};
use marketplace_client::dto::products::{CategoryFilter, ProductQuery};
use marketplace_client::prompt::{FixedAnswer, StdinPrompt};
use marketplace_client::{ClientConfig, HttpGateway, MarketGateway, Session};

#[derive(Parser)]
#[command(name = "marketplace", about = "Marketplace API client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Browse and search the product catalog
    Products {
        #[command(subcommand)]
        command: ProductsCommand,
    },
    /// Show or mutate the shopping cart
    Cart {
        #[command(subcommand)]
        command: Option<CartCommand>,
    },
    /// Check out the current cart
    Checkout {
        #[command(flatten)]
        shipping: ShippingArgs,
        /// Cash, Card, PayPal or Other
        #[arg(long, default_value = "Cash")]
        payment: String,
    },
    /// Buy a single product directly, bypassing the cart
    Buy {
        id: Uuid,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[command(flatten)]
        shipping: ShippingArgs,
        #[arg(long, default_value = "Cash")]
        payment: String,
    },
    /// Manage your own listings
    Listings {
        #[command(subcommand)]
        command: Option<ListingsCommand>,
    },
    /// Show your purchase history
    Purchases,
}

#[derive(Subcommand)]
enum ProductsCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "All")]
        category: String,
    },
    Show {
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    Show,
    Add {
        id: Uuid,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    Set {
        id: Uuid,
        #[arg(long)]
        quantity: u32,
    },
    Remove {
        id: Uuid,
    },
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ListingsCommand {
    List,
    Delete {
        id: Uuid,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct ShippingArgs {
    #[arg(long)]
    street: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    zip: String,
    #[arg(long)]
    country: String,
}

impl ShippingArgs {
    fn into_form(self) -> ShippingAddressForm {
        ShippingAddressForm {
            street: self.street,
            city: self.city,
            state: self.state,
            zip_code: self.zip,
            country: self.country,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,marketplace_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    let gateway = Arc::new(HttpGateway::new(&config));

    match cli.command {
        Command::Products { command } => run_products(gateway, command).await,
        Command::Cart { command } => {
            run_cart(gateway, command.unwrap_or(CartCommand::Show)).await
        }
        Command::Checkout { shipping, payment } => {
            run_checkout(gateway, shipping, &payment).await
        }
        Command::Buy {
            id,
            quantity,
            shipping,
            payment,
        } => run_buy(gateway, id, quantity, shipping, &payment).await,
        Command::Listings { command } => {
            run_listings(gateway, command.unwrap_or(ListingsCommand::List)).await
        }
        Command::Purchases => run_purchases(gateway).await,
    }
}

async fn run_products(gateway: Arc<HttpGateway>, command: ProductsCommand) -> anyhow::Result<()> {
    match command {
        ProductsCommand::List { search, category } => {
            let mut browser = CatalogBrowser::new(gateway);
            let query = ProductQuery {
                search,
                category: CategoryFilter::parse(&category).unwrap_or_default(),
            };
            browser.apply(query).await;
            if browser.products().is_empty() {
                println!("No products found.");
            }
            for product in browser.products() {
                print_product_line(product);
            }
        }
        ProductsCommand::Show { id } => match gateway.get_product(id).await {
            Ok(product) => print_product_detail(&product),
            Err(err) => println!("{}", err.user_message("Failed to load product")),
        },
    }
    Ok(())
}

async fn run_cart(gateway: Arc<HttpGateway>, command: CartCommand) -> anyhow::Result<()> {
    let mut engine = CartEngine::new(gateway);
    engine.refresh().await;

    match command {
        CartCommand::Show => {}
        CartCommand::Add { id, quantity } => engine.add(id, quantity).await,
        CartCommand::Set { id, quantity } => engine.set_quantity(id, quantity).await,
        CartCommand::Remove { id } => engine.remove(id).await,
        CartCommand::Clear { yes } => {
            if yes {
                engine.clear(&FixedAnswer(true)).await;
            } else {
                engine.clear(&StdinPrompt).await;
            }
        }
    }

    if let Some(message) = engine.take_message() {
        println!("{message}");
    }
    match engine.cart() {
        Some(cart) if !cart.is_empty() => {
            println!("Cart ({} items):", cart.items.len());
            for item in &cart.items {
                println!(
                    "  {}  {} x{}  {}",
                    item.product.id,
                    item.product.title,
                    item.quantity,
                    format_usd(item.subtotal()),
                );
            }
            println!("Total: {}", engine.total_display());
        }
        _ => println!("Your cart is empty."),
    }
    Ok(())
}

async fn run_checkout(
    gateway: Arc<HttpGateway>,
    shipping: ShippingArgs,
    payment: &str,
) -> anyhow::Result<()> {
    let mut engine = CartEngine::new(Arc::clone(&gateway));
    engine.refresh().await;
    let total = engine.total_amount();

    let mut flow = CheckoutFlow::for_cart(Arc::clone(&gateway), total);
    let session = current_session(&gateway).await;
    flow.open(&session);
    flow.form.shipping = shipping.into_form();
    flow.form.payment_method = parse_payment(payment)?;
    flow.submit().await;
    finish_order_flow(gateway, flow).await
}

async fn run_buy(
    gateway: Arc<HttpGateway>,
    id: Uuid,
    quantity: u32,
    shipping: ShippingArgs,
    payment: &str,
) -> anyhow::Result<()> {
    let product = match gateway.get_product(id).await {
        Ok(product) => product,
        Err(err) => {
            println!("{}", err.user_message("Failed to load product"));
            return Ok(());
        }
    };

    let mut flow = CheckoutFlow::buy_now(Arc::clone(&gateway), product, quantity);
    let session = current_session(&gateway).await;
    flow.open(&session);
    if flow.state() != FlowState::FormOpen {
        if let Some(message) = flow.take_message() {
            println!("{message}");
        }
        return Ok(());
    }
    println!("Order total: {}", flow.order_total_display());
    flow.form.shipping = shipping.into_form();
    flow.form.payment_method = parse_payment(payment)?;
    flow.submit().await;
    finish_order_flow(gateway, flow).await
}

/// Print the outcome and, on success, follow the scheduled redirect to
/// the purchase history view.
async fn finish_order_flow(
    gateway: Arc<HttpGateway>,
    mut flow: CheckoutFlow<HttpGateway>,
) -> anyhow::Result<()> {
    if let Some(message) = flow.take_message() {
        println!("{message}");
    }
    if let Some(redirect) = flow.redirect() {
        tokio::time::sleep(redirect.delay).await;
        run_purchases(gateway).await?;
    }
    Ok(())
}

async fn run_listings(gateway: Arc<HttpGateway>, command: ListingsCommand) -> anyhow::Result<()> {
    let mut manager = ListingManager::new(gateway);
    manager.load().await;

    if let ListingsCommand::Delete { id, yes } = command {
        if yes {
            manager.delete(id, &FixedAnswer(true)).await;
        } else {
            manager.delete(id, &StdinPrompt).await;
        }
    }

    if let Some(message) = manager.take_message() {
        println!("{message}");
    }
    if manager.products().is_empty() {
        println!("You have no listings.");
    }
    for product in manager.products() {
        print_product_line(product);
    }
    Ok(())
}

async fn run_purchases(gateway: Arc<HttpGateway>) -> anyhow::Result<()> {
    let mut history = PurchaseHistory::new(gateway);
    history.load().await;
    if history.purchases().is_empty() {
        println!("No purchases yet.");
    }
    for purchase in history.purchases() {
        println!(
            "{}  {} x{}  {}  [{}]",
            purchase.purchase_date.format("%Y-%m-%d %H:%M"),
            purchase.product.title,
            purchase.quantity,
            format_usd(purchase.total_amount),
            status_label(purchase.status),
        );
    }
    Ok(())
}

async fn current_session(gateway: &HttpGateway) -> Session {
    let mut session = Session::default();
    if let Ok(user) = gateway.current_user().await {
        session.authenticate(user);
    }
    session
}

fn parse_payment(value: &str) -> anyhow::Result<PaymentMethod> {
    PaymentMethod::parse(value)
        .ok_or_else(|| anyhow::anyhow!("unknown payment method: {value} (Cash/Card/PayPal/Other)"))
}

fn print_product_line(product: &Product) {
    println!(
        "{}  {}  {}  ({}, {})",
        product.id,
        product.title,
        format_usd(product.price),
        product.category.as_str(),
        product.condition.as_str(),
    );
}

fn print_product_detail(product: &Product) {
    print_product_line(product);
    println!("  seller: {}", product.seller.username);
    println!("  location: {}", product.location);
    println!("  available: {} (qty {})", product.is_available, product.quantity);
    if !product.description.is_empty() {
        println!("  {}", product.description);
    }
}
