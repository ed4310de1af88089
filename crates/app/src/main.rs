//! Folio walkthrough binary.
//!
//! Seeds an in-memory store with a small catalog and drives a cart through
//! checkout and the full delivery lifecycle, logging each step. Useful for
//! demoing the engine and for eyeballing notification output.

use std::{process, sync::Arc};

use jiff::Timestamp;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use folio_app::{
    config::AppConfig,
    domain::{
        carts::{CartsService, MemCartsService},
        catalog::{
            CatalogService, MemCatalogService,
            models::{BookStatus, BookUuid, NewBook, NewDiscount},
        },
        notifications::LogNotificationGateway,
        orders::{
            MemOrdersService, OrdersService,
            models::{NewOrder, NewShippingAddress, OrderStatus, OrderUuid},
        },
    },
    store::Db,
};

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(error) = run(&config).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db = Db::new();

    let catalog = MemCatalogService::new(db.clone());
    let carts = MemCartsService::new(db.clone());
    let orders = MemOrdersService::new(db, Arc::new(LogNotificationGateway::new(config)));

    let now = Timestamp::now();
    let buyer = Uuid::now_v7();

    let dune = catalog
        .create_book(
            NewBook {
                uuid: BookUuid::new(),
                title: "Dune".to_string(),
                slug: None,
                isbn: "9780441172719".to_string(),
                price: "12.00".parse()?,
                stock_quantity: 40,
                status: BookStatus::Published,
                category: None,
                authors: Vec::new(),
            },
            now,
        )
        .await?;

    let emma = catalog
        .create_book(
            NewBook {
                uuid: BookUuid::new(),
                title: "Emma".to_string(),
                slug: None,
                isbn: "9780141439587".to_string(),
                price: "5.00".parse()?,
                stock_quantity: 25,
                status: BookStatus::Published,
                category: None,
                authors: Vec::new(),
            },
            now,
        )
        .await?;

    catalog
        .attach_discount(
            dune.uuid,
            NewDiscount {
                min_quantity: 2,
                percentage: "10".parse()?,
                starts_at: now - jiff::SignedDuration::from_hours(1),
                ends_at: now + jiff::SignedDuration::from_hours(24 * 30),
            },
            now,
        )
        .await?;

    carts.add_to_cart(buyer, dune.uuid, 2, now).await?;
    carts.add_to_cart(buyer, emma.uuid, 1, now).await?;

    let view = carts.get_cart(buyer, now).await?;

    println!("cart total:      {}", view.totals.total_price);
    println!("cart discount:   {}", view.totals.total_discount);
    println!("cart payable:    {}", view.totals.total_discounted_price());

    let order = orders
        .create_order(
            buyer,
            NewOrder {
                uuid: OrderUuid::new(),
                shipping_address: NewShippingAddress {
                    address: "12 Harbour Lane".to_string(),
                    state: "Lagos".to_string(),
                    country: "Nigeria".to_string(),
                    zip_code: "100001".to_string(),
                    nearest_bus_stop: None,
                },
                note: Some("Call on arrival".to_string()),
            },
            now,
        )
        .await?;

    println!("order reference: {}", order.reference);
    println!("order total:     {}", order.total_price);
    println!("order discount:  {}", order.total_discount);

    orders.mark_paid(order.uuid, Timestamp::now()).await?;

    for status in [
        OrderStatus::OrderPlaced,
        OrderStatus::Packed,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
    ] {
        let updated = orders
            .set_status(order.uuid, status, Timestamp::now())
            .await?;

        println!("order status:    {}", updated.status);
    }

    Ok(())
}
