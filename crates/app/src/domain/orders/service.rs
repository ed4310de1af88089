//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use folio::pricing;
use jiff::Timestamp;
use mockall::automock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        carts::CartsRepository,
        catalog::BooksRepository,
        notifications::NotificationGateway,
        orders::{
            errors::OrdersServiceError,
            lifecycle::Transition,
            models::{
                NewOrder, Order, OrderDetail, OrderItem, OrderItemUuid, OrderNote, OrderStatus,
                OrderUuid, ShippingAddress,
            },
            repository::OrdersRepository,
        },
    },
    store::{Db, StoreError},
};

pub struct MemOrdersService {
    db: Db,
    orders: OrdersRepository,
    carts: CartsRepository,
    books: BooksRepository,
    notifier: Arc<dyn NotificationGateway>,
}

impl MemOrdersService {
    #[must_use]
    pub fn new(db: Db, notifier: Arc<dyn NotificationGateway>) -> Self {
        Self {
            db,
            orders: OrdersRepository::new(),
            carts: CartsRepository::new(),
            books: BooksRepository::new(),
            notifier,
        }
    }
}

#[async_trait]
impl OrdersService for MemOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(order_uuid = %order.uuid),
        err
    )]
    async fn create_order(
        &self,
        user: Uuid,
        order: NewOrder,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await;

        let cart = self
            .carts
            .find_for_user(&tx, user)
            .ok_or(OrdersServiceError::EmptyCart)?;

        let lines = self.carts.lines(&tx, cart.uuid);

        if lines.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let created = self.orders.insert_order(
            &mut tx,
            Order::create(order.uuid, user, new_reference(), now),
        )?;

        for line in lines {
            // A cart line whose book has vanished aborts the whole
            // creation; the dropped transaction rolls every row back.
            let book = match self.books.get_book(&tx, line.book_uuid) {
                Ok(book) => book,
                Err(StoreError::RowNotFound) => {
                    return Err(OrdersServiceError::ProductNotFound);
                }
                Err(error) => return Err(error.into()),
            };

            let pricing =
                pricing::line_total(book.price, line.quantity, book.active_discount.as_ref(), now);

            self.orders.insert_item(
                &mut tx,
                OrderItem {
                    uuid: OrderItemUuid::new(),
                    order_uuid: created.uuid,
                    book_uuid: book.uuid,
                    quantity: line.quantity,
                    price: pricing.price,
                    discount: pricing.discount,
                    total: pricing.total,
                    created_at: now,
                },
            )?;

            // Totals are recomputed from the item rows after every item
            // write, inside this same transaction.
            self.orders.update_totals(&mut tx, created.uuid, now)?;
        }

        self.orders.insert_address(
            &mut tx,
            ShippingAddress {
                order_uuid: created.uuid,
                address: order.shipping_address.address,
                state: order.shipping_address.state,
                country: order.shipping_address.country,
                zip_code: order.shipping_address.zip_code,
                nearest_bus_stop: order.shipping_address.nearest_bus_stop,
            },
        )?;

        if let Some(note) = order.note {
            self.orders.insert_note(
                &mut tx,
                OrderNote {
                    order_uuid: created.uuid,
                    note,
                },
            )?;
        }

        self.carts.clear(&mut tx, cart.uuid, now);

        let order = self.orders.get_order(&tx, created.uuid)?;

        tx.commit();

        info!(order_uuid = %order.uuid, reference = %order.reference, "created order");

        Ok(order)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderDetail, OrdersServiceError> {
        let tx = self.db.begin().await;

        let row = self.orders.get_order(&tx, order)?;
        let items = self.orders.items(&tx, order);
        let shipping_address = self.orders.address(&tx, order)?;
        let note = self.orders.note(&tx, order);

        Ok(OrderDetail {
            order: row,
            items,
            shipping_address,
            note,
        })
    }

    #[tracing::instrument(name = "orders.service.mark_paid", skip(self), err)]
    async fn mark_paid(
        &self,
        order: OrderUuid,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await;

        let mut row = self.orders.get_order(&tx, order)?;

        row.record_payment(now);

        let updated = self.orders.update_order(&mut tx, row)?;

        tx.commit();

        info!(order_uuid = %updated.uuid, "recorded payment");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.set_status",
        skip(self),
        fields(status = %status),
        err
    )]
    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await;

        // The persisted row is the baseline for change detection; the guard
        // and milestones run against what is actually stored.
        let mut row = self.orders.get_order(&tx, order)?;

        let transition = row.apply_status(status, now)?;

        let updated = self.orders.update_order(&mut tx, row)?;

        tx.commit();

        if let Transition::Changed { from, to } = transition {
            // Best effort: a delivery failure never unwinds the transition.
            if let Err(error) = self.notifier.notify_status_change(&updated, from, to).await {
                warn!(
                    order_uuid = %updated.uuid,
                    %error,
                    "failed to deliver status notification"
                );
            }
        }

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Creates an order from the user's cart, atomically.
    ///
    /// Snapshots every cart line into an order item priced at the current
    /// book price and time, writes the shipping address and optional note,
    /// recomputes the order totals from the created items, and clears the
    /// cart. Any failure rolls the whole operation back.
    async fn create_order(
        &self,
        user: Uuid,
        order: NewOrder,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError>;

    /// The order with its items, shipping address and note.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderDetail, OrdersServiceError>;

    /// Records the externally confirmed payment for the order.
    async fn mark_paid(&self, order: OrderUuid, now: Timestamp)
    -> Result<Order, OrdersServiceError>;

    /// Moves the order to `status`, enforcing the payment gate.
    ///
    /// When the stored status actually changes, the buyer is notified after
    /// the transition commits; notification failures are logged and never
    /// propagated.
    async fn set_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
        now: Timestamp,
    ) -> Result<Order, OrdersServiceError>;
}

/// Generates the human-facing tracking code for a new order.
fn new_reference() -> String {
    format!("ord_{}", Uuid::now_v7().simple())
}
