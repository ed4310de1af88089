//! Orders Repository

use folio::pricing::{LinePricing, order_totals};
use jiff::Timestamp;

use crate::{
    domain::orders::models::{Order, OrderItem, OrderNote, OrderUuid, ShippingAddress},
    store::{StoreError, Transaction},
};

#[derive(Debug, Clone, Default)]
pub(crate) struct OrdersRepository;

impl OrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn insert_order(
        &self,
        tx: &mut Transaction,
        order: Order,
    ) -> Result<Order, StoreError> {
        if tx.rows().orders.contains_key(&order.uuid) {
            return Err(StoreError::UniqueViolation);
        }

        tx.rows_mut().orders.insert(order.uuid, order.clone());

        Ok(order)
    }

    pub(crate) fn get_order(
        &self,
        tx: &Transaction,
        order: OrderUuid,
    ) -> Result<Order, StoreError> {
        tx.rows()
            .orders
            .get(&order)
            .cloned()
            .ok_or(StoreError::RowNotFound)
    }

    pub(crate) fn update_order(
        &self,
        tx: &mut Transaction,
        order: Order,
    ) -> Result<Order, StoreError> {
        if !tx.rows().orders.contains_key(&order.uuid) {
            return Err(StoreError::RowNotFound);
        }

        tx.rows_mut().orders.insert(order.uuid, order.clone());

        Ok(order)
    }

    pub(crate) fn insert_item(
        &self,
        tx: &mut Transaction,
        item: OrderItem,
    ) -> Result<OrderItem, StoreError> {
        if !tx.rows().orders.contains_key(&item.order_uuid) {
            return Err(StoreError::ForeignKeyViolation);
        }

        tx.rows_mut().order_items.insert(item.uuid, item.clone());

        Ok(item)
    }

    /// The order's items, oldest first.
    pub(crate) fn items(&self, tx: &Transaction, order: OrderUuid) -> Vec<OrderItem> {
        let mut items: Vec<OrderItem> = tx
            .rows()
            .order_items
            .values()
            .filter(|item| item.order_uuid == order)
            .cloned()
            .collect();

        items.sort_by_key(|item| (item.created_at, item.uuid.into_uuid()));

        items
    }

    /// Recomputes the order's totals from its item rows.
    ///
    /// Runs inside the same transaction as the item write that triggered
    /// it, so totals are never observably stale. The totals are derived in
    /// full each time, never patched.
    pub(crate) fn update_totals(
        &self,
        tx: &mut Transaction,
        order: OrderUuid,
        now: Timestamp,
    ) -> Result<Order, StoreError> {
        let pricings: Vec<LinePricing> = self
            .items(tx, order)
            .into_iter()
            .map(|item| LinePricing {
                price: item.price,
                quantity: item.quantity,
                discount: item.discount,
                total: item.total,
            })
            .collect();

        let totals = order_totals(&pricings);

        let mut row = self.get_order(tx, order)?;

        row.total_price = totals.total_price;
        row.total_discount = totals.total_discount;
        row.updated_at = now;

        self.update_order(tx, row)
    }

    pub(crate) fn insert_address(
        &self,
        tx: &mut Transaction,
        address: ShippingAddress,
    ) -> Result<ShippingAddress, StoreError> {
        if !tx.rows().orders.contains_key(&address.order_uuid) {
            return Err(StoreError::ForeignKeyViolation);
        }

        if tx
            .rows()
            .shipping_addresses
            .contains_key(&address.order_uuid)
        {
            return Err(StoreError::UniqueViolation);
        }

        tx.rows_mut()
            .shipping_addresses
            .insert(address.order_uuid, address.clone());

        Ok(address)
    }

    pub(crate) fn insert_note(
        &self,
        tx: &mut Transaction,
        note: OrderNote,
    ) -> Result<OrderNote, StoreError> {
        if !tx.rows().orders.contains_key(&note.order_uuid) {
            return Err(StoreError::ForeignKeyViolation);
        }

        tx.rows_mut().order_notes.insert(note.order_uuid, note.clone());

        Ok(note)
    }

    pub(crate) fn address(
        &self,
        tx: &Transaction,
        order: OrderUuid,
    ) -> Result<ShippingAddress, StoreError> {
        tx.rows()
            .shipping_addresses
            .get(&order)
            .cloned()
            .ok_or(StoreError::RowNotFound)
    }

    pub(crate) fn note(&self, tx: &Transaction, order: OrderUuid) -> Option<OrderNote> {
        tx.rows().order_notes.get(&order).cloned()
    }
}
