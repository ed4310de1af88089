//! Carts service.

use async_trait::async_trait;
use folio::pricing::{self, cart_totals};
use jiff::Timestamp;
use mockall::automock;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{CartLine, CartLineView, CartView, SyncLine, SyncOutcome},
            repository::CartsRepository,
        },
        catalog::{
            BooksRepository,
            models::{Book, BookUuid},
        },
    },
    store::{Db, StoreError, Transaction},
};

#[derive(Debug, Clone)]
pub struct MemCartsService {
    db: Db,
    carts: CartsRepository,
    books: BooksRepository,
}

impl MemCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts: CartsRepository::new(),
            books: BooksRepository::new(),
        }
    }

    /// Resolves a sellable book, folding "missing" and "unpublished" into
    /// the same outcome.
    fn sellable_book(&self, tx: &Transaction, book: BookUuid) -> Result<Book, CartsServiceError> {
        match self.books.get_book(tx, book) {
            Ok(book) if book.is_published() => Ok(book),
            Ok(_) | Err(StoreError::RowNotFound) => Err(CartsServiceError::ProductNotFound),
            Err(error) => Err(error.into()),
        }
    }

    fn price_line(
        &self,
        tx: &Transaction,
        book: BookUuid,
        quantity: u32,
        at: Timestamp,
    ) -> Result<CartLineView, CartsServiceError> {
        let book = self.sellable_book(tx, book)?;

        let pricing = pricing::line_total(
            book.price,
            quantity,
            book.active_discount.as_ref(),
            at,
        );

        Ok(CartLineView {
            book_uuid: book.uuid,
            title: book.title,
            pricing,
        })
    }
}

#[async_trait]
impl CartsService for MemCartsService {
    #[tracing::instrument(name = "carts.service.add_to_cart", skip(self), err)]
    async fn add_to_cart(
        &self,
        user: Uuid,
        book: BookUuid,
        quantity: u32,
        now: Timestamp,
    ) -> Result<CartLine, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await;

        self.sellable_book(&tx, book)?;

        let cart = self.carts.get_or_create(&mut tx, user, now);
        let line = self.carts.upsert_line(&mut tx, cart.uuid, book, quantity, now)?;

        tx.commit();

        Ok(line)
    }

    #[tracing::instrument(name = "carts.service.remove_from_cart", skip(self), err)]
    async fn remove_from_cart(
        &self,
        user: Uuid,
        book: BookUuid,
        now: Timestamp,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await;

        let cart = self
            .carts
            .find_for_user(&tx, user)
            .ok_or(CartsServiceError::NotFound)?;

        self.carts.remove_line(&mut tx, cart.uuid, book, now)?;

        tx.commit();

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.sync_cart",
        skip(self, lines),
        fields(line_count = lines.len()),
        err
    )]
    async fn sync_cart(
        &self,
        user: Uuid,
        lines: Vec<SyncLine>,
        now: Timestamp,
    ) -> Result<SyncOutcome, CartsServiceError> {
        let mut tx = self.db.begin().await;

        let cart = self.carts.get_or_create(&mut tx, user, now);
        let mut outcome = SyncOutcome::default();

        for line in lines {
            if line.quantity == 0 || self.sellable_book(&tx, line.book_uuid).is_err() {
                // A stale session line must not abort the whole merge.
                outcome.skipped.push(line.book_uuid);
                continue;
            }

            self.carts
                .upsert_line(&mut tx, cart.uuid, line.book_uuid, line.quantity, now)?;

            outcome.merged += 1;
        }

        tx.commit();

        info!(
            user_uuid = %user,
            merged = outcome.merged,
            skipped = outcome.skipped.len(),
            "merged session cart"
        );

        Ok(outcome)
    }

    async fn get_cart(&self, user: Uuid, at: Timestamp) -> Result<CartView, CartsServiceError> {
        let mut tx = self.db.begin().await;

        let cart = self.carts.get_or_create(&mut tx, user, at);

        let mut views = Vec::new();

        for line in self.carts.lines(&tx, cart.uuid) {
            // A line whose book has gone away stays in the store (the write
            // paths decide its fate) but is not priced into the view.
            match self.price_line(&tx, line.book_uuid, line.quantity, at) {
                Ok(view) => views.push(view),
                Err(CartsServiceError::ProductNotFound) => {}
                Err(error) => return Err(error),
            }
        }

        tx.commit();

        let totals = cart_totals(views.iter().map(|view| &view.pricing));

        Ok(CartView {
            lines: views,
            totals,
        })
    }

    async fn quote(
        &self,
        lines: Vec<SyncLine>,
        at: Timestamp,
    ) -> Result<Vec<CartLineView>, CartsServiceError> {
        let tx = self.db.begin().await;

        let mut views = Vec::new();

        for line in lines {
            // Guest carts may reference books that have since gone away.
            match self.price_line(&tx, line.book_uuid, line.quantity, at) {
                Ok(view) => views.push(view),
                Err(CartsServiceError::ProductNotFound) => {}
                Err(error) => return Err(error),
            }
        }

        Ok(views)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Adds a book to the user's cart.
    ///
    /// An existing `(cart, book)` line accumulates the quantity; a new line
    /// is created with exactly the given quantity.
    async fn add_to_cart(
        &self,
        user: Uuid,
        book: BookUuid,
        quantity: u32,
        now: Timestamp,
    ) -> Result<CartLine, CartsServiceError>;

    /// Deletes the `(cart, book)` line. Reports `NotFound` when absent so
    /// callers can tell a no-op from a removal.
    async fn remove_from_cart(
        &self,
        user: Uuid,
        book: BookUuid,
        now: Timestamp,
    ) -> Result<(), CartsServiceError>;

    /// Merges session lines into the user's cart atomically, skipping lines
    /// whose book no longer exists. The session copy is the caller's to
    /// clear.
    async fn sync_cart(
        &self,
        user: Uuid,
        lines: Vec<SyncLine>,
        now: Timestamp,
    ) -> Result<SyncOutcome, CartsServiceError>;

    /// The user's cart, priced at `at`.
    async fn get_cart(&self, user: Uuid, at: Timestamp) -> Result<CartView, CartsServiceError>;

    /// Prices a transient line list without persisting anything, skipping
    /// unknown books.
    async fn quote(
        &self,
        lines: Vec<SyncLine>,
        at: Timestamp,
    ) -> Result<Vec<CartLineView>, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{domain::catalog::CatalogService, test::TestContext};

    use super::*;

    #[tokio::test]
    async fn first_add_sets_the_given_quantity() -> TestResult {
        let ctx = TestContext::new();
        let book = ctx.create_book("Dune", "12.00").await?;

        let line = ctx
            .carts
            .add_to_cart(ctx.user, book.uuid, 3, ctx.now())
            .await?;

        assert_eq!(line.quantity, 3);

        Ok(())
    }

    #[tokio::test]
    async fn repeat_adds_accumulate_quantity() -> TestResult {
        let ctx = TestContext::new();
        let book = ctx.create_book("Dune", "12.00").await?;

        ctx.carts
            .add_to_cart(ctx.user, book.uuid, 2, ctx.now())
            .await?;
        let line = ctx
            .carts
            .add_to_cart(ctx.user, book.uuid, 3, ctx.now())
            .await?;

        assert_eq!(line.quantity, 5, "quantities accumulate on the same line");

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_adds_do_not_lose_updates() -> TestResult {
        let ctx = TestContext::new();
        let book = ctx.create_book("Dune", "12.00").await?;

        let (first, second) = tokio::join!(
            ctx.carts.add_to_cart(ctx.user, book.uuid, 1, ctx.now()),
            ctx.carts.add_to_cart(ctx.user, book.uuid, 1, ctx.now()),
        );

        first?;
        second?;

        let view = ctx.carts.get_cart(ctx.user, ctx.now()).await?;

        assert_eq!(view.lines.len(), 1, "both adds target one line");
        assert_eq!(
            view.lines[0].pricing.quantity, 2,
            "neither increment may be lost"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_book_is_rejected() {
        let ctx = TestContext::new();

        let result = ctx
            .carts
            .add_to_cart(ctx.user, BookUuid::new(), 1, ctx.now())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn draft_book_is_rejected() -> TestResult {
        let ctx = TestContext::new();
        let book = ctx.create_draft_book("Unreleased", "20.00").await?;

        let result = ctx
            .carts
            .add_to_cart(ctx.user, book.uuid, 1, ctx.now())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound for a draft, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() -> TestResult {
        let ctx = TestContext::new();
        let book = ctx.create_book("Dune", "12.00").await?;

        let result = ctx
            .carts
            .add_to_cart(ctx.user, book.uuid, 0, ctx.now())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn removing_an_absent_line_reports_not_found() -> TestResult {
        let ctx = TestContext::new();
        let book = ctx.create_book("Dune", "12.00").await?;

        // Materialise the cart with an unrelated line first.
        let other = ctx.create_book("Emma", "7.00").await?;
        ctx.carts
            .add_to_cart(ctx.user, other.uuid, 1, ctx.now())
            .await?;

        let result = ctx
            .carts
            .remove_from_cart(ctx.user, book.uuid, ctx.now())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn removed_line_is_gone_from_the_view() -> TestResult {
        let ctx = TestContext::new();
        let book = ctx.create_book("Dune", "12.00").await?;

        ctx.carts
            .add_to_cart(ctx.user, book.uuid, 2, ctx.now())
            .await?;
        ctx.carts
            .remove_from_cart(ctx.user, book.uuid, ctx.now())
            .await?;

        let view = ctx.carts.get_cart(ctx.user, ctx.now()).await?;

        assert!(view.lines.is_empty(), "removed line should not be priced");

        Ok(())
    }

    #[tokio::test]
    async fn merge_accumulates_matching_lines() -> TestResult {
        let ctx = TestContext::new();
        let book = ctx.create_book("Dune", "12.00").await?;

        ctx.carts
            .add_to_cart(ctx.user, book.uuid, 3, ctx.now())
            .await?;

        let outcome = ctx
            .carts
            .sync_cart(
                ctx.user,
                vec![SyncLine {
                    book_uuid: book.uuid,
                    quantity: 2,
                }],
                ctx.now(),
            )
            .await?;

        assert_eq!(outcome.merged, 1);
        assert!(outcome.skipped.is_empty(), "nothing should be skipped");

        let view = ctx.carts.get_cart(ctx.user, ctx.now()).await?;

        assert_eq!(view.lines[0].pricing.quantity, 5, "3 + 2 after the merge");

        Ok(())
    }

    #[tokio::test]
    async fn merge_skips_missing_books_without_aborting() -> TestResult {
        let ctx = TestContext::new();
        let kept = ctx.create_book("Dune", "12.00").await?;
        let doomed = ctx.create_book("Gone", "5.00").await?;

        ctx.catalog.delete_book(doomed.uuid).await?;

        let outcome = ctx
            .carts
            .sync_cart(
                ctx.user,
                vec![
                    SyncLine {
                        book_uuid: doomed.uuid,
                        quantity: 1,
                    },
                    SyncLine {
                        book_uuid: kept.uuid,
                        quantity: 2,
                    },
                ],
                ctx.now(),
            )
            .await?;

        assert_eq!(outcome.merged, 1, "the surviving line should merge");
        assert_eq!(outcome.skipped, vec![doomed.uuid]);

        let view = ctx.carts.get_cart(ctx.user, ctx.now()).await?;

        assert_eq!(view.lines.len(), 1, "only the kept book remains");
        assert_eq!(view.lines[0].book_uuid, kept.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn cart_view_prices_lines_and_totals() -> TestResult {
        let ctx = TestContext::new();

        let discounted = ctx.create_book("Dune", "10.00").await?;
        ctx.catalog
            .attach_discount(discounted.uuid, ctx.ten_percent_from(2), ctx.now())
            .await?;

        let plain = ctx.create_book("Emma", "5.00").await?;

        ctx.carts
            .add_to_cart(ctx.user, discounted.uuid, 2, ctx.now())
            .await?;
        ctx.carts
            .add_to_cart(ctx.user, plain.uuid, 1, ctx.now())
            .await?;

        let view = ctx.carts.get_cart(ctx.user, ctx.now()).await?;

        // Cart totals are pre-discount; the payable figure is derived.
        assert_eq!(view.totals.total_price, "25.00".parse::<Decimal>()?);
        assert_eq!(view.totals.total_discount, "2.00".parse::<Decimal>()?);
        assert_eq!(
            view.totals.total_discounted_price(),
            "23.00".parse::<Decimal>()?
        );

        Ok(())
    }

    #[tokio::test]
    async fn quote_prices_without_persisting() -> TestResult {
        let ctx = TestContext::new();
        let book = ctx.create_book("Dune", "12.00").await?;

        let views = ctx
            .carts
            .quote(
                vec![
                    SyncLine {
                        book_uuid: book.uuid,
                        quantity: 2,
                    },
                    SyncLine {
                        book_uuid: BookUuid::new(),
                        quantity: 1,
                    },
                ],
                ctx.now(),
            )
            .await?;

        assert_eq!(views.len(), 1, "unknown books are skipped");
        assert_eq!(views[0].pricing.total, "24.00".parse::<Decimal>()?);

        let cart = ctx.carts.get_cart(ctx.user, ctx.now()).await?;

        assert!(cart.lines.is_empty(), "quoting must not write cart lines");

        Ok(())
    }
}
