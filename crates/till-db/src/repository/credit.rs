//! # Credit Subledger Repository
//!
//! Credit sales, partial payments, and settlement. A credit sale lives
//! outside the daily cash ledger until the payment that brings its balance
//! to exactly zero; that payment settles the sale and posts an Income
//! movement to the current day's Open session.
//!
//! ## Settlement Dual-Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_payment(sale, amount, method)                                   │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    payment > balance?  → Overpayment, rollback, nothing applied        │
//! │    INSERT payment                                                       │
//! │    balance now zero?                                                    │
//! │      ├── UPDATE sale SET paid = 1, method, settled_at                  │
//! │      └── today's session Open?                                         │
//! │            ├── yes → INSERT Settlement movement + accumulators         │
//! │            │         → SettlementPosting::Posted                       │
//! │            └── no  → SettlementPosting::Deferred + warn event          │
//! │  COMMIT      (payment and paid flag commit either way;                 │
//! │               the deferred ledger leg is surfaced, never dropped,      │
//! │               and never opens a session implicitly)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use till_core::money::Money;
use till_core::types::{
    CreditLine, CreditPayment, CreditSale, Movement, MovementKind, MovementSource, PaymentMethod,
};
use till_core::units::{self, Quantity};
use till_core::validation::{validate_customer_name, validate_payment_amount};
use till_core::{CoreError, ValidationError};

use crate::error::{StoreError, StoreResult};
use crate::events::{LedgerEvent, NotificationSink};
use crate::repository::product::{apply_stock, fetch_product};
use crate::repository::session::{
    bump_session, fetch_session, insert_movement, next_position,
};
use crate::runtime::{Clock, IdGenerator};

// =============================================================================
// Inputs & Outcomes
// =============================================================================

/// One requested line of a credit sale, as entered at the counter.
#[derive(Debug, Clone)]
pub struct CreditLineDraft {
    pub product_id: String,
    pub quantity: Quantity,
}

/// A freshly recorded credit sale with its snapshotted lines.
#[derive(Debug, Clone)]
pub struct RecordedCreditSale {
    pub sale: CreditSale,
    pub lines: Vec<CreditLine>,
}

/// What happened to the ledger leg of a payment.
#[derive(Debug, Clone, PartialEq)]
pub enum SettlementPosting {
    /// Partial payment; the sale is still open, no ledger leg due.
    NotDue,
    /// The settling movement was appended to today's Open session.
    Posted(Movement),
    /// The sale settled but no session was Open today; the operator posts
    /// the movement manually after opening one.
    Deferred { date: chrono::NaiveDate, reason: String },
}

/// Result of [`CreditRepository::record_payment`].
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub payment: CreditPayment,
    /// Whether this payment brought the balance to exactly zero.
    pub settled: bool,
    pub posting: SettlementPosting,
}

// =============================================================================
// CreditRepository
// =============================================================================

/// Repository for the credit-sale subledger.
#[derive(Debug, Clone)]
pub struct CreditRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    events: Arc<dyn NotificationSink>,
}

impl CreditRepository {
    pub fn new(
        pool: SqlitePool,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        events: Arc<dyn NotificationSink>,
    ) -> Self {
        CreditRepository {
            pool,
            clock,
            ids,
            events,
        }
    }

    /// Records a credit sale: stock is deducted per line at recording time
    /// (the reservation), lines snapshot the product, and the sale starts
    /// unpaid with an empty payment list.
    ///
    /// One transaction; an InsufficientStock failure on any line aborts
    /// everything, including deductions already applied for earlier lines.
    pub async fn record_sale(
        &self,
        customer: &str,
        drafts: &[CreditLineDraft],
    ) -> StoreResult<RecordedCreditSale> {
        let customer = validate_customer_name(customer).map_err(CoreError::from)?;
        if drafts.is_empty() {
            return Err(CoreError::Validation(ValidationError::Required {
                field: "sale lines".to_string(),
            })
            .into());
        }

        let mut tx = self.pool.begin().await?;

        let sale_id = self.ids.new_id();
        let now = self.clock.now();
        let mut lines = Vec::with_capacity(drafts.len());
        let mut total = Money::zero();

        for draft in drafts {
            let mut product = fetch_product(&mut tx, &draft.product_id).await?;

            let remaining = match units::deduct(&product.id, product.stock(), draft.quantity) {
                Ok(remaining) => remaining,
                Err(err) => {
                    if matches!(err, CoreError::InsufficientStock { .. }) {
                        self.events.notify(LedgerEvent::InsufficientStock {
                            product_id: product.id.clone(),
                        });
                    }
                    return Err(err.into());
                }
            };
            apply_stock(&mut tx, &mut product, remaining, now).await?;

            let line_total =
                units::extended_price(product.price(), product.stock_unit, draft.quantity)?;
            total += line_total;

            lines.push(CreditLine {
                id: self.ids.new_id(),
                sale_id: sale_id.clone(),
                product_id: product.id.clone(),
                name_snapshot: product.name.clone(),
                quantity_milli: draft.quantity.milli(),
                unit: draft.quantity.unit(),
                unit_price_cents: product.price_cents,
                cost_cents: product.cost_cents,
                line_total_cents: line_total.cents(),
            });
        }

        let sale = CreditSale {
            id: sale_id,
            customer,
            total_cents: total.cents(),
            paid: false,
            method: None,
            created_at: now,
            settled_at: None,
            version: 0,
        };

        sqlx::query(
            "INSERT INTO credit_sales \
                (id, customer, total_cents, paid, method, created_at, settled_at, version) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&sale.id)
        .bind(&sale.customer)
        .bind(sale.total_cents)
        .bind(sale.paid)
        .bind(sale.method)
        .bind(sale.created_at)
        .bind(sale.settled_at)
        .bind(sale.version)
        .execute(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                "INSERT INTO credit_sale_items \
                    (id, sale_id, product_id, name_snapshot, quantity_milli, unit, \
                     unit_price_cents, cost_cents, line_total_cents) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&line.id)
            .bind(&line.sale_id)
            .bind(&line.product_id)
            .bind(&line.name_snapshot)
            .bind(line.quantity_milli)
            .bind(line.unit)
            .bind(line.unit_price_cents)
            .bind(line.cost_cents)
            .bind(line.line_total_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            customer = %sale.customer,
            total_cents = sale.total_cents,
            lines = lines.len(),
            "Credit sale recorded"
        );
        self.events.notify(LedgerEvent::CreditSaleRecorded {
            sale_id: sale.id.clone(),
            customer: sale.customer.clone(),
            total_cents: sale.total_cents,
        });

        Ok(RecordedCreditSale { sale, lines })
    }

    /// Fetches a credit sale by id.
    pub async fn get(&self, sale_id: &str) -> StoreResult<CreditSale> {
        let mut conn = self.pool.acquire().await?;
        fetch_sale(&mut conn, sale_id).await
    }

    /// Line items of a sale, as snapshotted at recording time.
    pub async fn lines(&self, sale_id: &str) -> StoreResult<Vec<CreditLine>> {
        let lines = sqlx::query_as::<_, CreditLine>(
            "SELECT id, sale_id, product_id, name_snapshot, quantity_milli, unit, \
                    unit_price_cents, cost_cents, line_total_cents \
             FROM credit_sale_items WHERE sale_id = ? ORDER BY id",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }

    /// Payments applied to a sale, oldest first.
    pub async fn payments(&self, sale_id: &str) -> StoreResult<Vec<CreditPayment>> {
        let mut conn = self.pool.acquire().await?;
        fetch_payments(&mut conn, sale_id).await
    }

    /// Remaining balance of a sale: `total − Σ payments`. Never negative.
    pub async fn balance(&self, sale_id: &str) -> StoreResult<Money> {
        let mut conn = self.pool.acquire().await?;
        let sale = fetch_sale(&mut conn, sale_id).await?;
        let payments = fetch_payments(&mut conn, sale_id).await?;
        Ok(sale.balance_with(&payments))
    }

    /// Unpaid sales, oldest first.
    pub async fn list_unpaid(&self) -> StoreResult<Vec<CreditSale>> {
        let sales = sqlx::query_as::<_, CreditSale>(
            "SELECT id, customer, total_cents, paid, method, created_at, settled_at, version \
             FROM credit_sales WHERE paid = 0 ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    /// All sales for a customer, newest first, paid or not.
    pub async fn list_by_customer(&self, customer: &str) -> StoreResult<Vec<CreditSale>> {
        let sales = sqlx::query_as::<_, CreditSale>(
            "SELECT id, customer, total_cents, paid, method, created_at, settled_at, version \
             FROM credit_sales WHERE customer = ? ORDER BY created_at DESC",
        )
        .bind(customer)
        .fetch_all(&self.pool)
        .await?;
        Ok(sales)
    }

    /// Total outstanding balance across a customer's unpaid sales.
    pub async fn customer_balance(&self, customer: &str) -> StoreResult<Money> {
        let mut conn = self.pool.acquire().await?;
        let sales = sqlx::query_as::<_, CreditSale>(
            "SELECT id, customer, total_cents, paid, method, created_at, settled_at, version \
             FROM credit_sales WHERE customer = ? AND paid = 0",
        )
        .bind(customer)
        .fetch_all(&mut *conn)
        .await?;

        let mut balance = Money::zero();
        for sale in &sales {
            let payments = fetch_payments(&mut conn, &sale.id).await?;
            balance += sale.balance_with(&payments);
        }
        Ok(balance)
    }

    /// Applies a payment to a credit sale.
    ///
    /// ## Rules
    /// - Amount must be strictly positive
    /// - A payment exceeding the remaining balance is rejected outright
    ///   (Overpayment); no partial application
    /// - The payment bringing the balance to exactly zero settles the sale
    ///   and posts the ledger leg per the settlement dual-write above
    pub async fn record_payment(
        &self,
        sale_id: &str,
        amount: Money,
        method: PaymentMethod,
    ) -> StoreResult<PaymentOutcome> {
        validate_payment_amount(amount.cents()).map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await?;

        let mut sale = fetch_sale(&mut tx, sale_id).await?;
        let payments = fetch_payments(&mut tx, sale_id).await?;
        let balance = sale.balance_with(&payments);

        // A settled sale has balance zero, so any further payment lands here
        if amount > balance {
            self.events.notify(LedgerEvent::OverpaymentRejected {
                sale_id: sale_id.to_string(),
                attempted_cents: amount.cents(),
            });
            return Err(CoreError::Overpayment {
                sale_id: sale_id.to_string(),
                balance,
                attempted: amount,
            }
            .into());
        }

        let now = self.clock.now();
        let payment = CreditPayment {
            id: self.ids.new_id(),
            sale_id: sale_id.to_string(),
            amount_cents: amount.cents(),
            created_at: now,
        };
        sqlx::query(
            "INSERT INTO credit_payments (id, sale_id, amount_cents, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(&payment.id)
        .bind(&payment.sale_id)
        .bind(payment.amount_cents)
        .bind(payment.created_at)
        .execute(&mut *tx)
        .await?;

        let settled = amount == balance;
        let mut posting = SettlementPosting::NotDue;

        if settled {
            sale.paid = true;
            sale.method = Some(method);
            sale.settled_at = Some(now);

            let result = sqlx::query(
                "UPDATE credit_sales \
                 SET paid = 1, method = ?, settled_at = ?, version = version + 1 \
                 WHERE id = ? AND version = ?",
            )
            .bind(sale.method)
            .bind(sale.settled_at)
            .bind(&sale.id)
            .bind(sale.version)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() != 1 {
                return Err(StoreError::conflict("credit sale", sale_id));
            }
            sale.version += 1;

            posting = self
                .post_settlement(&mut tx, &sale, amount, method, now)
                .await?;
        }

        tx.commit().await?;

        debug!(sale_id = %sale_id, amount_cents = amount.cents(), settled, "Payment recorded");
        self.events.notify(LedgerEvent::PaymentRecorded {
            sale_id: sale_id.to_string(),
            amount_cents: amount.cents(),
        });
        if settled {
            self.events.notify(LedgerEvent::CreditSaleSettled {
                sale_id: sale_id.to_string(),
                method,
            });
        }
        if let SettlementPosting::Deferred { date, reason } = &posting {
            self.events.notify(LedgerEvent::SettlementPostingDeferred {
                sale_id: sale_id.to_string(),
                date: *date,
                reason: reason.clone(),
            });
        }

        Ok(PaymentOutcome {
            payment,
            settled,
            posting,
        })
    }

    /// Posts the settling movement to today's session, or reports the leg
    /// deferred when no session is Open. Runs inside the payment's
    /// transaction.
    async fn post_settlement(
        &self,
        tx: &mut SqliteConnection,
        sale: &CreditSale,
        amount: Money,
        method: PaymentMethod,
        now: chrono::DateTime<chrono::Utc>,
    ) -> StoreResult<SettlementPosting> {
        let today = self.clock.today();

        let session = fetch_session(tx, today).await?;
        let mut session = match session {
            Some(s) if s.is_open() => s,
            Some(_) => {
                return Ok(SettlementPosting::Deferred {
                    date: today,
                    reason: "cash session for today is closed".to_string(),
                })
            }
            None => {
                return Ok(SettlementPosting::Deferred {
                    date: today,
                    reason: "no cash session open for today".to_string(),
                })
            }
        };

        let movement = Movement {
            id: self.ids.new_id(),
            session_date: today,
            position: next_position(tx, today).await?,
            kind: MovementKind::Income,
            method,
            amount_cents: amount.cents(),
            label: Some(format!("credit settled: {}", sale.customer)),
            source: MovementSource::Settlement {
                sale_id: sale.id.clone(),
            },
            created_at: now,
        };

        session.apply_append(&movement)?;
        insert_movement(tx, &movement).await?;
        bump_session(tx, &mut session).await?;

        Ok(SettlementPosting::Posted(movement))
    }

    /// Removes a customer's sales with their lines and payments (cascade).
    ///
    /// Dashboard convenience for purging a customer record; stock already
    /// deducted by those sales is not restored. Returns the number of
    /// sales removed.
    pub async fn delete_customer(&self, customer: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM credit_sales WHERE customer = ?")
            .bind(customer)
            .execute(&self.pool)
            .await?;

        info!(customer = %customer, sales = result.rows_affected(), "Customer credit history deleted");
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Row Helpers
// =============================================================================

async fn fetch_sale(conn: &mut SqliteConnection, sale_id: &str) -> StoreResult<CreditSale> {
    sqlx::query_as::<_, CreditSale>(
        "SELECT id, customer, total_cents, paid, method, created_at, settled_at, version \
         FROM credit_sales WHERE id = ?",
    )
    .bind(sale_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| StoreError::not_found("credit sale", sale_id))
}

async fn fetch_payments(
    conn: &mut SqliteConnection,
    sale_id: &str,
) -> StoreResult<Vec<CreditPayment>> {
    let payments = sqlx::query_as::<_, CreditPayment>(
        "SELECT id, sale_id, amount_cents, created_at \
         FROM credit_payments WHERE sale_id = ? ORDER BY created_at, id",
    )
    .bind(sale_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(payments)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemorySink;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::NewProduct;
    use crate::runtime::{FixedClock, SequenceIds};
    use chrono::{NaiveDate, Utc};
    use till_core::units::Unit;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    async fn harness() -> (Database, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::default());
        let clock = Arc::new(FixedClock {
            date: date(),
            at: Utc::now(),
        });
        let db = Database::with_runtime(
            DbConfig::in_memory(),
            clock,
            Arc::new(SequenceIds::default()),
            sink.clone(),
        )
        .await
        .unwrap();
        (db, sink)
    }

    async fn seed_product(db: &Database, name: &str, price: i64, cost: i64) -> String {
        db.products()
            .insert(NewProduct {
                name: name.to_string(),
                price_cents: price,
                cost_cents: cost,
                initial_stock: Quantity::from_whole(10, Unit::Kilogram),
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_sale(db: &Database, total_kg: i64) -> RecordedCreditSale {
        // $400.00/kg so totals are easy to read in cents
        let product_id = seed_product(db, "Rice", 40_000, 25_000).await;
        db.credit()
            .record_sale(
                "Ana",
                &[CreditLineDraft {
                    product_id,
                    quantity: Quantity::from_whole(total_kg, Unit::Kilogram),
                }],
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_record_sale_snapshots_and_deducts_stock() {
        let (db, sink) = harness().await;
        let recorded = seed_sale(&db, 2).await;

        assert_eq!(recorded.sale.total_cents, 80_000);
        assert!(!recorded.sale.paid);
        assert_eq!(recorded.lines.len(), 1);
        assert_eq!(recorded.lines[0].name_snapshot, "Rice");
        assert_eq!(recorded.lines[0].line_total_cents, 80_000);

        // 10 kg − 2 kg = 8 kg, stock reserved at recording time
        let product = db.products().get(&recorded.lines[0].product_id).await.unwrap();
        assert_eq!(product.stock_base_milli, 8_000_000);

        assert!(sink
            .take()
            .iter()
            .any(|e| matches!(e, LedgerEvent::CreditSaleRecorded { .. })));
    }

    #[tokio::test]
    async fn test_record_sale_insufficient_stock_aborts_everything() {
        let (db, sink) = harness().await;
        let ok_product = seed_product(&db, "Rice", 40_000, 25_000).await;
        let scarce = db
            .products()
            .insert(NewProduct {
                name: "Saffron".to_string(),
                price_cents: 900_000,
                cost_cents: 500_000,
                initial_stock: Quantity::from_whole(10, Unit::Gram),
            })
            .await
            .unwrap();

        let err = db
            .credit()
            .record_sale(
                "Ana",
                &[
                    CreditLineDraft {
                        product_id: ok_product.clone(),
                        quantity: Quantity::from_whole(1, Unit::Kilogram),
                    },
                    CreditLineDraft {
                        product_id: scarce.id.clone(),
                        quantity: Quantity::from_whole(50, Unit::Gram),
                    },
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock { .. })
        ));

        // The first line's deduction rolled back with the rest
        let product = db.products().get(&ok_product).await.unwrap();
        assert_eq!(product.stock_base_milli, 10_000_000);
        assert!(db.credit().list_unpaid().await.unwrap().is_empty());

        assert!(sink
            .take()
            .iter()
            .any(|e| matches!(e, LedgerEvent::InsufficientStock { .. })));
    }

    #[tokio::test]
    async fn test_partial_payments_reduce_balance() {
        let (db, _) = harness().await;
        let recorded = seed_sale(&db, 2).await; // total 80_000
        let credit = db.credit();
        let sale_id = recorded.sale.id.clone();
        let total = recorded.sale.total_cents;

        let outcome = credit
            .record_payment(&sale_id, Money::from_cents(40_000), PaymentMethod::Cash)
            .await
            .unwrap();
        assert!(!outcome.settled);
        assert_eq!(outcome.posting, SettlementPosting::NotDue);
        assert_eq!(
            credit.balance(&sale_id).await.unwrap().cents(),
            total - 40_000
        );

        let sale = credit.get(&sale_id).await.unwrap();
        assert!(!sale.paid);
    }

    #[tokio::test]
    async fn test_overpayment_rejected_outright() {
        let (db, sink) = harness().await;
        let recorded = seed_sale(&db, 2).await; // total 80_000
        let credit = db.credit();

        credit
            .record_payment(&recorded.sale.id, Money::from_cents(40_000), PaymentMethod::Cash)
            .await
            .unwrap();

        // Balance is 40_000; 70_000 must be rejected with no partial application
        let err = credit
            .record_payment(&recorded.sale.id, Money::from_cents(70_000), PaymentMethod::Cash)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::Overpayment { .. })
        ));
        assert_eq!(credit.balance(&recorded.sale.id).await.unwrap().cents(), 40_000);
        assert_eq!(credit.payments(&recorded.sale.id).await.unwrap().len(), 1);

        assert!(sink
            .take()
            .iter()
            .any(|e| matches!(e, LedgerEvent::OverpaymentRejected { .. })));
    }

    #[tokio::test]
    async fn test_settlement_posts_movement_to_open_session() {
        let (db, sink) = harness().await;
        db.sessions().open(date(), Money::zero()).await.unwrap();
        let recorded = seed_sale(&db, 2).await; // total 80_000
        let credit = db.credit();

        credit
            .record_payment(&recorded.sale.id, Money::from_cents(30_000), PaymentMethod::Cash)
            .await
            .unwrap();
        let outcome = credit
            .record_payment(&recorded.sale.id, Money::from_cents(50_000), PaymentMethod::Transfer)
            .await
            .unwrap();

        assert!(outcome.settled);
        let movement = match &outcome.posting {
            SettlementPosting::Posted(m) => m.clone(),
            other => panic!("expected Posted, got {other:?}"),
        };
        assert_eq!(movement.amount_cents, 50_000);
        assert_eq!(movement.method, PaymentMethod::Transfer);
        assert!(movement.source.is_settlement());

        // The sale is settled with the settling payment's method
        let sale = credit.get(&recorded.sale.id).await.unwrap();
        assert!(sale.paid);
        assert_eq!(sale.method, Some(PaymentMethod::Transfer));
        assert!(sale.settled_at.is_some());
        assert_eq!(credit.balance(&sale.id).await.unwrap().cents(), 0);

        // And the ledger carries the leg
        let view = db.sessions().get(date()).await.unwrap();
        assert_eq!(view.session.income_cents, 50_000);
        assert_eq!(view.movements.len(), 1);

        assert!(sink
            .take()
            .iter()
            .any(|e| matches!(e, LedgerEvent::CreditSaleSettled { .. })));
    }

    #[tokio::test]
    async fn test_settlement_without_open_session_is_deferred() {
        let (db, sink) = harness().await;
        let recorded = seed_sale(&db, 2).await; // total 80_000
        let credit = db.credit();

        let outcome = credit
            .record_payment(&recorded.sale.id, Money::from_cents(80_000), PaymentMethod::Cash)
            .await
            .unwrap();

        assert!(outcome.settled);
        assert!(matches!(
            outcome.posting,
            SettlementPosting::Deferred { .. }
        ));

        // Payment and paid flag committed regardless
        let sale = credit.get(&recorded.sale.id).await.unwrap();
        assert!(sale.paid);
        assert_eq!(credit.balance(&sale.id).await.unwrap().cents(), 0);

        // No session was opened implicitly
        assert_eq!(db.sessions().status(date()).await.unwrap(), None);

        assert!(sink
            .take()
            .iter()
            .any(|e| matches!(e, LedgerEvent::SettlementPostingDeferred { .. })));
    }

    #[tokio::test]
    async fn test_settlement_with_closed_session_is_deferred() {
        let (db, _) = harness().await;
        db.sessions().open(date(), Money::zero()).await.unwrap();
        db.sessions().close(date(), Money::zero()).await.unwrap();
        let recorded = seed_sale(&db, 1).await;

        let outcome = db
            .credit()
            .record_payment(&recorded.sale.id, Money::from_cents(40_000), PaymentMethod::Cash)
            .await
            .unwrap();
        assert!(matches!(
            outcome.posting,
            SettlementPosting::Deferred { .. }
        ));
    }

    #[tokio::test]
    async fn test_payment_on_settled_sale_is_overpayment() {
        let (db, _) = harness().await;
        let recorded = seed_sale(&db, 1).await; // total 40_000
        let credit = db.credit();

        credit
            .record_payment(&recorded.sale.id, Money::from_cents(40_000), PaymentMethod::Cash)
            .await
            .unwrap();
        let err = credit
            .record_payment(&recorded.sale.id, Money::from_cents(1), PaymentMethod::Cash)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::Overpayment { .. })
        ));
    }

    #[tokio::test]
    async fn test_customer_balance_spans_sales() {
        let (db, _) = harness().await;
        let first = seed_sale(&db, 1).await; // Ana, 40_000
        let product = seed_product(&db, "Sugar", 10_000, 6_000).await;
        let credit = db.credit();
        credit
            .record_sale(
                "Ana",
                &[CreditLineDraft {
                    product_id: product,
                    quantity: Quantity::from_whole(1, Unit::Kilogram),
                }],
            )
            .await
            .unwrap();

        assert_eq!(credit.customer_balance("Ana").await.unwrap().cents(), 50_000);

        credit
            .record_payment(&first.sale.id, Money::from_cents(40_000), PaymentMethod::Cash)
            .await
            .unwrap();
        assert_eq!(credit.customer_balance("Ana").await.unwrap().cents(), 10_000);
        assert_eq!(credit.customer_balance("Nadie").await.unwrap().cents(), 0);
    }

    #[tokio::test]
    async fn test_delete_customer_cascades() {
        let (db, _) = harness().await;
        let recorded = seed_sale(&db, 1).await;
        let credit = db.credit();
        credit
            .record_payment(&recorded.sale.id, Money::from_cents(10_000), PaymentMethod::Cash)
            .await
            .unwrap();

        let removed = credit.delete_customer("Ana").await.unwrap();
        assert_eq!(removed, 1);
        assert!(matches!(
            credit.get(&recorded.sale.id).await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        assert!(credit.lines(&recorded.sale.id).await.unwrap().is_empty());
        assert!(credit.payments(&recorded.sale.id).await.unwrap().is_empty());
    }
}
