//! # till-db: Storage Layer for Till
//!
//! This crate persists the daily cash ledger and credit subledger to
//! SQLite with sqlx, and orchestrates the flows that span aggregates.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Data Flow                                 │
//! │                                                                         │
//! │  Dashboard action (close register, record sale, ...)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     till-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  session.rs   │    │  (embedded)  │  │   │
//! │  │   │               │    │  credit.rs    │    │              │  │   │
//! │  │   │ SqlitePool +  │◄───│  product.rs   │    │ 001_init.sql │  │   │
//! │  │   │ Clock + Ids + │    │  sales.rs     │    │ ...          │  │   │
//! │  │   │ EventSink     │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   business rules come from till-core; this crate adds          │   │
//! │  │   transactions, versioning and event notification              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode, foreign keys on)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Repository implementations per aggregate
//! - [`events`] - Ledger event stream for the presentation layer
//! - [`runtime`] - Clock and id-generation collaborators
//!
//! ## Usage
//!
//! ```rust,ignore
//! use till_core::money::Money;
//! use till_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/till.db")).await?;
//!
//! let today = db.today();
//! db.sessions().open(today, Money::from_cents(100_000)).await?;
//! // ... sales, movements ...
//! let count = db.sessions().close(today, Money::from_cents(130_000)).await?;
//! assert!(count.is_balanced());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod events;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod runtime;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use events::{LedgerEvent, MemorySink, NotificationSink, TracingSink};
pub use pool::{Database, DbConfig};
pub use runtime::{Clock, FixedClock, IdGenerator, SequenceIds, SystemClock, UuidIds};

// Repository re-exports for convenience
pub use repository::credit::{
    CreditLineDraft, CreditRepository, PaymentOutcome, RecordedCreditSale, SettlementPosting,
};
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::sales::{CashSaleReceipt, SaleService};
pub use repository::session::{SessionRepository, SessionView};
