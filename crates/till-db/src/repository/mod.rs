//! # Repository Module
//!
//! Repository implementations over the ledger schema.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Dashboard call                                                        │
//! │       │                                                                 │
//! │       │  db.sessions().close(date, counted)                            │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  SessionRepository                                                     │
//! │  ├── open / status / get                                               │
//! │  ├── append_movement / remove_movement                                 │
//! │  └── close                                                             │
//! │       │                                                                 │
//! │       │  one SQL transaction per mutation                              │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Pure guards (till-core) run inside the transaction                  │
//! │  • SQL is isolated in one place per aggregate                          │
//! │  • Cross-aggregate flows share pub(crate) tx helpers                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`session::SessionRepository`] - Session lifecycle and movement ledger
//! - [`credit::CreditRepository`] - Credit sales, payments, settlement
//! - [`product::ProductRepository`] - Product catalog and stock
//! - [`sales::SaleService`] - Cash-sale flow across product + session

pub mod credit;
pub mod product;
pub mod sales;
pub mod session;
