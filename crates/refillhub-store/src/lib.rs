//! # refillhub-store: Local Persistence for RefillHub
//!
//! Keeps users, credentials and the current session in a local SQLite
//! key-value table, standing in for the browser storage the storefront
//! used to rely on.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RefillHub Data Flow                              │
//! │                                                                         │
//! │  Storefront command (login, checkout)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 refillhub-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ KvRepository  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ UserRepo      │    │ 001_kv_store │  │   │
//! │  │   │               │    │ AccountRepo   │    │              │  │   │
//! │  │   │               │    │ SessionRepo   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 SQLite (refillhub.db)                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Store error types
//! - [`repository`] - Key-value, user, account and session repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use refillhub_store::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("refillhub.db")).await?;
//!
//! let user = db.accounts().signup("ada@example.com", "secret1", "Ada").await?;
//! db.session().set(&user.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::accounts::AccountRepository;
pub use repository::kv::KvRepository;
pub use repository::session::SessionRepository;
pub use repository::users::UserRepository;
