//! # RefillHub Storefront Library
//!
//! Application layer of the RefillHub storefront: state containers, the
//! commands the presentation layer calls, and startup.
//!
//! ## Module Organization
//! ```text
//! refillhub_storefront/
//! ├── lib.rs          ◄─── You are here (Storefront setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── session.rs  ◄─── Logged-in user
//! │   ├── cart.rs     ◄─── Cart state management
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── account.rs  ◄─── Signup / login / logout
//! │   ├── product.rs  ◄─── Catalog browsing
//! │   ├── offer.rs    ◄─── Combo / refill / original choices
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── checkout.rs ◄─── Settlement
//! │   ├── rewards.rs  ◄─── Points and reminders
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management (Multiple State Types)
//! Instead of a single `AppState` struct, each concern has its own
//! container and each command takes only the ones it needs. `Storefront`
//! simply owns one of each:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Storefront                                           │
//! │                                                                         │
//! │  ┌──────────┐ ┌──────────────┐ ┌───────────┐ ┌─────────────┐ ┌───────┐ │
//! │  │ DbState  │ │ SessionState │ │ CartState │ │ ConfigState │ │Catalog│ │
//! │  └──────────┘ └──────────────┘ └───────────┘ └─────────────┘ └───────┘ │
//! │                                                                         │
//! │  commands::offer::accept_combo(sf.catalog(), sf.session(), sf.cart(),  │
//! │                                "1")                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use refillhub_core::Catalog;
use refillhub_store::{Database, DbConfig, DbError, DbResult};
use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{CartState, ConfigState, DbState, SessionState};

/// Everything a running storefront holds.
#[derive(Debug, Clone)]
pub struct Storefront {
    db: DbState,
    session: SessionState,
    cart: CartState,
    config: ConfigState,
    catalog: Catalog,
}

impl Storefront {
    /// Opens the store at `config.db_path` and builds empty state.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │  1. Create the data directory if needed                                 │
    /// │  2. Connect to SQLite (WAL) and run pending migrations                  │
    /// │  3. Load the standard catalog                                           │
    /// │  4. Empty session and cart (see commands::account::restore_session)     │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn open(config: ConfigState) -> DbResult<Self> {
        if let Some(dir) = config.db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| {
                DbError::ConnectionFailed(format!("{}: {}", dir.display(), e))
            })?;
        }

        let db = Database::new(DbConfig::new(config.db_path.clone())).await?;
        info!(db_path = ?config.db_path, "Database connected and migrations applied");

        Ok(Storefront::with_database(db, config))
    }

    /// Storefront over a fresh in-memory store (tests, demos).
    pub async fn in_memory() -> DbResult<Self> {
        let db = Database::new(DbConfig::in_memory()).await?;
        Ok(Storefront::with_database(db, ConfigState::default()))
    }

    fn with_database(db: Database, config: ConfigState) -> Self {
        Storefront {
            db: DbState::new(db),
            session: SessionState::new(),
            cart: CartState::new(),
            config,
            catalog: Catalog::standard(),
        }
    }

    pub fn db(&self) -> &DbState {
        &self.db
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn config(&self) -> &ConfigState {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=refillhub=trace` - Show trace for refillhub crates only
/// - Default: `info,refillhub=debug,sqlx=warn`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,refillhub=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
