//! # State Module
//!
//! Storefront state, one container per concern.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │   DbState    │ │ SessionState │ │  CartState   │ │ ConfigState  │   │
//! │  │              │ │              │ │              │ │              │   │
//! │  │  Database    │ │  Arc<Mutex<  │ │  Arc<Mutex<  │ │  store_name  │   │
//! │  │  (SQLite     │ │   Option<    │ │    Cart      │ │  currency    │   │
//! │  │   pool)      │ │    User>>>   │ │  >>          │ │  db_path     │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • SessionState / CartState: Arc<Mutex<T>>, never held across .await   │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take only the state they need, which keeps them easy to call
//! from tests.

mod cart;
mod config;
mod db;
mod session;

pub use cart::CartState;
pub use config::ConfigState;
pub use db::DbState;
pub use session::SessionState;
