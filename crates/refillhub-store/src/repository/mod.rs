//! # Repository Module
//!
//! Repositories over the single `kv_store` table.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront command                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UserRepository      AccountRepository      SessionRepository           │
//! │  user:{id}           account:{email}        session:current             │
//! │       │                     │                      │                    │
//! │       └─────────────────────┼──────────────────────┘                    │
//! │                             ▼                                           │
//! │                       KvRepository                                      │
//! │                  get / set / remove / keys                              │
//! │                             │                                           │
//! │                             ▼                                           │
//! │                     SQLite kv_store                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`kv::KvRepository`] - Raw string values by key
//! - [`users::UserRepository`] - User records and point/history updates
//! - [`accounts::AccountRepository`] - Signup and login
//! - [`session::SessionRepository`] - Who is logged in

pub mod accounts;
pub mod kv;
pub mod session;
pub mod users;
