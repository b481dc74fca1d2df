//! # Repository Module
//!
//! Database repository implementations for the cart store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  CartStore (session)                                                    │
//! │       │                                                                 │
//! │       │  storage.cart().save(&snapshot)                                 │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CartSnapshotRepository                                                 │
//! │  ├── save(&self, snapshot)                                              │
//! │  ├── load(&self)                                                        │
//! │  └── delete(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test with an in-memory pool                                 │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CartSnapshotRepository`](cart::CartSnapshotRepository) - Cart snapshot persistence

pub mod cart;
