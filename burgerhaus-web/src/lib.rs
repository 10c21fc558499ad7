//! Client side of burgerhaus: a typed API client plus the state the menu,
//! cart, checkout, reservation and admin screens are driven by.
//!
//! Persistent state goes through a [`storage::Storage`] adapter so the same
//! code runs against memory, a file on disk or a browser-backed store.

pub mod admin;
pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod menu;
pub mod reservations;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use cart::Cart;
pub use config::ClientConfig;
pub use error::{StorageError, WebError, WebResult};
pub use session::Session;
