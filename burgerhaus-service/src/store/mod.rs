//! Query functions per entity. Every function borrows one connection and
//! returns the raw diesel error; mapping to HTTP statuses happens in the
//! handlers.

pub mod allergens;
pub mod burgers;
pub mod customers;
pub mod ingredients;
pub mod menus;
pub mod offers;
pub mod orders;
pub mod reservations;
pub mod tables;
pub mod users;
