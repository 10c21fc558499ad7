pub mod catalog;
pub mod dates;
pub mod error;
pub mod orders;
pub mod reservations;
pub mod slots;
pub mod users;

pub use error::{ErrorBody, MessageResponse};
