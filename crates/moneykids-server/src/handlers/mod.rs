//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod audit;
pub mod balance;
pub mod health;
pub mod projection;
pub mod tasks;
pub mod users;
pub mod wishlist;

// Re-export all handlers for use in router
pub use audit::*;
pub use balance::*;
pub use health::*;
pub use projection::*;
pub use tasks::*;
pub use users::*;
pub use wishlist::*;
