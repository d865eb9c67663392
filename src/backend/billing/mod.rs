//! Billing Module
//!
//! Stripe checkout and subscription lifecycle.
//!
//! - **`stripe`** - form-encoded API client (customers, checkout sessions)
//! - **`signature`** - webhook signature verification
//! - **`db`** - subscriptions table and the account plan cache
//! - **`handlers`** - checkout and webhook endpoints

pub mod db;
pub mod handlers;
pub mod signature;
pub mod stripe;

pub use handlers::{create_checkout_session, webhook};
