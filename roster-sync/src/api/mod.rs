//! Mailchimp Marketing API (v3) access
//!
//! A deliberately thin layer: every request is an [`Operation`], every
//! response is either a body, a not-found, or an [`ApiError`] carrying the
//! status code. Retries and pagination are not handled here.

pub mod client;
pub mod dry_run;
pub mod error;
pub mod gateway;
pub mod models;
pub mod operations;

#[cfg(test)]
pub mod testing;

pub use client::MailchimpClient;
pub use dry_run::DryRunGateway;
pub use error::ApiError;
pub use gateway::Gateway;
pub use models::{
    Category, CategoryCollection, Interest, InterestCollection, ListCollection, NewSubscriber,
    Subscriber,
};
pub use operations::Operation;
