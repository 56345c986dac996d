//! Mailchimp Operations Module
//!
//! Every request the gateway sends is described by an [`Operation`], so the
//! same value can be executed, recorded, or printed during a dry run.

pub mod operation;

pub use operation::Operation;
