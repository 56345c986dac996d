//! Minimal-write reconciliation of unit membership and rank
//!
//! Both operations read the subscriber we already hold, decide whether the
//! desired value is missing, and only then send a PATCH touching that single
//! merge field or interest flag.

use colored::*;
use log::info;
use serde_json::{Value, json};

use super::directory::Directory;
use super::error::SyncError;
use super::units::{UnitSet, UnitType};
use crate::api::{ApiError, Gateway, Subscriber};

/// Result of reconciling one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Already in the desired state; nothing was sent
    Unchanged,
    /// One PATCH was sent and the local copy updated
    Added,
}

/// A single-field change to a subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// Replace one merge field with a new value
    MergeField { field: &'static str, value: String },
    /// Turn one interest flag on
    Interest { id: String },
}

impl Patch {
    /// PATCH body containing only this change
    pub fn body(&self) -> Value {
        match self {
            Patch::MergeField { field, value } => json!({ "merge_fields": { *field: value } }),
            Patch::Interest { id } => json!({ "interests": { id.as_str(): true } }),
        }
    }

    /// Mirror the change on the local copy
    pub fn apply_to(&self, subscriber: &mut Subscriber) {
        match self {
            Patch::MergeField { field, value } => {
                subscriber
                    .merge_fields
                    .insert(field.to_string(), Value::String(value.clone()));
            }
            Patch::Interest { id } => {
                subscriber.interests.insert(id.clone(), true);
            }
        }
    }
}

/// Work out the unit-field patch, if any.
///
/// A blank `unit_number` plans nothing.
pub fn plan_unit(
    subscriber: &Subscriber,
    unit_type: &str,
    unit_number: &str,
) -> Result<Option<Patch>, SyncError> {
    let unit_type: UnitType = unit_type.parse()?;
    let field = unit_type.field_name();

    let mut units = UnitSet::parse(&subscriber.merge_field(field));
    let mut changed = false;
    for token in UnitSet::parse(unit_number).iter() {
        changed |= units.insert(token);
    }

    Ok(changed.then(|| Patch::MergeField {
        field,
        value: units.to_field_value(),
    }))
}

/// Work out the rank-interest patch, if any
pub fn plan_rank(
    directory: &Directory,
    subscriber: &Subscriber,
    rank_title: &str,
) -> Result<Option<Patch>, SyncError> {
    let rank = directory.rank(rank_title)?;

    if subscriber.has_interest(&rank.id) {
        return Ok(None);
    }

    Ok(Some(Patch::Interest {
        id: rank.id.clone(),
    }))
}

pub struct Reconciler<'a> {
    gateway: &'a dyn Gateway,
    directory: &'a Directory,
}

impl<'a> Reconciler<'a> {
    pub fn new(gateway: &'a dyn Gateway, directory: &'a Directory) -> Self {
        Self { gateway, directory }
    }

    /// Add `unit_number` to the subscriber's `unit_type` field if missing
    pub async fn apply_unit(
        &self,
        subscriber: &mut Subscriber,
        unit_type: &str,
        unit_number: &str,
    ) -> Result<ChangeOutcome, SyncError> {
        let Some(patch) = plan_unit(subscriber, unit_type, unit_number)? else {
            return Ok(ChangeOutcome::Unchanged);
        };

        info!(
            "update unit {} {} {}",
            subscriber.email_address, unit_type, unit_number
        );
        self.send(subscriber, patch, "unit").await
    }

    /// Turn on the interest flag for `rank_title` if not already set
    pub async fn apply_rank(
        &self,
        subscriber: &mut Subscriber,
        rank_title: &str,
    ) -> Result<ChangeOutcome, SyncError> {
        let Some(patch) = plan_rank(self.directory, subscriber, rank_title)? else {
            return Ok(ChangeOutcome::Unchanged);
        };

        info!("update position {} {}", subscriber.email_address, rank_title);
        self.send(subscriber, patch, "position").await
    }

    async fn send(
        &self,
        subscriber: &mut Subscriber,
        patch: Patch,
        what: &str,
    ) -> Result<ChangeOutcome, SyncError> {
        let resource = self.directory.member_resource(&subscriber.id);

        let result = match self.gateway.patch(&resource, patch.body()).await {
            Ok(response) if response.is_not_found() => Err(ApiError::UnexpectedNotFound {
                method: "PATCH",
                resource,
            }),
            other => other,
        };

        if let Err(e) = result {
            let status = e.status().map(|s| format!(" (HTTP {})", s)).unwrap_or_default();
            println!(
                "{}",
                format!("Failed to update {} {}{}", what, subscriber.email_address, status).red()
            );
            return Err(e.into());
        }

        patch.apply_to(subscriber);
        Ok(ChangeOutcome::Added)
    }
}
