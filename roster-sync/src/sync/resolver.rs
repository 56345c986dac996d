//! Find-or-create of list members by email address

use colored::*;
use log::debug;
use serde_json::{Map, json};

use super::directory::Directory;
use super::email::{is_valid_email, normalize_email, subscriber_hash};
use super::error::SyncError;
use crate::api::{ApiError, Gateway, NewSubscriber, Subscriber};

/// How a subscriber was obtained
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Already on the list; returned untouched
    Existing(Subscriber),
    /// Created by this call
    Created(Subscriber),
}

impl Resolution {
    pub fn into_subscriber(self) -> Subscriber {
        match self {
            Resolution::Existing(s) | Resolution::Created(s) => s,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Resolution::Created(_))
    }
}

/// Body for a brand new member with the roster defaults
pub fn new_subscriber(email: &str, first_name: &str, last_name: &str) -> NewSubscriber {
    let mut merge_fields = Map::new();
    merge_fields.insert("FNAME".to_string(), json!(first_name));
    merge_fields.insert("LNAME".to_string(), json!(last_name));
    merge_fields.insert("NEWSLETTER".to_string(), json!("No"));

    NewSubscriber {
        email_address: email.to_string(),
        email_type: "html".to_string(),
        status: "subscribed".to_string(),
        merge_fields,
    }
}

pub struct SubscriberResolver<'a> {
    gateway: &'a dyn Gateway,
    directory: &'a Directory,
}

impl<'a> SubscriberResolver<'a> {
    pub fn new(gateway: &'a dyn Gateway, directory: &'a Directory) -> Self {
        Self { gateway, directory }
    }

    /// Look the member up by content address, creating it when absent.
    ///
    /// Returns `Ok(None)` without touching the network when the email is
    /// blank or malformed.
    pub async fn resolve(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Resolution>, SyncError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            debug!("Not a usable email address: '{}'", email);
            return Ok(None);
        }

        let existing = match self.lookup(&email).await {
            Ok(existing) => existing,
            Err(e) => {
                print_failure(format!("Failed to look up {}", email), &e);
                return Err(e.into());
            }
        };

        if let Some(subscriber) = existing {
            debug!("Found {} as {}", email, subscriber.id);
            return Ok(Some(Resolution::Existing(subscriber)));
        }

        let body = new_subscriber(&email, first_name, last_name);
        let created = match self.create(&body).await {
            Ok(created) => created,
            Err(e) => {
                print_failure(
                    format!("Failed to add {} {} {}", email, first_name, last_name),
                    &e,
                );
                return Err(e.into());
            }
        };

        debug!("Created {} as {}", email, created.id);
        Ok(Some(Resolution::Created(created)))
    }

    async fn lookup(&self, email: &str) -> Result<Option<Subscriber>, ApiError> {
        let resource = self.directory.member_resource(&subscriber_hash(email));
        self.gateway.get(&resource).await?.decode(&resource)
    }

    async fn create(&self, body: &NewSubscriber) -> Result<Subscriber, ApiError> {
        let resource = self.directory.members_resource();
        self.gateway
            .post(&resource, body.to_json())
            .await?
            .require("POST", &resource)
    }
}

fn print_failure(message: String, error: &ApiError) {
    let status = error
        .status()
        .map(|s| format!(" (HTTP {})", s))
        .unwrap_or_default();
    println!("{}", format!("{}{}", message, status).red());
}
