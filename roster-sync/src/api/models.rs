//! Mailchimp resource models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// An audience (mailing list)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSummary {
    pub id: String,
    pub name: String,
}

/// Response body of `GET lists`
#[derive(Debug, Clone, Deserialize)]
pub struct ListCollection {
    #[serde(default)]
    pub lists: Vec<ListSummary>,
    #[serde(default)]
    pub total_items: Option<u64>,
}

/// An interest category ("group title" in the Mailchimp UI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
}

/// Response body of `GET lists/{id}/interest-categories`
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCollection {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub total_items: Option<u64>,
}

/// A single interest within a category.
///
/// The API calls the label `name`; it is exposed here as `title` so it reads
/// the same as a [`Category`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interest {
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
}

/// Response body of `GET lists/{id}/interest-categories/{id}/interests`
#[derive(Debug, Clone, Deserialize)]
pub struct InterestCollection {
    #[serde(default)]
    pub interests: Vec<Interest>,
    #[serde(default)]
    pub total_items: Option<u64>,
}

/// A list member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    /// MD5 of the lowercased email, assigned by the server
    pub id: String,
    pub email_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free-text fields; values are usually strings but the API allows numbers
    #[serde(default)]
    pub merge_fields: Map<String, Value>,
    #[serde(default)]
    pub interests: HashMap<String, bool>,
}

impl Subscriber {
    /// Read a merge field as text; absent and null fields read as empty
    pub fn merge_field(&self, name: &str) -> String {
        match self.merge_fields.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    pub fn has_interest(&self, interest_id: &str) -> bool {
        self.interests.get(interest_id).copied().unwrap_or(false)
    }
}

/// Body of `POST lists/{id}/members`
#[derive(Debug, Clone, Serialize)]
pub struct NewSubscriber {
    pub email_address: String,
    pub email_type: String,
    pub status: String,
    pub merge_fields: Map<String, Value>,
}

impl NewSubscriber {
    pub fn to_json(&self) -> Value {
        json!({
            "email_address": self.email_address,
            "email_type": self.email_type,
            "status": self.status,
            "merge_fields": self.merge_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_tolerates_missing_maps() {
        let sub: Subscriber =
            serde_json::from_value(json!({"id": "abc", "email_address": "a@b.com"})).unwrap();
        assert!(sub.merge_fields.is_empty());
        assert!(sub.interests.is_empty());
        assert_eq!(sub.merge_field("TROOPS"), "");
        assert!(!sub.has_interest("r1"));
    }

    #[test]
    fn test_merge_field_renders_non_strings() {
        let sub: Subscriber = serde_json::from_value(json!({
            "id": "abc",
            "email_address": "a@b.com",
            "merge_fields": {"TROOPS": 42, "PACKS": null, "CREWS": "7"},
            "interests": {"r1": true, "r2": false}
        }))
        .unwrap();

        assert_eq!(sub.merge_field("TROOPS"), "42");
        assert_eq!(sub.merge_field("PACKS"), "");
        assert_eq!(sub.merge_field("CREWS"), "7");
        assert!(sub.has_interest("r1"));
        assert!(!sub.has_interest("r2"));
    }

    #[test]
    fn test_interest_reads_name_as_title() {
        let interest: Interest =
            serde_json::from_value(json!({"id": "i1", "name": "Scoutmaster", "display_order": 1}))
                .unwrap();
        assert_eq!(interest.title, "Scoutmaster");
    }
}
