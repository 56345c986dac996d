//! Core Operation types for Mailchimp REST requests

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single request that can be executed against the Mailchimp API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Read a resource (one page for collections)
    Get {
        /// Resource path relative to the API root (e.g., "lists")
        resource: String,
    },
    /// Create a new record in a collection
    Create {
        /// Collection path (e.g., "lists/abc123/members")
        resource: String,
        /// Record data as JSON
        data: Value,
    },
    /// Partially update an existing record
    Update {
        /// Record path (e.g., "lists/abc123/members/<id>")
        resource: String,
        /// Only the fields being changed
        data: Value,
    },
}

impl Operation {
    /// Create a new Get operation
    pub fn get(resource: impl Into<String>) -> Self {
        Self::Get {
            resource: resource.into(),
        }
    }

    /// Create a new Create operation
    pub fn create(resource: impl Into<String>, data: Value) -> Self {
        Self::Create {
            resource: resource.into(),
            data,
        }
    }

    /// Create a new Update operation
    pub fn update(resource: impl Into<String>, data: Value) -> Self {
        Self::Update {
            resource: resource.into(),
            data,
        }
    }

    /// Get the resource path for this operation
    pub fn resource(&self) -> &str {
        match self {
            Self::Get { resource } => resource,
            Self::Create { resource, .. } => resource,
            Self::Update { resource, .. } => resource,
        }
    }

    /// Get the request body, if this operation sends one
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Get { .. } => None,
            Self::Create { data, .. } => Some(data),
            Self::Update { data, .. } => Some(data),
        }
    }

    /// Get the HTTP method for this operation
    pub fn http_method(&self) -> &'static str {
        match self {
            Self::Get { .. } => "GET",
            Self::Create { .. } => "POST",
            Self::Update { .. } => "PATCH",
        }
    }

    /// Whether executing this operation changes remote state
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Get { .. })
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.data() {
            Some(data) => write!(f, "{} {} {}", self.http_method(), self.resource(), data),
            None => write!(f, "{} {}", self.http_method(), self.resource()),
        }
    }
}
