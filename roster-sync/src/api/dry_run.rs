//! Gateway decorator that performs reads but only records writes

use std::sync::Mutex;

use async_trait::async_trait;
use log::info;
use serde_json::{Value, json};

use super::error::ApiError;
use super::gateway::{ApiResponse, Gateway};
use super::operations::Operation;
use crate::sync::email::subscriber_hash;

/// Wraps a real gateway for `--dry-run`.
///
/// GETs go through to the inner gateway. Creates and updates are recorded
/// and answered locally with the body the server would most likely return.
pub struct DryRunGateway<G> {
    inner: G,
    writes: Mutex<Vec<Operation>>,
}

impl<G: Gateway> DryRunGateway<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Writes that would have been sent, in order
    pub fn writes(&self) -> Vec<Operation> {
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, operation: &Operation) {
        self.writes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(operation.clone());
    }
}

/// Echo a create body back with the id the server would assign
fn synthesize_created(data: &Value) -> Value {
    let mut created = data.clone();
    if let Some(obj) = created.as_object_mut() {
        let email = obj
            .get("email_address")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        obj.insert("id".to_string(), Value::String(subscriber_hash(&email)));
        obj.entry("interests").or_insert_with(|| json!({}));
    }
    created
}

#[async_trait]
impl<G: Gateway> Gateway for DryRunGateway<G> {
    async fn execute(&self, operation: &Operation) -> Result<ApiResponse, ApiError> {
        match operation {
            Operation::Get { .. } => self.inner.execute(operation).await,
            Operation::Create { data, .. } => {
                info!("dry run: skipping {}", operation);
                self.record(operation);
                Ok(ApiResponse::Found(synthesize_created(data)))
            }
            Operation::Update { data, .. } => {
                info!("dry run: skipping {}", operation);
                self.record(operation);
                Ok(ApiResponse::Found(data.clone()))
            }
        }
    }
}
