//! In-memory Mailchimp used by unit tests
//!
//! Serves the handful of endpoints the sync uses and records every executed
//! [`Operation`] so tests can count network calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::error::ApiError;
use super::gateway::{ApiResponse, Gateway};
use super::models::{Category, Interest, ListSummary, Subscriber};
use super::operations::Operation;
use crate::sync::email::subscriber_hash;

pub const LIST_ID: &str = "l1";
pub const LIST_NAME: &str = "Indian Prairie District Adults";

#[derive(Default)]
struct State {
    lists: Vec<ListSummary>,
    categories: Vec<Category>,
    interests: HashMap<String, Vec<Interest>>,
    members: HashMap<String, Subscriber>,
    calls: Vec<Operation>,
    fail_writes_with: Option<u16>,
    fail_reads_with: Option<u16>,
    fail_after_writes: Option<usize>,
}

#[derive(Clone, Default)]
pub struct FakeMailchimp {
    state: Arc<Mutex<State>>,
}

impl FakeMailchimp {
    /// One list with an "Interests" and a "Positions" category
    pub fn new() -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().unwrap();
            state.lists = vec![
                ListSummary {
                    id: "other".to_string(),
                    name: "Some Other List".to_string(),
                },
                ListSummary {
                    id: LIST_ID.to_string(),
                    name: LIST_NAME.to_string(),
                },
            ];
            state.categories = vec![
                category("c1", "Interests"),
                category("c2", "Positions"),
            ];
            state
                .interests
                .insert("c1".to_string(), vec![interest("i1", "Newsletter")]);
            state.interests.insert(
                "c2".to_string(),
                vec![
                    interest("r1", "Scoutmaster"),
                    interest("r2", "Scout"),
                    interest("r3", "Committee Member"),
                ],
            );
        }
        fake
    }

    /// Same as [`new`](Self::new) but without the "Positions" category
    pub fn without_positions() -> Self {
        let fake = Self::new();
        {
            let mut state = fake.state.lock().unwrap();
            state.categories.retain(|c| c.title != "Positions");
            state.interests.remove("c2");
        }
        fake
    }

    pub fn without_lists() -> Self {
        let fake = Self::new();
        fake.state.lock().unwrap().lists.clear();
        fake
    }

    /// Seed a member; `merge_fields` and `interests` are JSON objects
    pub fn with_member(self, email: &str, merge_fields: Value, interests: Value) -> Self {
        let id = subscriber_hash(email);
        let subscriber = Subscriber {
            id: id.clone(),
            email_address: email.to_string(),
            status: Some("subscribed".to_string()),
            merge_fields: merge_fields.as_object().cloned().unwrap_or_default(),
            interests: serde_json::from_value(interests).unwrap_or_default(),
        };
        self.state.lock().unwrap().members.insert(id, subscriber);
        self
    }

    /// Make every POST/PATCH fail with `status`
    pub fn fail_writes(self, status: u16) -> Self {
        self.state.lock().unwrap().fail_writes_with = Some(status);
        self
    }

    /// Make every later GET fail with `status`
    pub fn fail_reads(self, status: u16) -> Self {
        self.state.lock().unwrap().fail_reads_with = Some(status);
        self
    }

    /// Let `count` writes succeed, then fail every later write with 500
    pub fn fail_after_writes(self, count: usize) -> Self {
        self.state.lock().unwrap().fail_after_writes = Some(count);
        self
    }

    pub fn member(&self, email: &str) -> Option<Subscriber> {
        self.state
            .lock()
            .unwrap()
            .members
            .get(&subscriber_hash(email))
            .cloned()
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn writes(&self) -> Vec<Operation> {
        self.calls().into_iter().filter(Operation::is_write).collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes().len()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

fn category(id: &str, title: &str) -> Category {
    Category {
        id: id.to_string(),
        title: title.to_string(),
    }
}

fn interest(id: &str, title: &str) -> Interest {
    Interest {
        id: id.to_string(),
        title: title.to_string(),
    }
}

fn merge_into(target: &mut Map<String, Value>, patch: Option<&Value>) {
    if let Some(Value::Object(fields)) = patch {
        for (k, v) in fields {
            target.insert(k.clone(), v.clone());
        }
    }
}

#[async_trait]
impl Gateway for FakeMailchimp {
    async fn execute(&self, operation: &Operation) -> Result<ApiResponse, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(operation.clone());

        if operation.is_write() {
            let writes_so_far = state.calls.iter().filter(|c| c.is_write()).count();
            let over_budget = state
                .fail_after_writes
                .is_some_and(|limit| writes_so_far > limit);
            let status = state.fail_writes_with.or(over_budget.then_some(500));
            if let Some(status) = status {
                return Err(ApiError::Status {
                    method: operation.http_method(),
                    resource: operation.resource().to_string(),
                    status,
                });
            }
        }

        if let (false, Some(status)) = (operation.is_write(), state.fail_reads_with) {
            return Err(ApiError::Status {
                method: operation.http_method(),
                resource: operation.resource().to_string(),
                status,
            });
        }

        let path: Vec<&str> = operation.resource().split('/').collect();

        let response = match (operation, path.as_slice()) {
            (Operation::Get { .. }, ["lists"]) => ApiResponse::Found(json!({
                "lists": state.lists,
                "total_items": state.lists.len(),
            })),
            (Operation::Get { .. }, ["lists", _, "interest-categories"]) => {
                ApiResponse::Found(json!({
                    "categories": state.categories,
                    "total_items": state.categories.len(),
                }))
            }
            (Operation::Get { .. }, ["lists", _, "interest-categories", cid, "interests"]) => {
                match state.interests.get(*cid) {
                    Some(list) => {
                        let interests: Vec<Value> = list
                            .iter()
                            .map(|i| json!({"id": i.id, "name": i.title}))
                            .collect();
                        ApiResponse::Found(json!({
                            "interests": interests,
                            "total_items": list.len(),
                        }))
                    }
                    None => ApiResponse::NotFound,
                }
            }
            (Operation::Get { .. }, ["lists", _, "members", hash]) => {
                match state.members.get(*hash) {
                    Some(member) => ApiResponse::Found(json!(member)),
                    None => ApiResponse::NotFound,
                }
            }
            (Operation::Create { data, .. }, ["lists", _, "members"]) => {
                let email = data["email_address"].as_str().unwrap_or_default().to_string();
                let id = subscriber_hash(&email);
                let mut subscriber = Subscriber {
                    id: id.clone(),
                    email_address: email,
                    status: data["status"].as_str().map(str::to_string),
                    merge_fields: Map::new(),
                    interests: HashMap::new(),
                };
                merge_into(&mut subscriber.merge_fields, data.get("merge_fields"));
                state.members.insert(id, subscriber.clone());
                ApiResponse::Found(json!(subscriber))
            }
            (Operation::Update { data, .. }, ["lists", _, "members", id]) => {
                match state.members.get_mut(*id) {
                    Some(member) => {
                        merge_into(&mut member.merge_fields, data.get("merge_fields"));
                        if let Some(Value::Object(flags)) = data.get("interests") {
                            for (k, v) in flags {
                                member
                                    .interests
                                    .insert(k.clone(), v.as_bool().unwrap_or(false));
                            }
                        }
                        ApiResponse::Found(json!(member))
                    }
                    None => ApiResponse::NotFound,
                }
            }
            _ => ApiResponse::NotFound,
        };

        Ok(response)
    }
}
