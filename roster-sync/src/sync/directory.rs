//! Read-only snapshot of the target list and its interest groups
//!
//! Built once before any row is processed and passed by reference to the
//! resolver and reconciler. Never refreshed during a run.

use std::collections::HashMap;

use log::{info, warn};

use super::error::SyncError;
use crate::api::{
    Category, CategoryCollection, Gateway, Interest, InterestCollection, ListCollection,
};

#[derive(Debug, Clone)]
pub struct Directory {
    list_id: String,
    list_name: String,
    categories: Vec<Category>,
    /// Interests keyed by category title
    interests: HashMap<String, Vec<Interest>>,
    rank_category: String,
}

/// Collections are fetched as a single page; say so when that loses items
fn warn_if_truncated(resource: &str, returned: usize, total: Option<u64>) {
    if let Some(total) = total {
        if total > returned as u64 {
            warn!(
                "{} returned {} of {} items; only the first page is used",
                resource, returned, total
            );
        }
    }
}

impl Directory {
    /// Resolve `list_name` and cache the interests of each named category.
    ///
    /// `rank_category` is always loaded, even when not listed in
    /// `interest_categories`.
    pub async fn load(
        gateway: &dyn Gateway,
        list_name: &str,
        interest_categories: &[String],
        rank_category: &str,
    ) -> Result<Self, SyncError> {
        let lists: ListCollection = gateway
            .get("lists")
            .await?
            .decode("lists")?
            .ok_or_else(|| SyncError::ListNotFound(list_name.to_string()))?;
        warn_if_truncated("lists", lists.lists.len(), lists.total_items);

        let list = lists
            .lists
            .into_iter()
            .find(|l| l.name == list_name)
            .ok_or_else(|| SyncError::ListNotFound(list_name.to_string()))?;
        info!("Using list '{}' ({})", list.name, list.id);

        let resource = format!("lists/{}/interest-categories", list.id);
        let categories = gateway
            .get(&resource)
            .await?
            .decode::<CategoryCollection>(&resource)?
            .map(|c| {
                warn_if_truncated(&resource, c.categories.len(), c.total_items);
                c.categories
            })
            .unwrap_or_default();

        let mut directory = Directory {
            list_id: list.id,
            list_name: list.name,
            categories,
            interests: HashMap::new(),
            rank_category: rank_category.to_string(),
        };

        let mut wanted: Vec<&str> = interest_categories.iter().map(String::as_str).collect();
        if !wanted.contains(&rank_category) {
            wanted.push(rank_category);
        }

        for title in wanted {
            let interests = directory.fetch_interests(gateway, title).await?;
            info!("Loaded {} {}", interests.len(), title);
            directory.interests.insert(title.to_string(), interests);
        }

        Ok(directory)
    }

    async fn fetch_interests(
        &self,
        gateway: &dyn Gateway,
        category_title: &str,
    ) -> Result<Vec<Interest>, SyncError> {
        let category = self
            .category(category_title)
            .ok_or_else(|| SyncError::CategoryNotFound(category_title.to_string()))?;

        let resource = format!(
            "lists/{}/interest-categories/{}/interests",
            self.list_id, category.id
        );

        let collection = gateway
            .get(&resource)
            .await?
            .decode::<InterestCollection>(&resource)?
            .ok_or_else(|| SyncError::CategoryNotFound(category_title.to_string()))?;
        warn_if_truncated(&resource, collection.interests.len(), collection.total_items);

        Ok(collection.interests)
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn list_name(&self) -> &str {
        &self.list_name
    }

    pub fn category(&self, title: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.title == title)
    }

    /// Cached interests of a loaded category
    pub fn interests(&self, category_title: &str) -> Option<&[Interest]> {
        self.interests.get(category_title).map(Vec::as_slice)
    }

    /// Look up a rank title in the rank category
    pub fn rank(&self, title: &str) -> Result<&Interest, SyncError> {
        let wanted = title.trim();
        self.interests(&self.rank_category)
            .and_then(|ranks| ranks.iter().find(|r| r.title == wanted))
            .ok_or_else(|| SyncError::UnknownRank(title.to_string()))
    }

    /// Collection path for creating members
    pub fn members_resource(&self) -> String {
        format!("lists/{}/members", self.list_id)
    }

    /// Path of a single member, by id or email hash
    pub fn member_resource(&self, member_id: &str) -> String {
        format!("lists/{}/members/{}", self.list_id, member_id)
    }
}
