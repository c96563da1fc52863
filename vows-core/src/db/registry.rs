use async_trait::async_trait;
use tracing::info;

use crate::db::Database;
use crate::error::{VowsError, VowsResult};
use crate::registry::{RegistryItem, RegistryKind};
use crate::store::RegistryStore;

const REGISTRY_COLUMNS: &str =
    "id, title, description, external_url, kind, sort, purchased_count";

impl Database {
    pub async fn list_registry(&self) -> VowsResult<Vec<RegistryItem>> {
        let items = sqlx::query_as::<_, RegistryItem>(&format!(
            "SELECT {REGISTRY_COLUMNS} FROM registry_items ORDER BY sort ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Insert or refresh a registry entry by id, keeping its purchase count.
    pub async fn upsert_registry_item(
        &self,
        id: &str,
        title: &str,
        description: Option<&str>,
        external_url: Option<&str>,
        kind: RegistryKind,
        sort: i64,
    ) -> VowsResult<()> {
        sqlx::query(
            "INSERT INTO registry_items (id, title, description, external_url, kind, sort) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT (id) DO UPDATE SET title = excluded.title, \
             description = excluded.description, external_url = excluded.external_url, \
             kind = excluded.kind, sort = excluded.sort",
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(external_url)
        .bind(kind)
        .bind(sort)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RegistryStore for Database {
    async fn registry_item(&self, id: &str) -> VowsResult<Option<RegistryItem>> {
        let item = sqlx::query_as::<_, RegistryItem>(&format!(
            "SELECT {REGISTRY_COLUMNS} FROM registry_items WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn record_registry_purchase(&self, id: &str) -> VowsResult<RegistryItem> {
        let item = sqlx::query_as::<_, RegistryItem>(&format!(
            "UPDATE registry_items SET purchased_count = purchased_count + 1 \
             WHERE id = ? RETURNING {REGISTRY_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| VowsError::NotFound(format!("Registry item {id}")))?;

        info!(item_id = %item.id, purchased = item.purchased_count, "Registry purchase recorded");
        Ok(item)
    }
}
