//! Master Item Repository

use surrealdb::{Surreal, engine::local::Db};

use super::{BaseRepository, RepoError, RepoResult, to_record_id};
use crate::db::models::{MasterItem, MasterItemCreate, MasterItemUpdate};

const MASTER_ITEM_TABLE: &str = "master_item";

#[derive(Clone)]
pub struct MasterItemRepository {
    base: BaseRepository,
}

impl MasterItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<MasterItem>> {
        let items: Vec<MasterItem> = self
            .base
            .db()
            .query("SELECT * FROM master_item ORDER BY code")
            .await?
            .take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MasterItem>> {
        let rid = to_record_id(MASTER_ITEM_TABLE, id);
        let item: Option<MasterItem> = self.base.db().select(rid).await?;
        Ok(item)
    }

    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<MasterItem>> {
        let items: Vec<MasterItem> = self
            .base
            .db()
            .query("SELECT * FROM master_item WHERE code = $code")
            .bind(("code", code.to_string()))
            .await?
            .take(0)?;
        Ok(items.into_iter().next())
    }

    pub async fn create(&self, data: MasterItemCreate) -> RepoResult<MasterItem> {
        if self.find_by_code(&data.code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Master item code {} already exists",
                data.code
            )));
        }

        let now = shared::util::now_millis();
        let item = MasterItem {
            id: None,
            name: data.name,
            code: data.code,
            image: data.image,
            created_at: now,
            updated_at: now,
        };

        let created: Option<MasterItem> = self
            .base
            .db()
            .create(MASTER_ITEM_TABLE)
            .content(item)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create master item".into()))
    }

    pub async fn update(&self, id: &str, data: MasterItemUpdate) -> RepoResult<MasterItem> {
        let rid = to_record_id(MASTER_ITEM_TABLE, id);

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.code.is_some() {
            set_parts.push("code = $code");
        }
        if data.image.is_some() {
            set_parts.push("image = $image");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Master item {id} not found")));
        }
        set_parts.push("updated_at = $now");

        let query_str = format!("UPDATE $rid SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self
            .base
            .db()
            .query(query_str.as_str())
            .bind(("rid", rid))
            .bind(("now", shared::util::now_millis()));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.code {
            query = query.bind(("code", v));
        }
        if let Some(v) = data.image {
            query = query.bind(("image", v));
        }

        let items: Vec<MasterItem> = query.await?.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Master item {id} not found")))
    }

    /// Delete a master item; rejected while sub-items still reference it
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = to_record_id(MASTER_ITEM_TABLE, id);

        let children: Vec<String> = self
            .base
            .db()
            .query("SELECT VALUE code FROM sub_item WHERE master = $master")
            .bind(("master", rid.to_string()))
            .await?
            .take(0)?;
        if !children.is_empty() {
            return Err(RepoError::Validation(format!(
                "Master item {id} still has {} sub-items",
                children.len()
            )));
        }

        let deleted: Option<MasterItem> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }
}
