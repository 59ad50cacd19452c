//! Sub Item Repository
//!
//! Sub-item codes are derived from the parent master item's code plus a
//! three-digit sequence (`LEH-001`, `LEH-002`, ...). The sequence comes
//! from the highest existing suffix, so deleting a sub-item never
//! reissues its code.

use surrealdb::{RecordId, Surreal, engine::local::Db};

use shared::ItemStatus;

use super::{BaseRepository, RepoError, RepoResult, to_record_id};
use crate::db::models::{SubItem, SubItemCreate, SubItemUpdate};

const SUB_ITEM_TABLE: &str = "sub_item";
const MASTER_ITEM_TABLE: &str = "master_item";

#[derive(Clone)]
pub struct SubItemRepository {
    base: BaseRepository,
}

impl SubItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<SubItem>> {
        let items: Vec<SubItem> = self
            .base
            .db()
            .query("SELECT * FROM sub_item ORDER BY code")
            .await?
            .take(0)?;
        Ok(items)
    }

    pub async fn find_by_master(&self, master_id: &str) -> RepoResult<Vec<SubItem>> {
        let master = to_record_id(MASTER_ITEM_TABLE, master_id);
        let items: Vec<SubItem> = self
            .base
            .db()
            .query("SELECT * FROM sub_item WHERE master = $master ORDER BY code")
            .bind(("master", master.to_string()))
            .await?
            .take(0)?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<SubItem>> {
        let rid = to_record_id(SUB_ITEM_TABLE, id);
        let item: Option<SubItem> = self.base.db().select(rid).await?;
        Ok(item)
    }

    /// Fetch all sub-items in an id set (order unspecified)
    pub async fn find_by_ids(&self, ids: &[RecordId]) -> RepoResult<Vec<SubItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let items: Vec<SubItem> = self
            .base
            .db()
            .query("SELECT * FROM sub_item WHERE id INSIDE $ids")
            .bind(("ids", ids.to_vec()))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Create a sub-item under a master item, deriving its code
    pub async fn create(&self, data: SubItemCreate) -> RepoResult<SubItem> {
        let master_rid = to_record_id(MASTER_ITEM_TABLE, &data.master);
        let master: Option<crate::db::models::MasterItem> =
            self.base.db().select(master_rid.clone()).await?;
        let master = master
            .ok_or_else(|| RepoError::NotFound(format!("Master item {} not found", data.master)))?;

        let seq = self.next_code_seq(&master_rid, &master.code).await?;
        let code = format!("{}-{seq:03}", master.code);

        let now = shared::util::now_millis();
        let item = SubItem {
            id: None,
            master: master_rid,
            name: data.name,
            code,
            rent_rate: data.rent_rate,
            description: data.description,
            image: data.image,
            status: ItemStatus::Available,
            created_at: now,
            updated_at: now,
        };

        let created: Option<SubItem> = self
            .base
            .db()
            .create(SUB_ITEM_TABLE)
            .content(item)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create sub item".into()))
    }

    /// Next code sequence for a master: highest existing suffix + 1
    async fn next_code_seq(&self, master: &RecordId, master_code: &str) -> RepoResult<u32> {
        let codes: Vec<String> = self
            .base
            .db()
            .query("SELECT VALUE code FROM sub_item WHERE master = $master")
            .bind(("master", master.to_string()))
            .await?
            .take(0)?;

        let prefix = format!("{master_code}-");
        let max = codes
            .iter()
            .filter_map(|c| c.strip_prefix(&prefix))
            .filter_map(|suffix| suffix.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }

    pub async fn update(&self, id: &str, data: SubItemUpdate) -> RepoResult<SubItem> {
        let rid = to_record_id(SUB_ITEM_TABLE, id);

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.rent_rate.is_some() {
            set_parts.push("rent_rate = $rent_rate");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.image.is_some() {
            set_parts.push("image = $image");
        }
        if data.status.is_some() {
            set_parts.push("status = $status");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Sub item {id} not found")));
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
        if let Some(v) = data.rent_rate {
            query = query.bind(("rent_rate", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.image {
            query = query.bind(("image", v));
        }
        if let Some(v) = data.status {
            query = query.bind(("status", v));
        }

        let items: Vec<SubItem> = query.await?.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Sub item {id} not found")))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = to_record_id(SUB_ITEM_TABLE, id);
        let deleted: Option<SubItem> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }

    /// Bulk status update over an id set; returns the number touched
    pub async fn set_status(&self, ids: &[RecordId], status: ItemStatus) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let updated: Vec<SubItem> = self
            .base
            .db()
            .query("UPDATE sub_item SET status = $status, updated_at = $now WHERE id INSIDE $ids RETURN AFTER")
            .bind(("status", status))
            .bind(("now", shared::util::now_millis()))
            .bind(("ids", ids.to_vec()))
            .await?
            .take(0)?;
        Ok(updated.len())
    }
}
