//! Account Repository

use surrealdb::{RecordId, Surreal, engine::local::Db};

use super::{BaseRepository, RepoError, RepoResult, to_record_id};
use crate::db::models::{Account, AccountCreate, AccountUpdate};

const ACCOUNT_TABLE: &str = "account";

#[derive(Clone)]
pub struct AccountRepository {
    base: BaseRepository,
}

impl AccountRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Account>> {
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("SELECT * FROM account ORDER BY name")
            .await?
            .take(0)?;
        Ok(accounts)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Account>> {
        let rid = to_record_id(ACCOUNT_TABLE, id);
        let account: Option<Account> = self.base.db().select(rid).await?;
        Ok(account)
    }

    pub async fn create(&self, data: AccountCreate) -> RepoResult<Account> {
        let now = shared::util::now_millis();
        let account = Account {
            id: None,
            name: data.name,
            account_type: data.account_type,
            balance: data.balance.unwrap_or(0.0),
            category: data.category,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Account> = self
            .base
            .db()
            .create(ACCOUNT_TABLE)
            .content(account)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create account".into()))
    }

    pub async fn update(&self, id: &str, data: AccountUpdate) -> RepoResult<Account> {
        let rid = to_record_id(ACCOUNT_TABLE, id);

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.account_type.is_some() {
            set_parts.push("account_type = $account_type");
        }
        if data.balance.is_some() {
            set_parts.push("balance = $balance");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Account {id} not found")));
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
        if let Some(v) = data.account_type {
            query = query.bind(("account_type", v));
        }
        if let Some(v) = data.balance {
            query = query.bind(("balance", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }

        let accounts: Vec<Account> = query.await?.take(0)?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Account {id} not found")))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = to_record_id(ACCOUNT_TABLE, id);
        let deleted: Option<Account> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }

    /// Resolve an account referenced by a financial record
    pub async fn resolve(&self, rid: &RecordId) -> RepoResult<Account> {
        let account: Option<Account> = self.base.db().select(rid.clone()).await?;
        account.ok_or_else(|| RepoError::NotFound(format!("Account {rid} not found")))
    }

    /// Shift an account balance by `delta` (positive for income records,
    /// negative for expense records)
    pub async fn adjust_balance(&self, rid: &RecordId, delta: f64) -> RepoResult<Account> {
        let accounts: Vec<Account> = self
            .base
            .db()
            .query("UPDATE $rid SET balance = balance + $delta, updated_at = $now RETURN AFTER")
            .bind(("rid", rid.clone()))
            .bind(("delta", delta))
            .bind(("now", shared::util::now_millis()))
            .await?
            .take(0)?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Account {rid} not found")))
    }
}
