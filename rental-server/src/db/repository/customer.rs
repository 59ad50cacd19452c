//! Customer Repository

use surrealdb::{RecordId, Surreal, engine::local::Db};

use super::{BaseRepository, RepoError, RepoResult, to_record_id};
use crate::db::models::{Customer, CustomerCreate, CustomerUpdate};

const CUSTOMER_TABLE: &str = "customer";

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Customer>> {
        let customers: Vec<Customer> = self
            .base
            .db()
            .query("SELECT * FROM customer ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(customers)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Customer>> {
        let rid = to_record_id(CUSTOMER_TABLE, id);
        let customer: Option<Customer> = self.base.db().select(rid).await?;
        Ok(customer)
    }

    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Customer>> {
        let customers: Vec<Customer> = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE code = $code")
            .bind(("code", code.to_string()))
            .await?
            .take(0)?;
        Ok(customers.into_iter().next())
    }

    pub async fn create(&self, data: CustomerCreate) -> RepoResult<Customer> {
        if self.find_by_code(&data.code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Customer code {} already exists",
                data.code
            )));
        }

        let now = shared::util::now_millis();
        let customer = Customer {
            id: None,
            name: data.name,
            code: data.code,
            mobile: data.mobile,
            whatsapp: data.whatsapp,
            address: data.address,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Customer> = self
            .base
            .db()
            .create(CUSTOMER_TABLE)
            .content(customer)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create customer".into()))
    }

    pub async fn update(&self, id: &str, data: CustomerUpdate) -> RepoResult<Customer> {
        let rid = to_record_id(CUSTOMER_TABLE, id);

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.code.is_some() {
            set_parts.push("code = $code");
        }
        if data.mobile.is_some() {
            set_parts.push("mobile = $mobile");
        }
        if data.whatsapp.is_some() {
            set_parts.push("whatsapp = $whatsapp");
        }
        if data.address.is_some() {
            set_parts.push("address = $address");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")));
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
        if let Some(v) = data.mobile {
            query = query.bind(("mobile", v));
        }
        if let Some(v) = data.whatsapp {
            query = query.bind(("whatsapp", v));
        }
        if let Some(v) = data.address {
            query = query.bind(("address", v));
        }

        let customers: Vec<Customer> = query.await?.take(0)?;
        customers
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))
    }

    /// Hard delete; historical invoices are left untouched
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = to_record_id(CUSTOMER_TABLE, id);
        let deleted: Option<Customer> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }

    /// Resolve a customer referenced by a financial record or invoice
    pub async fn resolve(&self, rid: &RecordId) -> RepoResult<Customer> {
        let customer: Option<Customer> = self.base.db().select(rid.clone()).await?;
        customer.ok_or_else(|| RepoError::NotFound(format!("Customer {rid} not found")))
    }
}
