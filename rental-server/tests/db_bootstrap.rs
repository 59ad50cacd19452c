//! Database bootstrap against the on-disk engine

use rental_server::db::DbService;
use rental_server::db::models::CustomerCreate;
use rental_server::db::repository::CustomerRepository;

#[tokio::test]
async fn opens_rocksdb_at_a_path_and_persists_documents() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("shop.db");

    let service = DbService::new(&db_path.to_string_lossy()).await.unwrap();

    let repo = CustomerRepository::new(service.db.clone());
    let created = repo
        .create(CustomerCreate {
            name: "Asha Verma".to_string(),
            code: "CUST-01".to_string(),
            mobile: "9876500001".to_string(),
            whatsapp: None,
            address: None,
        })
        .await
        .unwrap();

    let fetched = repo
        .find_by_id(&created.id.unwrap().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.code, "CUST-01");

    // The schema pass is idempotent across reconnects
    drop(repo);
    drop(service);
    let service = DbService::new(&db_path.to_string_lossy()).await.unwrap();
    let repo = CustomerRepository::new(service.db.clone());
    assert_eq!(repo.find_all().await.unwrap().len(), 1);
}
