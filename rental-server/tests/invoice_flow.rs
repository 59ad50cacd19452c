//! Save-and-reconcile flow integration tests (in-memory engine)

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use surrealdb::RecordId;

use rental_server::core::{Config, ServerState};
use rental_server::db::models::{
    AccountCreate, CustomerCreate, FinancialCreate, FinancialKind, InvoiceDraft, InvoiceItemInput,
    InvoiceUpdate, MasterItemCreate, ReceiptInput, SubItem, SubItemCreate,
};
use rental_server::db::repository::{
    AccountRepository, CustomerRepository, FinancialRepository, InvoiceRepository, RepoError,
    RepoResult, SubItemRepository,
};
use rental_server::services::{AvailabilityService, InvoiceFlow, Notifier, StatusSync};
use rental_server::utils::AppError;
use shared::{
    DeliveryStatus, EntityRef, ItemStatus, PaymentMethod, PaymentStatus, TransactionType,
};

async fn test_state() -> ServerState {
    ServerState::initialize(&Config::in_memory()).await
}

async fn seed_customer(state: &ServerState) -> String {
    let customer = CustomerRepository::new(state.get_db())
        .create(CustomerCreate {
            name: "Asha Verma".to_string(),
            code: "CUST-01".to_string(),
            mobile: "9876500001".to_string(),
            whatsapp: None,
            address: None,
        })
        .await
        .unwrap();
    customer.id.unwrap().to_string()
}

/// Seed one master item with `rates.len()` sub-items and return them
async fn seed_sub_items(state: &ServerState, master_code: &str, rates: &[f64]) -> Vec<SubItem> {
    let master = rental_server::db::repository::MasterItemRepository::new(state.get_db())
        .create(MasterItemCreate {
            name: format!("Master {master_code}"),
            code: master_code.to_string(),
            image: None,
        })
        .await
        .unwrap();
    let master_id = master.id.unwrap().to_string();

    let repo = SubItemRepository::new(state.get_db());
    let mut items = Vec::new();
    for (i, rate) in rates.iter().enumerate() {
        let item = repo
            .create(SubItemCreate {
                master: master_id.clone(),
                name: format!("{master_code} piece {}", i + 1),
                rent_rate: *rate,
                description: None,
                image: None,
            })
            .await
            .unwrap();
        items.push(item);
    }
    items
}

fn item_input(item: &SubItem) -> InvoiceItemInput {
    InvoiceItemInput {
        sub_item: item.id.clone().unwrap().to_string(),
        name: None,
        category: None,
        rent_rate: None,
        measurements: Vec::new(),
    }
}

fn draft(customer: &str, items: Vec<InvoiceItemInput>, receipts: Vec<ReceiptInput>) -> InvoiceDraft {
    InvoiceDraft {
        invoice_number: None,
        customer: customer.to_string(),
        items,
        total_amount: None,
        delivery_date: None,
        wedding_date: None,
        status: None,
        receipts,
    }
}

fn receipt(amount: f64) -> ReceiptInput {
    ReceiptInput {
        amount,
        method: PaymentMethod::Cash,
        date: None,
        note: None,
    }
}

// ========================================================================
// Create path
// ========================================================================

#[tokio::test]
async fn fully_paid_invoice_is_completed_and_advances_the_serial() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "LEH", &[500.0]).await;

    // Three invoices already on file so the next number is INV004
    for _ in 0..3 {
        state
            .invoice_flow
            .create_invoice(draft(&customer, vec![item_input(&items[0])], vec![]))
            .await
            .unwrap();
    }

    let created = state
        .invoice_flow
        .create_invoice(draft(
            &customer,
            vec![item_input(&items[0])],
            vec![receipt(500.0)],
        ))
        .await
        .unwrap();

    assert_eq!(created.invoice.invoice_number, "INV004");
    assert_eq!(created.invoice.payment_status, PaymentStatus::Completed);
    assert_eq!(created.invoice.total_amount, 500.0);
    assert_eq!(created.invoice.advance_amount, 500.0);
    assert_eq!(created.invoice.balance_amount, 0.0);
    assert_eq!(created.invoice.receipts.len(), 1);
    assert!(created.receipt_errors.is_empty());
    assert_eq!(created.next_invoice_number, "INV005");

    // Balance invariant holds against the stored receipts
    let receipts = FinancialRepository::new(state.get_db())
        .find_all(FinancialKind::Receipt)
        .await
        .unwrap();
    let paid: f64 = receipts.iter().map(|r| r.amount).sum();
    assert_eq!(
        created.invoice.balance_amount,
        created.invoice.total_amount - paid
    );
}

#[tokio::test]
async fn invoice_without_receipts_is_pending_with_full_balance() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "SHW", &[1000.0]).await;

    let created = state
        .invoice_flow
        .create_invoice(draft(&customer, vec![item_input(&items[0])], vec![]))
        .await
        .unwrap();

    assert_eq!(created.invoice.payment_status, PaymentStatus::Pending);
    assert_eq!(created.invoice.balance_amount, 1000.0);
    assert_eq!(created.invoice.advance_amount, 0.0);
    assert!(created.invoice.receipts.is_empty());
}

#[tokio::test]
async fn partial_receipt_payment_is_partial() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "KUR", &[1500.0]).await;

    let created = state
        .invoice_flow
        .create_invoice(draft(
            &customer,
            vec![item_input(&items[0])],
            vec![receipt(400.0), receipt(100.0)],
        ))
        .await
        .unwrap();

    assert_eq!(created.invoice.payment_status, PaymentStatus::Partial);
    assert_eq!(created.invoice.advance_amount, 500.0);
    assert_eq!(created.invoice.balance_amount, 1000.0);
    assert_eq!(created.receipts.len(), 2);
    assert_eq!(created.receipts[0].serial_number, "R001");
    assert_eq!(created.receipts[1].serial_number, "R002");
}

#[tokio::test]
async fn invoice_creation_marks_items_rented_in_both_stores() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "LEH", &[700.0, 900.0]).await;

    let created = state
        .invoice_flow
        .create_invoice(draft(
            &customer,
            vec![item_input(&items[0]), item_input(&items[1])],
            vec![],
        ))
        .await
        .unwrap();

    let sub_items = SubItemRepository::new(state.get_db());
    for item in &items {
        let stored = sub_items
            .find_by_id(&item.id.clone().unwrap().to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ItemStatus::Rented);
    }

    let stored_invoice = InvoiceRepository::new(state.get_db())
        .find_by_number(&created.invoice.invoice_number)
        .await
        .unwrap()
        .unwrap();
    assert!(
        stored_invoice
            .items
            .iter()
            .all(|line| line.status == ItemStatus::Rented)
    );
    assert!(
        stored_invoice
            .items
            .iter()
            .all(|line| line.delivery_status == DeliveryStatus::Pending)
    );
}

// ========================================================================
// Compensation
// ========================================================================

#[tokio::test]
async fn failed_invoice_save_rolls_back_created_receipts() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "LEH", &[500.0]).await;

    state
        .invoice_flow
        .create_invoice(draft(&customer, vec![item_input(&items[0])], vec![]))
        .await
        .unwrap();

    // Client echoes a number that is already taken: receipts get
    // created first, the invoice save conflicts, the receipts go away.
    let mut dup = draft(&customer, vec![item_input(&items[0])], vec![receipt(250.0)]);
    dup.invoice_number = Some("INV001".to_string());

    let err = state.invoice_flow.create_invoice(dup).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    let receipts = FinancialRepository::new(state.get_db())
        .find_all(FinancialKind::Receipt)
        .await
        .unwrap();
    assert!(receipts.is_empty(), "rollback left receipts behind");

    let invoices = InvoiceRepository::new(state.get_db())
        .find_all()
        .await
        .unwrap();
    assert_eq!(invoices.len(), 1);
}

struct FailingSync;

#[async_trait]
impl StatusSync for FailingSync {
    async fn set_item_status(&self, _ids: &[RecordId], _status: ItemStatus) -> RepoResult<usize> {
        Err(RepoError::Database("status sync unavailable".into()))
    }

    async fn set_delivery_status(
        &self,
        _invoice_id: &RecordId,
        _ids: &[RecordId],
        _status: DeliveryStatus,
    ) -> RepoResult<usize> {
        Err(RepoError::Database("status sync unavailable".into()))
    }
}

#[derive(Default)]
struct CollectingNotifier(Mutex<Vec<String>>);

impl Notifier for CollectingNotifier {
    fn info(&self, _message: &str) {}

    fn error(&self, message: &str) {
        self.0.lock().unwrap().push(format!("error: {message}"));
    }

    fn critical(&self, message: &str) {
        self.0.lock().unwrap().push(format!("critical: {message}"));
    }
}

#[tokio::test]
async fn failed_status_sync_deletes_invoice_but_keeps_receipts() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "LEH", &[500.0]).await;

    let notifier = Arc::new(CollectingNotifier::default());
    let flow = InvoiceFlow::new(
        state.get_db(),
        AvailabilityService::new(state.get_db(), true),
        Arc::new(FailingSync),
        notifier.clone(),
    );

    let err = flow
        .create_invoice(draft(&customer, vec![item_input(&items[0])], vec![receipt(200.0)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(_)), "got {err:?}");

    // The invoice is compensated away...
    let invoices = InvoiceRepository::new(state.get_db())
        .find_all()
        .await
        .unwrap();
    assert!(invoices.is_empty());

    // ...while the receipts from the same attempt survive. That window
    // is part of the contract.
    let receipts = FinancialRepository::new(state.get_db())
        .find_all(FinancialKind::Receipt)
        .await
        .unwrap();
    assert_eq!(receipts.len(), 1);

    let messages = notifier.0.lock().unwrap();
    assert!(messages.iter().any(|m| m.starts_with("error:")));
}

// ========================================================================
// Edit path
// ========================================================================

#[tokio::test]
async fn editing_items_syncs_removed_and_added_statuses() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "LEH", &[100.0, 200.0, 300.0]).await;
    let (a, b, c) = (&items[0], &items[1], &items[2]);

    let created = state
        .invoice_flow
        .create_invoice(draft(
            &customer,
            vec![item_input(a), item_input(b)],
            vec![],
        ))
        .await
        .unwrap();

    // {A, B} -> {B, C}
    let updated = state
        .invoice_flow
        .update_invoice(
            &created.invoice.invoice_number,
            InvoiceUpdate {
                items: Some(vec![item_input(b), item_input(c)]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let sub_items = SubItemRepository::new(state.get_db());
    let status_of = |item: &SubItem| {
        let id = item.id.clone().unwrap().to_string();
        let repo = sub_items.clone();
        async move { repo.find_by_id(&id).await.unwrap().unwrap().status }
    };

    assert_eq!(status_of(a).await, ItemStatus::Available);
    assert_eq!(status_of(b).await, ItemStatus::Rented);
    assert_eq!(status_of(c).await, ItemStatus::Rented);

    // Total follows the new item rates, balance stays consistent
    assert_eq!(updated.total_amount, 500.0);
    assert_eq!(updated.balance_amount, 500.0);
    assert_eq!(updated.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn retained_lines_keep_their_delivery_state_across_edits() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "LEH", &[100.0, 200.0]).await;
    let (a, b) = (&items[0], &items[1]);

    let created = state
        .invoice_flow
        .create_invoice(draft(&customer, vec![item_input(a)], vec![]))
        .await
        .unwrap();
    let number = created.invoice.invoice_number.clone();

    // A is delivered, then B joins the invoice
    let a_id = vec![a.id.clone().unwrap()];
    state
        .invoice_flow
        .set_delivery_status(&number, &a_id, DeliveryStatus::Delivered)
        .await
        .unwrap();

    let updated = state
        .invoice_flow
        .update_invoice(
            &number,
            InvoiceUpdate {
                items: Some(vec![item_input(a), item_input(b)]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let line_a = updated
        .items
        .iter()
        .find(|line| line.sub_item == *a.id.as_ref().unwrap())
        .unwrap();
    let line_b = updated
        .items
        .iter()
        .find(|line| line.sub_item == *b.id.as_ref().unwrap())
        .unwrap();
    assert_eq!(line_a.delivery_status, DeliveryStatus::Delivered);
    assert_eq!(line_b.delivery_status, DeliveryStatus::Pending);
}

// ========================================================================
// Returns and delivery state
// ========================================================================

#[tokio::test]
async fn returning_items_marks_both_stores_available() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "LEH", &[500.0]).await;
    let a = &items[0];

    let created = state
        .invoice_flow
        .create_invoice(draft(&customer, vec![item_input(a)], vec![]))
        .await
        .unwrap();

    let ids = vec![a.id.clone().unwrap()];
    state.invoice_flow.return_items(&ids).await.unwrap();

    let stored = SubItemRepository::new(state.get_db())
        .find_by_id(&a.id.clone().unwrap().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ItemStatus::Available);

    let stored_invoice = InvoiceRepository::new(state.get_db())
        .find_by_number(&created.invoice.invoice_number)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_invoice.items[0].status, ItemStatus::Available);
}

#[tokio::test]
async fn delivery_status_change_leaves_sub_item_untouched() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "LEH", &[500.0]).await;
    let a = &items[0];

    let created = state
        .invoice_flow
        .create_invoice(draft(&customer, vec![item_input(a)], vec![]))
        .await
        .unwrap();

    let ids = vec![a.id.clone().unwrap()];
    let touched = state
        .invoice_flow
        .set_delivery_status(&created.invoice.invoice_number, &ids, DeliveryStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(touched, 1);

    let stored_invoice = InvoiceRepository::new(state.get_db())
        .find_by_number(&created.invoice.invoice_number)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        stored_invoice.items[0].delivery_status,
        DeliveryStatus::Delivered
    );

    // The sub-item document keeps its rental status
    let stored = SubItemRepository::new(state.get_db())
        .find_by_id(&a.id.clone().unwrap().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ItemStatus::Rented);
}

// ========================================================================
// Validation and policy
// ========================================================================

#[tokio::test]
async fn missing_sub_items_are_rejected_before_any_write() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;

    let missing = InvoiceItemInput {
        sub_item: "sub_item:doesnotexist".to_string(),
        name: None,
        category: None,
        rent_rate: None,
        measurements: Vec::new(),
    };
    let err = state
        .invoice_flow
        .create_invoice(draft(&customer, vec![missing], vec![receipt(100.0)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    // Nothing was written, receipts included
    let receipts = FinancialRepository::new(state.get_db())
        .find_all(FinancialKind::Receipt)
        .await
        .unwrap();
    assert!(receipts.is_empty());
}

#[tokio::test]
async fn double_booking_is_permitted_by_default() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "LEH", &[500.0]).await;

    state
        .invoice_flow
        .create_invoice(draft(&customer, vec![item_input(&items[0])], vec![]))
        .await
        .unwrap();

    // Same item again on a second invoice: accepted under the default policy
    let second = state
        .invoice_flow
        .create_invoice(draft(&customer, vec![item_input(&items[0])], vec![]))
        .await;
    assert!(second.is_ok());
}

#[tokio::test]
async fn double_booking_can_be_disallowed_by_policy() {
    let mut config = Config::in_memory();
    config.allow_double_booking = false;
    let state = ServerState::initialize(&config).await;

    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "LEH", &[500.0]).await;

    state
        .invoice_flow
        .create_invoice(draft(&customer, vec![item_input(&items[0])], vec![]))
        .await
        .unwrap();

    let err = state
        .invoice_flow
        .create_invoice(draft(&customer, vec![item_input(&items[0])], vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)), "got {err:?}");
}

#[tokio::test]
async fn editing_keeps_own_rented_items_under_strict_policy() {
    let mut config = Config::in_memory();
    config.allow_double_booking = false;
    let state = ServerState::initialize(&config).await;

    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "LEH", &[100.0, 200.0]).await;
    let (a, b) = (&items[0], &items[1]);

    let created = state
        .invoice_flow
        .create_invoice(draft(&customer, vec![item_input(a)], vec![]))
        .await
        .unwrap();

    // Keeping A (already rented by this very invoice) and adding B is fine
    let updated = state
        .invoice_flow
        .update_invoice(
            &created.invoice.invoice_number,
            InvoiceUpdate {
                items: Some(vec![item_input(a), item_input(b)]),
                ..Default::default()
            },
        )
        .await;
    assert!(updated.is_ok(), "got {updated:?}");
}

// ========================================================================
// Financial batches and serials
// ========================================================================

#[tokio::test]
async fn receipt_batch_commits_successes_and_collects_errors() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;

    let entry = |amount: f64| FinancialCreate {
        entity: EntityRef::Customer(customer.clone()),
        related_invoice: None,
        transaction_type: TransactionType::Income,
        amount,
        method: PaymentMethod::Cash,
        date: None,
        note: None,
        source_page: Some("receipts".to_string()),
    };

    let outcome = state
        .invoice_flow
        .create_financial_batch(
            FinancialKind::Receipt,
            vec![entry(100.0), entry(-50.0), entry(200.0)],
        )
        .await
        .unwrap();

    assert_eq!(outcome.created.len(), 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].index, 1);

    let stored = FinancialRepository::new(state.get_db())
        .find_all(FinancialKind::Receipt)
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn serial_collision_is_an_error_not_a_crash() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let repo = FinancialRepository::new(state.get_db());

    let record = |serial: &str| rental_server::db::models::FinancialRecord {
        id: None,
        entity: EntityRef::Customer(customer.clone()),
        related_invoice: None,
        transaction_type: TransactionType::Income,
        serial_number: serial.to_string(),
        amount: 100.0,
        method: PaymentMethod::Cash,
        date: "2026-08-05".to_string(),
        note: None,
        source_page: None,
        created_at: 0,
    };

    repo.create(FinancialKind::Payment, record("P001"))
        .await
        .unwrap();

    // Two racing creators computed the same candidate: the second is
    // detected and rejected, nothing panics, nothing retries.
    let err = repo
        .create(FinancialKind::Payment, record("P001"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");
}

#[tokio::test]
async fn financial_serials_count_per_collection() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;

    let entry = FinancialCreate {
        entity: EntityRef::Customer(customer.clone()),
        related_invoice: None,
        transaction_type: TransactionType::Income,
        amount: 100.0,
        method: PaymentMethod::Upi,
        date: None,
        note: None,
        source_page: None,
    };

    let receipts = state
        .invoice_flow
        .create_financial_batch(FinancialKind::Receipt, vec![entry.clone(), entry.clone()])
        .await
        .unwrap();
    let payments = state
        .invoice_flow
        .create_financial_batch(FinancialKind::Payment, vec![entry.clone()])
        .await
        .unwrap();

    assert_eq!(receipts.created[0].serial_number, "R001");
    assert_eq!(receipts.created[1].serial_number, "R002");
    // Payment numbering is independent of receipts
    assert_eq!(payments.created[0].serial_number, "P001");
}

#[tokio::test]
async fn account_records_shift_the_balance() {
    let state = test_state().await;
    let accounts = AccountRepository::new(state.get_db());
    let account = accounts
        .create(AccountCreate {
            name: "Shop float".to_string(),
            account_type: shared::AccountType::Asset,
            balance: Some(1000.0),
            category: None,
        })
        .await
        .unwrap();
    let account_id = account.id.unwrap().to_string();

    let entry = |transaction_type: TransactionType, amount: f64| FinancialCreate {
        entity: EntityRef::Account(account_id.clone()),
        related_invoice: None,
        transaction_type,
        amount,
        method: PaymentMethod::BankTransfer,
        date: None,
        note: None,
        source_page: Some("accounts".to_string()),
    };

    state
        .invoice_flow
        .create_financial_batch(
            FinancialKind::Transaction,
            vec![entry(TransactionType::Income, 500.0)],
        )
        .await
        .unwrap();
    state
        .invoice_flow
        .create_financial_batch(
            FinancialKind::Transaction,
            vec![entry(TransactionType::Expense, 200.0)],
        )
        .await
        .unwrap();

    let stored = accounts.find_by_id(&account_id).await.unwrap().unwrap();
    assert_eq!(stored.balance, 1300.0);
}

// ========================================================================
// Deletion
// ========================================================================

#[tokio::test]
async fn deleting_an_invoice_releases_its_items() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;
    let items = seed_sub_items(&state, "LEH", &[500.0]).await;
    let a = &items[0];

    let created = state
        .invoice_flow
        .create_invoice(draft(&customer, vec![item_input(a)], vec![]))
        .await
        .unwrap();

    let deleted = state
        .invoice_flow
        .delete_invoice(&created.invoice.invoice_number)
        .await
        .unwrap();
    assert!(deleted);

    let stored = SubItemRepository::new(state.get_db())
        .find_by_id(&a.id.clone().unwrap().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ItemStatus::Available);
}

#[tokio::test]
async fn bulk_payment_delete_removes_only_the_listed_ids() {
    let state = test_state().await;
    let customer = seed_customer(&state).await;

    let entry = FinancialCreate {
        entity: EntityRef::Customer(customer.clone()),
        related_invoice: None,
        transaction_type: TransactionType::Expense,
        amount: 100.0,
        method: PaymentMethod::Card,
        date: None,
        note: None,
        source_page: None,
    };
    let outcome = state
        .invoice_flow
        .create_financial_batch(
            FinancialKind::Payment,
            vec![entry.clone(), entry.clone(), entry.clone()],
        )
        .await
        .unwrap();
    assert_eq!(outcome.created.len(), 3);

    let victim = outcome.created[0].id.clone().unwrap().to_string();
    let removed = state
        .invoice_flow
        .delete_financial(FinancialKind::Payment, &[victim])
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let remaining = FinancialRepository::new(state.get_db())
        .find_all(FinancialKind::Payment)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 2);
}
