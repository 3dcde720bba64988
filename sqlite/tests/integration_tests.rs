//! Integration tests for the dashboard-sqlite crate.

use std::io::Write;
use std::path::{Path, PathBuf};

use dashboard_core::{
    Classification, Dataset, FieldValue, Incident, IncidentStatus, Priority, Row, Severity,
    Ticket, TicketStatus, ValidationError,
};
use dashboard_data::DashboardConfig;
use dashboard_sqlite::{Crud, Store, StoreError, seed_from_csv};

/// Opens a fresh store in a temp directory.
fn setup_store() -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("dashboard.db")).unwrap();
    (dir, store)
}

fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
    path
}

fn sample_incidents() -> Vec<Incident> {
    vec![
        Incident::new("INC-1", "Phishing wave", "Phishing", Severity::High, "2024-01-01")
            .with_assignee("alice"),
        Incident::new("INC-2", "Port scan", "Recon", Severity::Low, "2024-01-02")
            .with_status(IncidentStatus::Closed),
        Incident::new("INC-3", "Ransomware", "Malware", Severity::Critical, "2024-01-03")
            .with_status(IncidentStatus::InProgress)
            .with_description("Finance share encrypted"),
    ]
}

// =============================================================================
// CRUD properties
// =============================================================================

#[test]
fn test_insert_then_fetch_equals_every_column() {
    let (_dir, store) = setup_store();
    let provider = store.provider();

    let incident = sample_incidents().remove(2);
    Crud::<Incident>::new(provider).insert(&incident).unwrap();
    assert_eq!(
        Crud::<Incident>::new(provider).fetch_by_id("INC-3").unwrap(),
        Some(incident)
    );

    let dataset = Dataset::new("DS-1", "Customer master", "data-team", Classification::Restricted)
        .with_description("CRM export")
        .with_size(512.25, 120_000);
    Crud::<Dataset>::new(provider).insert(&dataset).unwrap();
    assert_eq!(
        Crud::<Dataset>::new(provider).fetch_by_id("DS-1").unwrap(),
        Some(dataset)
    );

    let ticket = Ticket::new("T-1", "VPN down", Priority::Urgent, "Network", "2024-02-02")
        .with_assignee("helpdesk");
    Crud::<Ticket>::new(provider).insert(&ticket).unwrap();
    assert_eq!(
        Crud::<Ticket>::new(provider).fetch_by_id("T-1").unwrap(),
        Some(ticket)
    );
}

#[test]
fn test_delete_twice_reports_presence() {
    let (_dir, store) = setup_store();
    let tickets = store.tickets();
    tickets
        .create(&Ticket::new("T-1", "Printer", Priority::Low, "Hardware", "2024-02-01"))
        .unwrap();

    assert!(tickets.delete("T-1").unwrap());
    assert!(!tickets.delete("T-1").unwrap());
    assert!(!tickets.delete("T-never").unwrap());
}

#[test]
fn test_update_missing_leaves_table_unchanged() {
    let (_dir, store) = setup_store();
    let incidents = store.incidents();
    for incident in sample_incidents() {
        incidents.create(&incident).unwrap();
    }
    let before = incidents.list().unwrap();

    let err = incidents
        .update_status("INC-404", IncidentStatus::Closed)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { ref key, .. } if key == "INC-404"));

    assert_eq!(incidents.list().unwrap(), before);
    assert_eq!(store.status().unwrap().incident_count, 3);
}

#[test]
fn test_update_rejects_unknown_and_key_columns() {
    let (_dir, store) = setup_store();
    let datasets = store.datasets();
    datasets
        .create(&Dataset::new("DS-1", "Logs", "ops", Classification::Internal))
        .unwrap();

    let typo = Row::from([("ownr".to_string(), FieldValue::from("eve"))]);
    assert!(matches!(
        datasets.update("DS-1", typo),
        Err(StoreError::Validation(ValidationError::UnknownField { .. }))
    ));

    let rekey = Row::from([("dataset_id".to_string(), FieldValue::from("DS-2"))]);
    assert!(matches!(
        datasets.update("DS-1", rekey),
        Err(StoreError::Validation(ValidationError::ImmutableField { .. }))
    ));

    let bad_label = Row::from([("classification".to_string(), FieldValue::from("top-secret"))]);
    assert!(matches!(
        datasets.update("DS-1", bad_label),
        Err(StoreError::Validation(ValidationError::InvalidChoice { .. }))
    ));

    assert_eq!(datasets.get("DS-1").unwrap().unwrap().owner, "ops");
}

// =============================================================================
// Domain services
// =============================================================================

#[test]
fn test_incident_filters_and_breakdown() {
    let (_dir, store) = setup_store();
    let incidents = store.incidents();
    for incident in sample_incidents() {
        incidents.create(&incident).unwrap();
    }

    let open: Vec<_> = incidents
        .list_open()
        .unwrap()
        .into_iter()
        .map(|i| i.incident_id)
        .collect();
    assert_eq!(open, ["INC-1", "INC-3"]);

    assert_eq!(incidents.list_by_status(IncidentStatus::Closed).unwrap().len(), 1);
    assert_eq!(incidents.list_by_severity(Severity::Critical).unwrap().len(), 1);

    let updated = incidents.update_severity("INC-2", Severity::Medium).unwrap();
    assert_eq!(updated.severity, Severity::Medium);

    let breakdown = incidents.severity_breakdown().unwrap();
    assert_eq!(breakdown[&Severity::Low], 0);
    assert_eq!(breakdown[&Severity::Medium], 1);
    assert_eq!(breakdown[&Severity::High], 1);
    assert_eq!(breakdown[&Severity::Critical], 1);
}

#[test]
fn test_ticket_filters() {
    let (_dir, store) = setup_store();
    let tickets = store.tickets();
    tickets
        .create(&Ticket::new("T-1", "Reset password", Priority::Low, "Accounts", "2024-02-01"))
        .unwrap();
    tickets
        .create(
            &Ticket::new("T-2", "VPN outage", Priority::Urgent, "Network", "2024-02-02")
                .with_status(TicketStatus::InProgress),
        )
        .unwrap();
    tickets
        .create(
            &Ticket::new("T-3", "New laptop", Priority::Medium, "Hardware", "2024-02-03")
                .with_status(TicketStatus::Resolved),
        )
        .unwrap();

    assert_eq!(tickets.list_open().unwrap().len(), 2);
    assert_eq!(tickets.list_by_priority(Priority::Urgent).unwrap()[0].ticket_id, "T-2");

    tickets.update_status("T-1", TicketStatus::Closed).unwrap();
    tickets.update_priority("T-3", Priority::High).unwrap();
    assert_eq!(tickets.list_open().unwrap().len(), 1);
    assert_eq!(tickets.list_by_status(TicketStatus::Closed).unwrap().len(), 1);
    assert_eq!(tickets.get("T-3").unwrap().unwrap().priority, Priority::High);
}

#[test]
fn test_dataset_owner_operations() {
    let (_dir, store) = setup_store();
    let datasets = store.datasets();
    datasets
        .create(&Dataset::new("DS-1", "Logs", "ops", Classification::Internal))
        .unwrap();
    datasets
        .create(&Dataset::new("DS-2", "Payroll", "hr", Classification::Confidential))
        .unwrap();

    datasets.update_owner("DS-1", "security").unwrap();
    assert_eq!(datasets.list_by_owner("SECURITY").unwrap().len(), 1);
    assert!(datasets.list_by_owner("ops").unwrap().is_empty());
    assert_eq!(
        datasets
            .list_by_classification(Classification::Confidential)
            .unwrap()[0]
            .dataset_id,
        "DS-2"
    );
}

// =============================================================================
// Seed loader
// =============================================================================

const INCIDENTS_CSV: &str = "incident_id,title,category,severity,status,created_at\n\
INC-1,Phishing wave,Phishing,High,Open,2024-01-01\n\
INC-2,Port scan,Recon,Low,Closed,2024-01-02\n";

#[test]
fn test_reseeding_same_file_keeps_row_count() {
    let (dir, store) = setup_store();
    let path = write_csv(dir.path(), "incidents.csv", INCIDENTS_CSV);

    let first = seed_from_csv::<Incident>(store.provider(), &path).unwrap();
    assert_eq!((first.inserted, first.skipped), (2, 0));

    let second = seed_from_csv::<Incident>(store.provider(), &path).unwrap();
    assert_eq!((second.inserted, second.skipped), (0, 2));
    assert_eq!(store.status().unwrap().incident_count, 2);
}

#[test]
fn test_seed_skips_duplicate_and_inserts_new() {
    let (dir, store) = setup_store();
    store
        .incidents()
        .create(&Incident::new("INC-1", "Existing", "Phishing", Severity::Low, "2023-12-31"))
        .unwrap();

    let path = write_csv(
        dir.path(),
        "incidents.csv",
        "incident_id,title,category,severity,status,created_at\n\
         INC-1,Duplicate,Phishing,High,Open,2024-01-01\n\
         INC-9,Fresh,Malware,Medium,Open,2024-01-09\n",
    );

    let report = seed_from_csv::<Incident>(store.provider(), &path).unwrap();
    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped, 1);

    let incidents = store.incidents();
    assert_eq!(incidents.list().unwrap().len(), 2);
    // the existing row is not overwritten by the duplicate
    assert_eq!(incidents.get("INC-1").unwrap().unwrap().title, "Existing");
    assert_eq!(incidents.get("INC-9").unwrap().unwrap().title, "Fresh");
}

#[test]
fn test_seed_aborts_file_on_invalid_row() {
    let (dir, store) = setup_store();
    let path = write_csv(
        dir.path(),
        "tickets.csv",
        "ticket_id,title,priority,category,status,created_at\n\
         T-1,Keyboard,low,Hardware,open,2024-01-01\n\
         T-2,Monitor,eventually,Hardware,open,2024-01-02\n\
         T-3,Mouse,low,Hardware,open,2024-01-03\n",
    );

    let err = seed_from_csv::<Ticket>(store.provider(), &path).unwrap_err();
    assert!(matches!(err, StoreError::Data(_)), "{err}");

    let ids: Vec<_> = store
        .tickets()
        .list()
        .unwrap()
        .into_iter()
        .map(|t| t.ticket_id)
        .collect();
    assert_eq!(ids, ["T-1"]);
}

#[test]
fn test_seed_all_skips_missing_files() {
    let (dir, store) = setup_store();
    write_csv(dir.path(), "cyber_incidents.csv", INCIDENTS_CSV);
    write_csv(
        dir.path(),
        "it_tickets.csv",
        "ticket_id,title,priority,category,status,created_at\n\
         T-1,Keyboard,low,Hardware,open,2024-01-01\n",
    );

    let config = DashboardConfig {
        data_dir: dir.path().to_path_buf(),
        ..DashboardConfig::default()
    };

    let summary = store.seed_all(&config).unwrap();
    assert_eq!(summary.incidents.inserted, 2);
    assert_eq!(summary.datasets.inserted, 0);
    assert_eq!(summary.tickets.inserted, 1);
    assert_eq!(summary.total().inserted, 3);

    let again = store.seed_all(&config).unwrap();
    assert_eq!(again.total().inserted, 0);
    assert_eq!(again.total().skipped, 3);
}

// =============================================================================
// Auth
// =============================================================================

#[test]
fn test_default_account_login() {
    let (_dir, store) = setup_store();
    let auth = store.auth();
    assert!(auth.ensure_default_user().unwrap());
    assert!(!auth.ensure_default_user().unwrap());

    assert!(auth.verify_login("test", "123456").unwrap());
    assert!(!auth.verify_login("test", "wrong").unwrap());
    assert!(!auth.verify_login("nouser", "anything").unwrap());
}

#[test]
fn test_password_never_stored_in_clear() {
    let (_dir, store) = setup_store();
    store.auth().create_user("alice", "correct horse").unwrap();

    let conn = store.provider().open_connection().unwrap();
    let stored: String = conn
        .query_row(
            "SELECT password_hash FROM users WHERE username = 'alice'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(!stored.contains("correct horse"));
    assert!(stored.starts_with("$argon2id$"));
}

#[test]
fn test_create_user_duplicate_and_validation() {
    let (_dir, store) = setup_store();
    let auth = store.auth();
    auth.create_user_with_role("bob", "pw", "analyst").unwrap();
    assert_eq!(auth.get_user("bob").unwrap().unwrap().role, "analyst");

    assert!(auth.create_user("bob", "other").unwrap_err().is_duplicate_key());
    assert!(matches!(
        auth.create_user("   ", "pw"),
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        auth.create_user("carol", ""),
        Err(StoreError::Validation(_))
    ));
    // the failed duplicate did not replace bob's password
    assert!(auth.verify_login("bob", "pw").unwrap());
}

// =============================================================================
// Store lifecycle
// =============================================================================

#[test]
fn test_corrupt_store_file_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.db");
    std::fs::write(&path, b"this is not an sqlite database, just some bytes\n".repeat(64)).unwrap();

    let err = Store::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)), "{err}");
}
