use std::io::Write;
use std::path::Path;

use dashboard_core::{Classification, Dataset, Incident, Priority, Severity, Ticket, TicketStatus};
use dashboard_data::{DashboardConfig, DataError, SeedFile, read_records};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_file(dir: &Path, name: &str, contents: &str) {
    let mut f = std::fs::File::create(dir.join(name)).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
}

fn write_default_seed_files(dir: &Path) {
    write_file(
        dir,
        "cyber_incidents.csv",
        "incident_id,title,category,severity,status,created_at,assigned_to,resolved_at,description\n\
         INC-1001,Suspicious login,Brute force,Medium,Closed,2024-01-03,alice,2024-01-04,Blocked IP\n\
         INC-1002,Invoice phish,Phishing,High,Open,2024-01-05,,,\n\
         INC-1003,Encrypted share,Malware,Critical,In Progress,2024-01-06,bob,,\"Ransom note, finance share\"\n",
    );
    write_file(
        dir,
        "datasets_metadata.csv",
        "dataset_id,name,owner,classification,description,source_system,size_mb,row_count,created_at\n\
         DS-01,Customer master,data-team,Confidential,CRM export,crm,512.5,120000,2023-11-01\n\
         DS-02,Web logs,ops,Internal,,nginx,2048,,2023-12-01\n",
    );
    write_file(
        dir,
        "it_tickets.csv",
        "ticket_id,title,priority,category,status,created_at,assigned_to,closed_at\n\
         T-1,Password reset,Low,Accounts,Resolved,2024-02-01,helpdesk,2024-02-01\n\
         T-2,VPN outage,Urgent,Network,Open,2024-02-02,,\n",
    );
}

// ---------------------------------------------------------------------------
// Config + seed files
// ---------------------------------------------------------------------------

#[test]
fn test_config_locates_all_seed_files() {
    let dir = tempfile::tempdir().unwrap();
    write_default_seed_files(dir.path());

    let config = DashboardConfig {
        data_dir: dir.path().to_path_buf(),
        ..DashboardConfig::default()
    };

    let incidents = read_records::<Incident>(config.incidents_csv()).unwrap();
    let datasets = read_records::<Dataset>(config.datasets_csv()).unwrap();
    let tickets = read_records::<Ticket>(config.tickets_csv()).unwrap();

    assert_eq!(incidents.len(), 3);
    assert_eq!(datasets.len(), 2);
    assert_eq!(tickets.len(), 2);

    assert_eq!(incidents[2].severity, Severity::Critical);
    assert_eq!(
        incidents[2].description.as_deref(),
        Some("Ransom note, finance share")
    );
    assert_eq!(datasets[0].classification, Classification::Confidential);
    assert_eq!(datasets[0].row_count, Some(120_000));
    assert_eq!(datasets[1].size_mb, Some(2048.0));
    assert_eq!(datasets[1].row_count, None);
    assert_eq!(tickets[1].priority, Priority::Urgent);
    assert_eq!(tickets[0].status, TicketStatus::Resolved);
}

#[test]
fn test_config_file_round_trip_with_seed_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "dashboard.yaml",
        "database: store.db\ndata_dir: seeds\nseed_files:\n  tickets: tickets.csv\n",
    );

    let config = DashboardConfig::load(dir.path().join("dashboard.yaml")).unwrap();
    assert_eq!(config.tickets_csv(), Path::new("seeds").join("tickets.csv"));
    assert_eq!(
        config.incidents_csv(),
        Path::new("seeds").join("cyber_incidents.csv")
    );
}

#[test]
fn test_lazy_reader_yields_rows_before_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "tickets.csv",
        "ticket_id,title,priority,category,status,created_at\n\
         T-1,Keyboard,low,Hardware,open,2024-01-01\n\
         T-2,,low,Hardware,open,2024-01-02\n\
         T-3,Mouse,low,Hardware,open,2024-01-03\n",
    );

    let mut file = SeedFile::open(dir.path().join("tickets.csv")).unwrap();
    let mut records = file.records::<Ticket>();

    assert_eq!(records.next().unwrap().unwrap().ticket_id, "T-1");
    assert!(matches!(
        records.next().unwrap(),
        Err(DataError::InvalidRow { line: 3, .. })
    ));
}

#[test]
fn test_ragged_csv_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "incidents.csv",
        "incident_id,title,category,severity,status,created_at\n\
         INC-1,Short row,Phishing\n",
    );

    assert!(matches!(
        read_records::<Incident>(dir.path().join("incidents.csv")),
        Err(DataError::CsvError(_))
    ));
}

#[test]
fn test_unopenable_seed_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SeedFile::open(dir.path().join("absent.csv")).err().unwrap();
    match err {
        DataError::IoError(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected IoError, got {other}"),
    }
}
