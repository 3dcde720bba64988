use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dashboard_assistant::{Assistant, AssistantConfig, incident_context};
use dashboard_core::{
    Classification, Dataset, FieldValue, Incident, IncidentStatus, Priority, Row, Severity,
    Ticket, TicketStatus,
};
use dashboard_data::DashboardConfig;
use dashboard_sqlite::{Store, StoreError};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// How list and get results are printed.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum CliOutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "dashboard")]
#[command(about = "Operations dashboard store: incidents, datasets, tickets and accounts")]
struct Cli {
    /// YAML configuration file (defaults apply when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Store file path, overriding the configuration.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the schema, the default test account, and load the seed files.
    Init(SeedArgs),
    /// Load the seed files, skipping rows whose key already exists.
    Seed(SeedArgs),
    /// Show whether the tables exist and how many rows each holds.
    Status(FormatArgs),
    /// Check a username and password.
    Login(LoginArgs),
    /// Account management.
    User(UserArgs),
    /// Security incidents.
    Incidents(IncidentArgs),
    /// Dataset metadata.
    Datasets(DatasetArgs),
    /// IT tickets.
    Tickets(TicketArgs),
    /// Ask the security assistant a question about the current incidents.
    Ask(AskArgs),
    /// Configuration file helpers.
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct SeedArgs {
    /// Directory holding the seed CSV files, overriding the configuration.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct FormatArgs {
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct LoginArgs {
    #[arg(long)]
    username: String,
    /// Password; read from the first line of stdin when omitted.
    #[arg(long)]
    password: Option<String>,
}

#[derive(Debug, Args)]
struct UserArgs {
    #[command(subcommand)]
    operation: UserOperation,
}

#[derive(Debug, Subcommand)]
enum UserOperation {
    /// Create an account.
    Create(UserCreateArgs),
    /// Show an account (without its password hash).
    Get(UserGetArgs),
}

#[derive(Debug, Args)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    /// Password; read from the first line of stdin when omitted.
    #[arg(long)]
    password: Option<String>,
    #[arg(long, default_value = dashboard_core::DEFAULT_ROLE)]
    role: String,
}

#[derive(Debug, Args)]
struct UserGetArgs {
    username: String,
}

#[derive(Debug, Args)]
struct IdArgs {
    id: String,
    #[command(flatten)]
    output: FormatArgs,
}

// ---------------------------------------------------------------------------
// Incidents
// ---------------------------------------------------------------------------

#[derive(Debug, Args)]
struct IncidentArgs {
    #[command(subcommand)]
    operation: IncidentOperation,
}

#[derive(Debug, Subcommand)]
enum IncidentOperation {
    /// List incidents, optionally filtered.
    List(IncidentListArgs),
    /// Show one incident.
    Get(IdArgs),
    /// Record a new incident.
    Create(IncidentCreateArgs),
    /// Change fields of an existing incident.
    Update(IncidentUpdateArgs),
    /// Delete an incident.
    Delete(DeleteArgs),
    /// Count incidents per severity.
    Breakdown(FormatArgs),
}

#[derive(Debug, Args)]
struct IncidentListArgs {
    #[arg(long)]
    status: Option<IncidentStatus>,
    #[arg(long)]
    severity: Option<Severity>,
    /// Only incidents that are not closed.
    #[arg(long, conflicts_with = "status")]
    open: bool,
    #[command(flatten)]
    output: FormatArgs,
}

#[derive(Debug, Args)]
struct IncidentCreateArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    title: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    severity: Severity,
    #[arg(long, default_value = "open")]
    status: IncidentStatus,
    /// Creation timestamp; now when omitted.
    #[arg(long)]
    created_at: Option<String>,
    #[arg(long)]
    assigned_to: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct IncidentUpdateArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    severity: Option<Severity>,
    #[arg(long)]
    status: Option<IncidentStatus>,
    #[arg(long)]
    assigned_to: Option<String>,
    #[arg(long)]
    resolved_at: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

#[derive(Debug, Args)]
struct DatasetArgs {
    #[command(subcommand)]
    operation: DatasetOperation,
}

#[derive(Debug, Subcommand)]
enum DatasetOperation {
    /// List datasets, optionally filtered.
    List(DatasetListArgs),
    /// Show one dataset.
    Get(IdArgs),
    /// Register a new dataset.
    Create(DatasetCreateArgs),
    /// Change fields of an existing dataset.
    Update(DatasetUpdateArgs),
    /// Delete a dataset.
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
struct DatasetListArgs {
    #[arg(long)]
    classification: Option<Classification>,
    /// Owner name, compared case-insensitively.
    #[arg(long)]
    owner: Option<String>,
    #[command(flatten)]
    output: FormatArgs,
}

#[derive(Debug, Args)]
struct DatasetCreateArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    owner: String,
    #[arg(long)]
    classification: Classification,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    source_system: Option<String>,
    #[arg(long)]
    size_mb: Option<f64>,
    #[arg(long)]
    row_count: Option<i64>,
}

#[derive(Debug, Args)]
struct DatasetUpdateArgs {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    owner: Option<String>,
    #[arg(long)]
    classification: Option<Classification>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    source_system: Option<String>,
    #[arg(long)]
    size_mb: Option<f64>,
    #[arg(long)]
    row_count: Option<i64>,
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

#[derive(Debug, Args)]
struct TicketArgs {
    #[command(subcommand)]
    operation: TicketOperation,
}

#[derive(Debug, Subcommand)]
enum TicketOperation {
    /// List tickets, optionally filtered.
    List(TicketListArgs),
    /// Show one ticket.
    Get(IdArgs),
    /// Open a new ticket.
    Create(TicketCreateArgs),
    /// Change fields of an existing ticket.
    Update(TicketUpdateArgs),
    /// Delete a ticket.
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
struct TicketListArgs {
    #[arg(long)]
    status: Option<TicketStatus>,
    #[arg(long)]
    priority: Option<Priority>,
    /// Only tickets that are open or in progress.
    #[arg(long, conflicts_with = "status")]
    open: bool,
    #[command(flatten)]
    output: FormatArgs,
}

#[derive(Debug, Args)]
struct TicketCreateArgs {
    #[arg(long)]
    id: String,
    #[arg(long)]
    title: String,
    #[arg(long)]
    priority: Priority,
    #[arg(long)]
    category: String,
    #[arg(long, default_value = "open")]
    status: TicketStatus,
    /// Creation timestamp; now when omitted.
    #[arg(long)]
    created_at: Option<String>,
    #[arg(long)]
    assigned_to: Option<String>,
}

#[derive(Debug, Args)]
struct TicketUpdateArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    priority: Option<Priority>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    status: Option<TicketStatus>,
    #[arg(long)]
    assigned_to: Option<String>,
    #[arg(long)]
    closed_at: Option<String>,
}

#[derive(Debug, Args)]
struct DeleteArgs {
    id: String,
}

// ---------------------------------------------------------------------------
// Assistant and config
// ---------------------------------------------------------------------------

#[derive(Debug, Args)]
struct AskArgs {
    /// The question.
    #[arg(required_unless_present = "check")]
    message: Vec<String>,
    /// Do not send the incident summary along with the question.
    #[arg(long)]
    no_context: bool,
    /// Check the API key and make one test call instead of asking.
    #[arg(long, conflicts_with = "message")]
    check: bool,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    operation: ConfigOperation,
}

#[derive(Debug, Subcommand)]
enum ConfigOperation {
    /// Print the effective configuration as YAML.
    Show,
    /// Write the effective configuration to a YAML file.
    Write(ConfigWriteArgs),
}

#[derive(Debug, Args)]
struct ConfigWriteArgs {
    output: PathBuf,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| {
        init_tracing(&config);
        run(cli.command, config)
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<DashboardConfig, String> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.database = db.clone();
    }
    Ok(config)
}

/// Logs go to stderr; `RUST_LOG` wins over the configured level.
fn init_tracing(config: &DashboardConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(command: Command, config: DashboardConfig) -> Result<(), String> {
    match command {
        Command::Init(args) => run_init(args, config),
        Command::Seed(args) => run_seed(args, config),
        Command::Status(args) => run_status(args, &config),
        Command::Login(args) => run_login(args, &config),
        Command::User(args) => run_user(args, &config),
        Command::Incidents(args) => run_incidents(args, &config),
        Command::Datasets(args) => run_datasets(args, &config),
        Command::Tickets(args) => run_tickets(args, &config),
        Command::Ask(args) => run_ask(args, &config),
        Command::Config(args) => run_config(args, &config),
    }
}

/// Storage failures get a generic lead-in; the cause follows.
fn describe(err: StoreError) -> String {
    match err {
        StoreError::Storage(e) => format!("the data store is unavailable: {e}"),
        other => other.to_string(),
    }
}

fn open_store(config: &DashboardConfig) -> Result<Store, String> {
    debug!(path = %config.database.display(), "opening store");
    Store::open(&config.database).map_err(|e| {
        format!(
            "Failed to open store '{}': {}",
            config.database.display(),
            describe(e)
        )
    })
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn read_password(given: Option<String>) -> Result<String, String> {
    if let Some(password) = given {
        return Ok(password);
    }
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| format!("Failed to read password from stdin: {e}"))?;
    Ok(input.lines().next().unwrap_or_default().to_string())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize output: {e}"))?;
    println!("{json}");
    Ok(())
}

/// Adds `field` to `row` when a value was given.
fn set<V: Into<FieldValue>>(row: &mut Row, field: &str, value: Option<V>) {
    if let Some(value) = value {
        row.insert(field.to_string(), value.into());
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

fn run_init(args: SeedArgs, config: DashboardConfig) -> Result<(), String> {
    let store = open_store(&config)?;
    let created = store.auth().ensure_default_user().map_err(describe)?;
    println!(
        "Schema ready in '{}'.",
        config.database.display()
    );
    if created {
        println!(
            "Default account '{}' created.",
            dashboard_sqlite::DEFAULT_USERNAME
        );
    }
    seed_with(&store, args, config)
}

fn run_seed(args: SeedArgs, config: DashboardConfig) -> Result<(), String> {
    let store = open_store(&config)?;
    seed_with(&store, args, config)
}

fn seed_with(store: &Store, args: SeedArgs, mut config: DashboardConfig) -> Result<(), String> {
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    let summary = store
        .seed_all(&config)
        .map_err(|e| format!("Seed failed: {}", describe(e)))?;
    println!("Seed complete:");
    for (label, report) in [
        ("Incidents", summary.incidents),
        ("Datasets", summary.datasets),
        ("Tickets", summary.tickets),
    ] {
        println!(
            "  {label}: {} inserted, {} skipped",
            report.inserted, report.skipped
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct StatusView {
    tables_exist: bool,
    users: usize,
    incidents: usize,
    datasets: usize,
    tickets: usize,
}

fn run_status(args: FormatArgs, config: &DashboardConfig) -> Result<(), String> {
    // status must not create the schema as a side effect
    let store = Store::new(dashboard_sqlite::ConnectionProvider::new(&config.database));
    let status = store.status().map_err(describe)?;
    match args.format {
        CliOutputFormat::Json => print_json(&StatusView {
            tables_exist: status.tables_exist,
            users: status.user_count,
            incidents: status.incident_count,
            datasets: status.dataset_count,
            tickets: status.ticket_count,
        }),
        CliOutputFormat::Table => {
            println!("Store Status:");
            println!(
                "  Tables exist: {}",
                if status.tables_exist { "yes" } else { "no" }
            );
            println!("  User count: {}", status.user_count);
            println!("  Incident count: {}", status.incident_count);
            println!("  Dataset count: {}", status.dataset_count);
            println!("  Ticket count: {}", status.ticket_count);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

fn run_login(args: LoginArgs, config: &DashboardConfig) -> Result<(), String> {
    let password = read_password(args.password)?;
    let store = open_store(config)?;
    if store
        .auth()
        .verify_login(&args.username, &password)
        .map_err(describe)?
    {
        println!("Login successful for '{}'.", args.username.trim());
        Ok(())
    } else {
        Err("invalid username or password".to_string())
    }
}

fn run_user(args: UserArgs, config: &DashboardConfig) -> Result<(), String> {
    let store = open_store(config)?;
    let auth = store.auth();
    match args.operation {
        UserOperation::Create(a) => {
            let password = read_password(a.password)?;
            let user = auth
                .create_user_with_role(&a.username, &password, &a.role)
                .map_err(describe)?;
            println!("User '{}' created with role '{}'.", user.username, user.role);
            Ok(())
        }
        UserOperation::Get(a) => match auth.get_user(&a.username).map_err(describe)? {
            Some(user) => print_json(&user),
            None => Err(format!("users: no row with key '{}'", a.username)),
        },
    }
}

// ---------------------------------------------------------------------------
// Domain tables
// ---------------------------------------------------------------------------

fn print_incidents(incidents: &[Incident], format: CliOutputFormat) -> Result<(), String> {
    match format {
        CliOutputFormat::Json => print_json(incidents),
        CliOutputFormat::Table => {
            println!(
                "{:<12} {:<9} {:<12} {:<14} TITLE",
                "ID", "SEVERITY", "STATUS", "ASSIGNED"
            );
            for i in incidents {
                println!(
                    "{:<12} {:<9} {:<12} {:<14} {}",
                    i.incident_id,
                    i.severity.as_str(),
                    i.status.as_str(),
                    i.assigned_to.as_deref().unwrap_or("-"),
                    i.title
                );
            }
            println!("{} incident(s)", incidents.len());
            Ok(())
        }
    }
}

fn run_incidents(args: IncidentArgs, config: &DashboardConfig) -> Result<(), String> {
    let store = open_store(config)?;
    let service = store.incidents();
    match args.operation {
        IncidentOperation::List(a) => {
            let mut incidents = match (a.open, a.status) {
                (true, _) => service.list_open(),
                (false, Some(status)) => service.list_by_status(status),
                (false, None) => service.list(),
            }
            .map_err(describe)?;
            if let Some(severity) = a.severity {
                incidents.retain(|i| i.severity == severity);
            }
            print_incidents(&incidents, a.output.format)
        }
        IncidentOperation::Get(a) => match service.get(&a.id).map_err(describe)? {
            Some(incident) => print_incidents(std::slice::from_ref(&incident), a.output.format),
            None => Err(format!("incidents: no row with key '{}'", a.id)),
        },
        IncidentOperation::Create(a) => {
            let mut incident = Incident::new(
                a.id,
                a.title,
                a.category,
                a.severity,
                a.created_at.unwrap_or_else(now),
            )
            .with_status(a.status);
            incident.assigned_to = a.assigned_to;
            incident.description = a.description;
            service.create(&incident).map_err(describe)?;
            println!("Incident '{}' created.", incident.incident_id);
            Ok(())
        }
        IncidentOperation::Update(a) => {
            let mut changes = Row::new();
            set(&mut changes, "title", a.title);
            set(&mut changes, "category", a.category);
            set(&mut changes, "severity", a.severity);
            set(&mut changes, "status", a.status);
            set(&mut changes, "assigned_to", a.assigned_to);
            set(&mut changes, "resolved_at", a.resolved_at);
            set(&mut changes, "description", a.description);
            let incident = service.update(&a.id, changes).map_err(describe)?;
            println!(
                "Incident '{}' updated (status {}, severity {}).",
                incident.incident_id, incident.status, incident.severity
            );
            Ok(())
        }
        IncidentOperation::Delete(a) => {
            report_delete("Incident", &a.id, service.delete(&a.id).map_err(describe)?);
            Ok(())
        }
        IncidentOperation::Breakdown(a) => {
            let counts = service.severity_breakdown().map_err(describe)?;
            match a.format {
                CliOutputFormat::Json => print_json(&counts),
                CliOutputFormat::Table => {
                    for (severity, count) in &counts {
                        println!("{:<9} {count}", severity.as_str());
                    }
                    Ok(())
                }
            }
        }
    }
}

fn print_datasets(datasets: &[Dataset], format: CliOutputFormat) -> Result<(), String> {
    match format {
        CliOutputFormat::Json => print_json(datasets),
        CliOutputFormat::Table => {
            println!(
                "{:<12} {:<13} {:<14} {:>10} NAME",
                "ID", "CLASS", "OWNER", "SIZE_MB"
            );
            for d in datasets {
                let size = d
                    .size_mb
                    .map(|s| format!("{s:.2}"))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<12} {:<13} {:<14} {:>10} {}",
                    d.dataset_id,
                    d.classification.as_str(),
                    d.owner,
                    size,
                    d.name
                );
            }
            println!("{} dataset(s)", datasets.len());
            Ok(())
        }
    }
}

fn run_datasets(args: DatasetArgs, config: &DashboardConfig) -> Result<(), String> {
    let store = open_store(config)?;
    let service = store.datasets();
    match args.operation {
        DatasetOperation::List(a) => {
            let mut datasets = match &a.owner {
                Some(owner) => service.list_by_owner(owner),
                None => service.list(),
            }
            .map_err(describe)?;
            if let Some(classification) = a.classification {
                datasets.retain(|d| d.classification == classification);
            }
            print_datasets(&datasets, a.output.format)
        }
        DatasetOperation::Get(a) => match service.get(&a.id).map_err(describe)? {
            Some(dataset) => print_datasets(std::slice::from_ref(&dataset), a.output.format),
            None => Err(format!("datasets: no row with key '{}'", a.id)),
        },
        DatasetOperation::Create(a) => {
            let mut dataset = Dataset::new(a.id, a.name, a.owner, a.classification);
            dataset.description = a.description;
            dataset.source_system = a.source_system;
            dataset.size_mb = a.size_mb;
            dataset.row_count = a.row_count;
            dataset.created_at = Some(now());
            service.create(&dataset).map_err(describe)?;
            println!("Dataset '{}' created.", dataset.dataset_id);
            Ok(())
        }
        DatasetOperation::Update(a) => {
            let mut changes = Row::new();
            set(&mut changes, "name", a.name);
            set(&mut changes, "owner", a.owner);
            set(&mut changes, "classification", a.classification);
            set(&mut changes, "description", a.description);
            set(&mut changes, "source_system", a.source_system);
            set(&mut changes, "size_mb", a.size_mb);
            set(&mut changes, "row_count", a.row_count);
            let dataset = service.update(&a.id, changes).map_err(describe)?;
            println!(
                "Dataset '{}' updated (owner {}, classification {}).",
                dataset.dataset_id, dataset.owner, dataset.classification
            );
            Ok(())
        }
        DatasetOperation::Delete(a) => {
            report_delete("Dataset", &a.id, service.delete(&a.id).map_err(describe)?);
            Ok(())
        }
    }
}

fn print_tickets(tickets: &[Ticket], format: CliOutputFormat) -> Result<(), String> {
    match format {
        CliOutputFormat::Json => print_json(tickets),
        CliOutputFormat::Table => {
            println!(
                "{:<12} {:<8} {:<12} {:<14} TITLE",
                "ID", "PRIORITY", "STATUS", "ASSIGNED"
            );
            for t in tickets {
                println!(
                    "{:<12} {:<8} {:<12} {:<14} {}",
                    t.ticket_id,
                    t.priority.as_str(),
                    t.status.as_str(),
                    t.assigned_to.as_deref().unwrap_or("-"),
                    t.title
                );
            }
            println!("{} ticket(s)", tickets.len());
            Ok(())
        }
    }
}

fn run_tickets(args: TicketArgs, config: &DashboardConfig) -> Result<(), String> {
    let store = open_store(config)?;
    let service = store.tickets();
    match args.operation {
        TicketOperation::List(a) => {
            let mut tickets = match (a.open, a.status) {
                (true, _) => service.list_open(),
                (false, Some(status)) => service.list_by_status(status),
                (false, None) => service.list(),
            }
            .map_err(describe)?;
            if let Some(priority) = a.priority {
                tickets.retain(|t| t.priority == priority);
            }
            print_tickets(&tickets, a.output.format)
        }
        TicketOperation::Get(a) => match service.get(&a.id).map_err(describe)? {
            Some(ticket) => print_tickets(std::slice::from_ref(&ticket), a.output.format),
            None => Err(format!("tickets: no row with key '{}'", a.id)),
        },
        TicketOperation::Create(a) => {
            let mut ticket = Ticket::new(
                a.id,
                a.title,
                a.priority,
                a.category,
                a.created_at.unwrap_or_else(now),
            )
            .with_status(a.status);
            ticket.assigned_to = a.assigned_to;
            service.create(&ticket).map_err(describe)?;
            println!("Ticket '{}' created.", ticket.ticket_id);
            Ok(())
        }
        TicketOperation::Update(a) => {
            let mut changes = Row::new();
            set(&mut changes, "title", a.title);
            set(&mut changes, "priority", a.priority);
            set(&mut changes, "category", a.category);
            set(&mut changes, "status", a.status);
            set(&mut changes, "assigned_to", a.assigned_to);
            set(&mut changes, "closed_at", a.closed_at);
            let ticket = service.update(&a.id, changes).map_err(describe)?;
            println!(
                "Ticket '{}' updated (status {}, priority {}).",
                ticket.ticket_id, ticket.status, ticket.priority
            );
            Ok(())
        }
        TicketOperation::Delete(a) => {
            report_delete("Ticket", &a.id, service.delete(&a.id).map_err(describe)?);
            Ok(())
        }
    }
}

fn report_delete(kind: &str, id: &str, existed: bool) {
    if existed {
        println!("{kind} '{id}' deleted.");
    } else {
        println!("{kind} '{id}' did not exist.");
    }
}

// ---------------------------------------------------------------------------
// Assistant and config
// ---------------------------------------------------------------------------

fn run_ask(args: AskArgs, config: &DashboardConfig) -> Result<(), String> {
    let assistant = Assistant::new(AssistantConfig::from_env(&config.assistant))
        .map_err(|e| format!("Failed to initialize assistant: {e}"))?;
    if args.check {
        println!("{}", assistant.health_check());
        return Ok(());
    }

    let message = args.message.join(" ");
    let context = if args.no_context {
        None
    } else {
        Some(incident_context(&current_incidents(config)?))
    };
    println!("{}", assistant.ask(&message, context.as_deref()));
    Ok(())
}

/// Reads incidents without creating the schema; no tables means none.
fn current_incidents(config: &DashboardConfig) -> Result<Vec<Incident>, String> {
    let store = Store::new(dashboard_sqlite::ConnectionProvider::new(&config.database));
    if !store.status().map_err(describe)?.tables_exist {
        return Ok(Vec::new());
    }
    store.incidents().list().map_err(describe)
}

fn run_config(args: ConfigArgs, config: &DashboardConfig) -> Result<(), String> {
    match args.operation {
        ConfigOperation::Show => {
            let yaml = serde_yaml::to_string(config)
                .map_err(|e| format!("Failed to serialize config: {e}"))?;
            print!("{yaml}");
            Ok(())
        }
        ConfigOperation::Write(a) => {
            config
                .save(&a.output)
                .map_err(|e| format!("Failed to write config '{}': {e}", a.output.display()))?;
            println!("Config written to '{}'.", a.output.display());
            Ok(())
        }
    }
}
