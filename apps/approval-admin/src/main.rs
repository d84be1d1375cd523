mod db;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, AppConfigProvider, CliArgs, ConfigProvider, DatabaseConfig};

use member_approval::config::MemberApprovalConfig;
use member_approval::contract::model::{BulkOperationResult, Member, MemberStatus};
use member_approval::infra::storage::sea_orm_gateway::SeaOrmMembersGateway;
use member_approval::MemberApproval;
use sea_orm::DatabaseConnection;
use std::path::{Path, PathBuf};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Member approval admin - review and decide pending registrations
#[derive(Parser)]
#[command(name = "approval-admin")]
#[command(about = "Member approval admin - review and decide pending registrations")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database seeded with demo registrations
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Members(MemberCommand),
    /// Check configuration
    Check,
}

/// Commands that need the database.
#[derive(Subcommand)]
enum MemberCommand {
    /// List pending members, newest first
    Pending,
    /// Approve one pending member
    Approve(Decide),
    /// Reject one pending member
    Reject(Decide),
    /// Approve several pending members at once
    BulkApprove(BulkDecide),
    /// Reject several pending members at once
    BulkReject(BulkDecide),
}

#[derive(clap::Args)]
struct Decide {
    /// Member id
    id: String,
    /// Id of the deciding administrator
    #[arg(long)]
    actor: String,
    /// Optional free-text note stored with the decision
    #[arg(long)]
    note: Option<String>,
}

#[derive(clap::Args)]
struct BulkDecide {
    /// Member ids
    #[arg(required = true, num_args = 1..)]
    ids: Vec<String>,
    /// Id of the deciding administrator
    #[arg(long)]
    actor: String,
    /// Optional free-text note stored with every decision
    #[arg(long)]
    note: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (verbosity)
    config.apply_cli_overrides(&args);

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.app.home_dir));
    tracing::info!("approval-admin starting");

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command {
        Some(Commands::Check) => check_config(&config),
        Some(Commands::Members(command)) => run_command(config, args, command).await,
        None => run_command(config, args, MemberCommand::Pending).await,
    }
}

async fn run_command(config: AppConfig, args: CliArgs, command: MemberCommand) -> Result<()> {
    let db_config = match (&config.database, args.mock) {
        (Some(db), _) => db.clone(),
        // --mock needs no database section
        (None, true) => DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_conns: Some(1),
            busy_timeout_ms: None,
        },
        (None, false) => return Err(anyhow!("No database configuration found")),
    };
    let conn = db::connect(&db_config, Path::new(&config.app.home_dir), args.mock).await?;

    let provider = AppConfigProvider::new(config);
    let module_cfg: MemberApprovalConfig = provider.module_config(MemberApproval::NAME);

    let module = MemberApproval::init(conn.clone(), module_cfg).await?;
    if args.mock {
        seed_demo_members(conn).await?;
    }

    execute(&module, command).await
}

async fn execute(module: &MemberApproval, command: MemberCommand) -> Result<()> {
    let client = module.client();
    match command {
        MemberCommand::Pending => {
            let members = client.list_pending().await?;
            print_pending(&members);
        }
        MemberCommand::Approve(d) => {
            client.approve(&d.id, &d.actor, d.note.as_deref()).await?;
            println!("Approve request for {} applied", d.id);
        }
        MemberCommand::Reject(d) => {
            client.reject(&d.id, &d.actor, d.note.as_deref()).await?;
            println!("Reject request for {} applied", d.id);
        }
        MemberCommand::BulkApprove(d) => {
            let result = client
                .bulk_approve(&d.ids, &d.actor, d.note.as_deref())
                .await?;
            print_bulk("approved", &result);
        }
        MemberCommand::BulkReject(d) => {
            let result = client
                .bulk_reject(&d.ids, &d.actor, d.note.as_deref())
                .await?;
            print_bulk("rejected", &result);
        }
    }
    Ok(())
}

fn print_pending(members: &[Member]) {
    if members.is_empty() {
        println!("No pending members");
        return;
    }
    println!("{} pending member(s):", members.len());
    for m in members {
        println!(
            "{}\t{}\t{}\tgen {}\t{}\t{}",
            m.id,
            m.name,
            m.email,
            m.generation,
            m.occupation,
            m.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}

fn print_bulk(verb: &str, result: &BulkOperationResult) {
    println!("{} {}, {} skipped", result.success, verb, result.failed);
}

/// Registrations shown when running against the in-memory database.
async fn seed_demo_members(conn: DatabaseConnection) -> Result<()> {
    let gateway = SeaOrmMembersGateway::new(conn);
    let now = chrono::Utc::now();
    let demo = [
        ("demo-1", "Kim Minji", "designer", 60),
        ("demo-2", "Lee Jun", "developer", 30),
        ("demo-3", "Park Seo", "product manager", 5),
    ];
    for (id, name, occupation, minutes_ago) in demo {
        let member = Member {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            name: name.to_string(),
            generation: 12,
            occupation: occupation.to_string(),
            phone: "010-0000-0000".to_string(),
            messenger_id: None,
            profile_image: None,
            status: MemberStatus::Pending,
            created_at: now - chrono::Duration::minutes(minutes_ago),
            email_confirmed_at: Some(now),
            decision: None,
        };
        gateway.insert_member(&member).await?;
    }
    tracing::debug!(count = demo.len(), "Seeded demo members");
    Ok(())
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    if let Some(db) = &config.database {
        let backend = db::detect_from_dsn(db)?;
        tracing::info!(?backend, "Database DSN is valid");
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);

    Ok(())
}
