// src/account_cli.rs
use crate::auth::password::{hash_password, DEFAULT_COST};
use crate::database::{
    find_or_create_lookup, insert_account, insert_employee, insert_job_seeker, AccountRepository, Database, Lookup,
    NewAccount, NewPosting, PostingRepository,
};
use crate::types::{Account, Role};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::io::Read;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "jobboard-admin")]
#[command(about = "Manage accounts and postings for the job board")]
pub struct AdminCli {
    #[command(subcommand)]
    pub command: AdminCommand,

    #[arg(long, default_value = "data/jobboard.db")]
    pub database_path: PathBuf,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Initialize the database
    Init,
    /// Create an account with its profile
    AddAccount(AddAccountArgs),
    /// Mark an account as verified
    Verify { identifier: String },
    /// List all accounts
    ListAccounts,
    /// Import postings from a CSV file
    ImportPostings { csv_file: PathBuf },
    /// Withdraw a posting from search and recommendations
    DeactivatePosting { id: i64 },
}

#[derive(Args, Debug, Clone)]
pub struct AddAccountArgs {
    pub username: String,
    pub email: String,
    pub password: String,
    /// jobseeker or employee
    #[arg(long, value_parser = parse_role)]
    pub role: Role,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    /// Employer company, created if missing (employees only)
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    /// Preferred category name (job seekers only)
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub verified: bool,
}

fn parse_role(value: &str) -> Result<Role, String> {
    Role::parse(value).ok_or_else(|| format!("unknown role '{}', use jobseeker or employee", value))
}

pub async fn handle_admin_command(cli: AdminCli) -> Result<()> {
    let db = Database::new(&cli.database_path).await?;
    let pool = db.pool();

    match cli.command {
        AdminCommand::Init => {
            info!("✅ Database ready at {}", cli.database_path.display());
        }

        AdminCommand::AddAccount(args) => match create_account(pool, &args, DEFAULT_COST).await {
            Ok(account) => {
                info!("✅ Account created successfully:");
                info!("   Username: {}", account.username);
                info!("   Email: {}", account.email);
                info!("   Role: {}", args.role);
                info!("   Verified: {}", account.is_verified);
                info!("   ID: {}", account.id);
            }
            Err(e) => {
                error!("Failed to create account: {:#}", e);
                if format!("{:#}", e).contains("UNIQUE constraint failed") {
                    info!("❌ Error: username or email already exists");
                } else {
                    info!("❌ Error: {:#}", e);
                }
            }
        },

        AdminCommand::Verify { identifier } => {
            match AccountRepository::new(pool).mark_verified(&identifier).await {
                Ok(true) => info!("✅ Account verified: {}", identifier),
                Ok(false) => info!("❌ No account found for: {}", identifier),
                Err(e) => {
                    error!("Failed to verify account: {:#}", e);
                    info!("❌ Error: {:#}", e);
                }
            }
        }

        AdminCommand::ListAccounts => {
            let accounts = AccountRepository::new(pool).list().await?;
            if accounts.is_empty() {
                info!("No accounts found");
            } else {
                info!("Accounts ({}):", accounts.len());
                for account in accounts {
                    info!(
                        "  {} <{}> [{}]{}",
                        account.username,
                        account.email,
                        account.role().map(Role::display_name).unwrap_or("Unknown"),
                        if account.is_verified { "" } else { " (unverified)" }
                    );
                }
            }
        }

        AdminCommand::ImportPostings { csv_file } => {
            let file = std::fs::File::open(&csv_file)
                .with_context(|| format!("Failed to open CSV file: {}", csv_file.display()))?;
            let imported = import_postings(pool, file).await?;
            info!("✅ Imported {} postings from {}", imported, csv_file.display());
        }

        AdminCommand::DeactivatePosting { id } => match PostingRepository::new(pool).deactivate(id).await {
            Ok(true) => info!("✅ Posting {} deactivated", id),
            Ok(false) => info!("❌ No posting found with id {}", id),
            Err(e) => {
                error!("Failed to deactivate posting: {:#}", e);
                info!("❌ Error: {:#}", e);
            }
        },
    }

    Ok(())
}

/// Create the account row and its role-specific profile in one transaction.
pub async fn create_account(pool: &SqlitePool, args: &AddAccountArgs, cost: u32) -> Result<Account> {
    if args.role == Role::Employee && args.company.is_none() {
        anyhow::bail!("Employee accounts require --company");
    }

    let password_hash = hash_password(&args.password, cost)?;
    let mut tx = pool.begin().await?;

    let account = insert_account(
        &mut tx,
        NewAccount {
            username: &args.username,
            email: &args.email,
            password_hash: &password_hash,
            role: args.role,
            is_verified: args.verified,
        },
    )
    .await?;

    match args.role {
        Role::JobSeeker => {
            let category_id = match &args.category {
                Some(name) => Some(find_or_create_lookup(&mut tx, Lookup::Category, name).await?),
                None => None,
            };
            insert_job_seeker(&mut tx, account.id, &args.first_name, &args.last_name, category_id).await?;
        }
        Role::Employee => {
            let company = args.company.as_deref().unwrap_or_default();
            let company_id = find_or_create_lookup(&mut tx, Lookup::Company, company).await?;
            insert_employee(
                &mut tx,
                account.id,
                &args.first_name,
                &args.last_name,
                company_id,
                args.position.as_deref(),
            )
            .await?;
        }
    }

    tx.commit().await.context("Failed to commit account")?;
    Ok(account)
}

#[derive(Debug, Deserialize)]
struct PostingRecord {
    title: String,
    description: Option<String>,
    requirements: Option<String>,
    benefits: Option<String>,
    company: String,
    location: Option<String>,
    salary_min: Option<i64>,
    salary_max: Option<i64>,
    category: Option<String>,
    field: Option<String>,
    job_type: Option<String>,
}

/// Import postings from CSV with a header row. Companies, fields,
/// categories and job types are created on first use.
pub async fn import_postings<R: Read>(pool: &SqlitePool, reader: R) -> Result<usize> {
    let repo = PostingRepository::new(pool);
    let mut csv_reader = csv::Reader::from_reader(reader);
    let now = Utc::now();
    let mut imported = 0;

    for (line, record) in csv_reader.deserialize::<PostingRecord>().enumerate() {
        let record = record.with_context(|| format!("Invalid CSV record at row {}", line + 1))?;

        let company_id = repo.find_or_create_company(record.company.trim()).await?;

        let field_id = match non_empty(record.field) {
            Some(name) => Some(repo.find_or_create_field(&name).await?),
            None => None,
        };
        let category_id = match non_empty(record.category) {
            Some(name) => Some(repo.find_or_create_category(&name, field_id).await?),
            None => None,
        };
        let job_type_id = match non_empty(record.job_type) {
            Some(name) => Some(repo.find_or_create_job_type(&name).await?),
            None => None,
        };

        repo.create(&NewPosting {
            company_id,
            title: record.title,
            description: non_empty(record.description),
            requirements: non_empty(record.requirements),
            benefits: non_empty(record.benefits),
            location: non_empty(record.location),
            salary_min: record.salary_min,
            salary_max: record.salary_max,
            job_type_id,
            category_id,
            posted_date: now,
            closing_date: None,
        })
        .await?;

        imported += 1;
    }

    Ok(imported)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
