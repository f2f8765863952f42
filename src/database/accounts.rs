// src/database/accounts.rs
use crate::types::{Account, Company, EmployeeProfile, JobSeekerProfile, Person, Role};
use anyhow::{Context, Result};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

/// Read access the authenticator needs. Injected so login can run against
/// any backing store.
#[rocket::async_trait]
pub trait AccountStore: Send + Sync {
    /// Find an account whose username or email equals `identifier`.
    async fn find_account(&self, identifier: &str) -> Result<Option<Account>>;
    async fn find_job_seeker_profile(&self, account_id: i64) -> Result<Option<JobSeekerProfile>>;
    async fn find_employee_profile(&self, account_id: i64) -> Result<Option<EmployeeProfile>>;
}

pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[rocket::async_trait]
impl AccountStore for SqliteAccountStore {
    async fn find_account(&self, identifier: &str) -> Result<Option<Account>> {
        AccountRepository::new(&self.pool)
            .find_by_identifier(identifier)
            .await
    }

    async fn find_job_seeker_profile(&self, account_id: i64) -> Result<Option<JobSeekerProfile>> {
        ProfileRepository::new(&self.pool)
            .find_job_seeker(account_id)
            .await
    }

    async fn find_employee_profile(&self, account_id: i64) -> Result<Option<EmployeeProfile>> {
        ProfileRepository::new(&self.pool)
            .find_employee(account_id)
            .await
    }
}

pub struct NewAccount<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub is_verified: bool,
}

pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, email, password_hash, is_verified, role_code
            FROM accounts
            WHERE username = ? OR email = ?
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .bind(identifier)
        .fetch_optional(self.pool)
        .await
        .context("Failed to look up account")?;

        Ok(account)
    }

    pub async fn create(&self, account: NewAccount<'_>) -> Result<Account> {
        let mut conn = self.pool.acquire().await?;
        insert_account(&mut conn, account).await
    }

    /// Mark the account verified. Returns false when nothing matched.
    pub async fn mark_verified(&self, identifier: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET is_verified = TRUE
            WHERE username = ? OR email = ?
            "#,
        )
        .bind(identifier)
        .bind(identifier)
        .execute(self.pool)
        .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Verified account: {}", identifier);
        }

        Ok(updated)
    }

    pub async fn list(&self) -> Result<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, email, password_hash, is_verified, role_code
            FROM accounts
            ORDER BY username ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(accounts)
    }
}

#[derive(sqlx::FromRow)]
struct JobSeekerRow {
    id: i64,
    account_id: i64,
    headline: Option<String>,
    preferred_category_id: Option<i64>,
    person_id: i64,
    first_name: String,
    last_name: String,
    phone: Option<String>,
}

impl From<JobSeekerRow> for JobSeekerProfile {
    fn from(row: JobSeekerRow) -> Self {
        Self {
            id: row.id,
            account_id: row.account_id,
            headline: row.headline,
            preferred_category_id: row.preferred_category_id,
            person: Person {
                id: row.person_id,
                first_name: row.first_name,
                last_name: row.last_name,
                phone: row.phone,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: i64,
    account_id: i64,
    position: Option<String>,
    person_id: i64,
    first_name: String,
    last_name: String,
    phone: Option<String>,
    company_id: i64,
    company_name: String,
    industry: Option<String>,
    company_location: Option<String>,
}

impl From<EmployeeRow> for EmployeeProfile {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: row.id,
            account_id: row.account_id,
            position: row.position,
            person: Person {
                id: row.person_id,
                first_name: row.first_name,
                last_name: row.last_name,
                phone: row.phone,
            },
            company: Company {
                id: row.company_id,
                name: row.company_name,
                industry: row.industry,
                location: row.company_location,
            },
        }
    }
}

pub struct ProfileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_job_seeker(&self, account_id: i64) -> Result<Option<JobSeekerProfile>> {
        let row = sqlx::query_as::<_, JobSeekerRow>(
            r#"
            SELECT js.id, js.account_id, js.headline, js.preferred_category_id,
                   p.id AS person_id, p.first_name, p.last_name, p.phone
            FROM job_seekers js
            JOIN persons p ON p.id = js.person_id
            WHERE js.account_id = ?
            "#,
        )
        .bind(account_id)
        .fetch_optional(self.pool)
        .await
        .context("Failed to load job seeker profile")?;

        Ok(row.map(JobSeekerProfile::from))
    }

    pub async fn find_employee(&self, account_id: i64) -> Result<Option<EmployeeProfile>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT e.id, e.account_id, e.position,
                   p.id AS person_id, p.first_name, p.last_name, p.phone,
                   c.id AS company_id, c.name AS company_name, c.industry,
                   c.location AS company_location
            FROM employees e
            JOIN persons p ON p.id = e.person_id
            JOIN companies c ON c.id = e.company_id
            WHERE e.account_id = ?
            "#,
        )
        .bind(account_id)
        .fetch_optional(self.pool)
        .await
        .context("Failed to load employee profile")?;

        Ok(row.map(EmployeeProfile::from))
    }

    pub async fn create_job_seeker(
        &self,
        account_id: i64,
        first_name: &str,
        last_name: &str,
        preferred_category_id: Option<i64>,
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;
        let id = insert_job_seeker(&mut tx, account_id, first_name, last_name, preferred_category_id).await?;
        tx.commit().await?;
        Ok(id)
    }

    pub async fn create_employee(
        &self,
        account_id: i64,
        first_name: &str,
        last_name: &str,
        company_id: i64,
        position: Option<&str>,
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;
        let id = insert_employee(&mut tx, account_id, first_name, last_name, company_id, position).await?;
        tx.commit().await?;
        Ok(id)
    }
}

pub async fn insert_account(conn: &mut SqliteConnection, account: NewAccount<'_>) -> Result<Account> {
    let result = sqlx::query(
        r#"
        INSERT INTO accounts (username, email, password_hash, is_verified, role_code)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(account.username)
    .bind(account.email)
    .bind(account.password_hash)
    .bind(account.is_verified)
    .bind(account.role.code())
    .execute(&mut *conn)
    .await
    .with_context(|| format!("Failed to create account: {}", account.username))?;

    info!("Created {} account: {}", account.role, account.username);

    Ok(Account {
        id: result.last_insert_rowid(),
        username: account.username.to_string(),
        email: account.email.to_string(),
        password_hash: account.password_hash.to_string(),
        is_verified: account.is_verified,
        role_code: account.role.code(),
    })
}

/// Insert the person and job seeker rows for `account_id`.
pub async fn insert_job_seeker(
    conn: &mut SqliteConnection,
    account_id: i64,
    first_name: &str,
    last_name: &str,
    preferred_category_id: Option<i64>,
) -> Result<i64> {
    let person_id = insert_person(conn, first_name, last_name).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO job_seekers (account_id, person_id, preferred_category_id)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(account_id)
    .bind(person_id)
    .bind(preferred_category_id)
    .execute(&mut *conn)
    .await
    .context("Failed to create job seeker profile")?;

    Ok(result.last_insert_rowid())
}

/// Insert the person and employee rows for `account_id`.
pub async fn insert_employee(
    conn: &mut SqliteConnection,
    account_id: i64,
    first_name: &str,
    last_name: &str,
    company_id: i64,
    position: Option<&str>,
) -> Result<i64> {
    let person_id = insert_person(conn, first_name, last_name).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO employees (account_id, person_id, company_id, position)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(account_id)
    .bind(person_id)
    .bind(company_id)
    .bind(position)
    .execute(&mut *conn)
    .await
    .context("Failed to create employee profile")?;

    Ok(result.last_insert_rowid())
}

async fn insert_person(conn: &mut SqliteConnection, first_name: &str, last_name: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO persons (first_name, last_name) VALUES (?, ?)")
        .bind(first_name)
        .bind(last_name)
        .execute(&mut *conn)
        .await
        .context("Failed to create person")?;

    Ok(result.last_insert_rowid())
}
