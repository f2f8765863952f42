// src/database/postings.rs
use crate::types::{Posting, PostingFilter};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::info;

const POSTING_SELECT: &str = r#"
    SELECT p.id, p.company_id, c.name AS company_name, p.title, p.description,
           p.requirements, p.benefits, p.location, p.salary_min, p.salary_max,
           p.job_type_id, jt.name AS job_type_name,
           p.category_id, cat.name AS category_name,
           p.is_active, p.posted_date, p.closing_date, p.views
    FROM postings p
    LEFT JOIN companies c ON c.id = p.company_id
    LEFT JOIN job_types jt ON jt.id = p.job_type_id
    LEFT JOIN categories cat ON cat.id = p.category_id
"#;

const OPEN_POSTINGS: &str =
    " WHERE p.is_active = TRUE AND (p.closing_date IS NULL OR p.closing_date >= ?)";

#[derive(Debug, Clone)]
pub struct NewPosting {
    pub company_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub job_type_id: Option<i64>,
    pub category_id: Option<i64>,
    pub posted_date: DateTime<Utc>,
    pub closing_date: Option<DateTime<Utc>>,
}

pub struct PostingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PostingRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Open postings passing the structured filters and matching the text
    /// criteria, newest first. Every match is returned; ranking is left to
    /// the scorer.
    pub async fn search_candidates(&self, filter: &PostingFilter, now: DateTime<Utc>) -> Result<Vec<Posting>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(POSTING_SELECT);
        qb.push(" WHERE p.is_active = TRUE AND (p.closing_date IS NULL OR p.closing_date >= ")
            .push_bind(now)
            .push(")");

        if let Some(category_id) = filter.category_id {
            qb.push(" AND p.category_id = ").push_bind(category_id);
        }

        if let Some(job_type_id) = filter.job_type_id {
            qb.push(" AND p.job_type_id = ").push_bind(job_type_id);
        }

        if let Some(min_salary) = filter.min_salary {
            qb.push(" AND COALESCE(p.salary_max, p.salary_min) >= ")
                .push_bind(min_salary);
        }

        qb.push(" ORDER BY p.posted_date DESC, p.id ASC");

        let mut postings = qb
            .build_query_as::<Posting>()
            .fetch_all(self.pool)
            .await
            .context("Failed to search postings")?;

        // Keywords and location: plain substrings, Unicode case folding.
        postings.retain(|posting| filter.matches_text(posting));

        Ok(postings)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Posting>> {
        let sql = format!("{} WHERE p.id = ?", POSTING_SELECT);
        let posting = sqlx::query_as::<_, Posting>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .context("Failed to load posting")?;

        Ok(posting)
    }

    pub async fn record_view(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE postings SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn newest_in_category(&self, category_id: i64, now: DateTime<Utc>, limit: i64) -> Result<Vec<Posting>> {
        let sql = format!(
            "{}{} AND p.category_id = ? ORDER BY p.posted_date DESC, p.id ASC LIMIT ?",
            POSTING_SELECT, OPEN_POSTINGS
        );
        let postings = sqlx::query_as::<_, Posting>(&sql)
            .bind(now)
            .bind(category_id)
            .bind(limit)
            .fetch_all(self.pool)
            .await
            .context("Failed to load category postings")?;

        Ok(postings)
    }

    /// Postings in the other categories sharing a field with `category_id`.
    pub async fn newest_in_related_categories(
        &self,
        category_id: i64,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Posting>> {
        let sql = format!(
            r#"{}{} AND p.category_id IN (
                SELECT related.id FROM categories related
                JOIN categories origin ON origin.field_id = related.field_id
                WHERE origin.id = ? AND related.id != origin.id
            )
            ORDER BY p.posted_date DESC, p.id ASC LIMIT ?"#,
            POSTING_SELECT, OPEN_POSTINGS
        );
        let postings = sqlx::query_as::<_, Posting>(&sql)
            .bind(now)
            .bind(category_id)
            .bind(limit)
            .fetch_all(self.pool)
            .await
            .context("Failed to load related category postings")?;

        Ok(postings)
    }

    pub async fn popular(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Posting>> {
        let sql = format!(
            "{}{} ORDER BY p.views DESC, p.posted_date DESC, p.id ASC LIMIT ?",
            POSTING_SELECT, OPEN_POSTINGS
        );
        let postings = sqlx::query_as::<_, Posting>(&sql)
            .bind(now)
            .bind(limit)
            .fetch_all(self.pool)
            .await
            .context("Failed to load popular postings")?;

        Ok(postings)
    }

    pub async fn create(&self, posting: &NewPosting) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO postings (company_id, title, description, requirements, benefits,
                                  location, salary_min, salary_max, job_type_id, category_id,
                                  is_active, posted_date, closing_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, TRUE, ?, ?)
            "#,
        )
        .bind(posting.company_id)
        .bind(&posting.title)
        .bind(&posting.description)
        .bind(&posting.requirements)
        .bind(&posting.benefits)
        .bind(&posting.location)
        .bind(posting.salary_min)
        .bind(posting.salary_max)
        .bind(posting.job_type_id)
        .bind(posting.category_id)
        .bind(posting.posted_date)
        .bind(posting.closing_date)
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to create posting: {}", posting.title))?;

        Ok(result.last_insert_rowid())
    }

    pub async fn deactivate(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE postings SET is_active = FALSE WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            info!("Deactivated posting: {}", id);
        }

        Ok(updated)
    }

    pub async fn find_or_create_company(&self, name: &str) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        find_or_create_lookup(&mut conn, Lookup::Company, name).await
    }

    pub async fn find_or_create_job_type(&self, name: &str) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        find_or_create_lookup(&mut conn, Lookup::JobType, name).await
    }

    pub async fn find_or_create_field(&self, name: &str) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        find_or_create_lookup(&mut conn, Lookup::Field, name).await
    }

    /// Find a category by name, attaching it to `field_id` when it has none.
    pub async fn find_or_create_category(&self, name: &str, field_id: Option<i64>) -> Result<i64> {
        let mut conn = self.pool.acquire().await?;
        let id = find_or_create_lookup(&mut conn, Lookup::Category, name).await?;

        if let Some(field_id) = field_id {
            sqlx::query("UPDATE categories SET field_id = ? WHERE id = ? AND field_id IS NULL")
                .bind(field_id)
                .bind(id)
                .execute(&mut *conn)
                .await?;
        }

        Ok(id)
    }
}

/// Name-keyed lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Company,
    Field,
    Category,
    JobType,
}

impl Lookup {
    fn table(self) -> &'static str {
        match self {
            Lookup::Company => "companies",
            Lookup::Field => "fields",
            Lookup::Category => "categories",
            Lookup::JobType => "job_types",
        }
    }
}

/// Id of the `lookup` row named `name`, inserting it if missing. Takes a
/// connection so callers can run it inside a transaction.
pub async fn find_or_create_lookup(conn: &mut SqliteConnection, lookup: Lookup, name: &str) -> Result<i64> {
    let table = lookup.table();
    let select = format!("SELECT id FROM {} WHERE name = ?", table);
    let existing: Option<(i64,)> = sqlx::query_as(&select)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    if let Some((id,)) = existing {
        return Ok(id);
    }

    let insert = format!("INSERT INTO {} (name) VALUES (?)", table);
    let result = sqlx::query(&insert)
        .bind(name)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Failed to create {} entry: {}", table, name))?;

    info!("Created {} entry: {}", table, name);
    Ok(result.last_insert_rowid())
}
