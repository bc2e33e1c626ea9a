//! SQLite campaign repository implementation.
//!
//! Implements `CampaignRepository` from `briefbot-core` using sqlx with
//! split read/write pools. The coerced record is stored as a JSON TEXT
//! column since field schemas vary per form revision.

use briefbot_core::repository::campaign::CampaignRepository;
use briefbot_types::error::RepositoryError;
use briefbot_types::record::{Campaign, CampaignRecord, NewCampaign};
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `CampaignRepository`.
pub struct SqliteCampaignRepository {
    pool: DatabasePool,
}

impl SqliteCampaignRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Campaign.
struct CampaignRow {
    id: String,
    user_id: String,
    form_revision: String,
    payload: String,
    created_at: String,
}

impl CampaignRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            form_revision: row.try_get("form_revision")?,
            payload: row.try_get("payload")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_campaign(self) -> Result<Campaign, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid campaign id: {e}")))?;

        let record: CampaignRecord = serde_json::from_str(&self.payload)
            .map_err(|e| RepositoryError::Query(format!("invalid payload JSON: {e}")))?;

        let created_at = parse_datetime(&self.created_at)?;

        Ok(Campaign {
            id,
            user_id: self.user_id,
            form_revision: self.form_revision,
            record,
            created_at,
        })
    }
}

/// Pool-level and I/O failures are connection errors; everything else is a
/// query error carrying the driver message.
fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            RepositoryError::Connection(e.to_string())
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

impl CampaignRepository for SqliteCampaignRepository {
    async fn insert(&self, campaign: &NewCampaign) -> Result<Uuid, RepositoryError> {
        let id = Uuid::now_v7();
        let payload = serde_json::to_string(&campaign.record)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO campaigns (id, user_id, form_revision, payload, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&campaign.user_id)
        .bind(&campaign.form_revision)
        .bind(&payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        tracing::debug!(campaign_id = %id, user_id = %campaign.user_id, "campaign inserted");
        Ok(id)
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Campaign>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM campaigns WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let campaign_row = CampaignRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(campaign_row.into_campaign()?))
            }
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Campaign>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM campaigns WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| {
                let campaign_row = CampaignRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                campaign_row.into_campaign()
            })
            .collect()
    }
}
