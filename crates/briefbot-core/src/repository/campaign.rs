//! Campaign repository trait definition.

use briefbot_types::error::RepositoryError;
use briefbot_types::record::{Campaign, NewCampaign};
use uuid::Uuid;

/// Repository trait for campaign record persistence.
///
/// Implementations live in briefbot-infra (e.g., SqliteCampaignRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
/// The intake service never retries a failed insert; whether the user may
/// resubmit is the caller's decision.
pub trait CampaignRepository: Send + Sync {
    /// Persist a finished record. Returns the new campaign's id.
    fn insert(
        &self,
        campaign: &NewCampaign,
    ) -> impl std::future::Future<Output = Result<Uuid, RepositoryError>> + Send;

    /// Get a persisted campaign by its unique id.
    fn get_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Campaign>, RepositoryError>> + Send;

    /// List a user's campaigns, newest first.
    fn list_for_user(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Campaign>, RepositoryError>> + Send;
}
