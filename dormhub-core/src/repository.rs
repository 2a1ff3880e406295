use async_trait::async_trait;
use uuid::Uuid;

use crate::identity::Profile;
use crate::notify::Notification;

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Stored profile plus its credential hash, for the login path only.
#[derive(Debug, Clone)]
pub struct ProfileRecord {
    pub profile: Profile,
    pub password_hash: String,
}

/// Repository trait for profile data access
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create(&self, profile: &Profile, password_hash: &str) -> Result<(), RepoError>;

    async fn get(&self, id: Uuid) -> Result<Option<Profile>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<ProfileRecord>, RepoError>;

    async fn update_contact(
        &self,
        id: Uuid,
        full_name: &str,
        phone_number: &str,
    ) -> Result<bool, RepoError>;

    async fn list_all(&self) -> Result<Vec<Profile>, RepoError>;
}

/// Repository trait for notification data access
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn push(&self, notification: &Notification) -> Result<(), RepoError>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, RepoError>;

    /// Marks one of the caller's notifications read. Returns false when the
    /// notification does not exist or belongs to someone else.
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;
}
