use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dormhub_core::identity::{Profile, Role};
use dormhub_core::repository::{ProfileRecord, ProfileRepository, RepoError};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    email: String,
    password_hash: String,
    full_name: String,
    phone_number: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_record(self) -> ProfileRecord {
        ProfileRecord {
            profile: Profile {
                id: self.id,
                email: self.email,
                full_name: self.full_name,
                phone_number: self.phone_number,
                // Lenient parse: stored role text is validated once, here.
                role: Role::parse_lenient(&self.role),
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            password_hash: self.password_hash,
        }
    }
}

const PROFILE_COLUMNS: &str =
    "id, email, password_hash, full_name, phone_number, role, created_at, updated_at";

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn create(&self, profile: &Profile, password_hash: &str) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO profiles (id, email, password_hash, full_name, phone_number, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(profile.id)
        .bind(&profile.email)
        .bind(password_hash)
        .bind(&profile.full_name)
        .bind(&profile.phone_number)
        .bind(profile.role.to_string())
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Profile>, RepoError> {
        let row: Option<ProfileRow> = sqlx::query_as(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_record().profile))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<ProfileRecord>, RepoError> {
        let row: Option<ProfileRow> = sqlx::query_as(&format!(
            "SELECT {} FROM profiles WHERE email = $1",
            PROFILE_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ProfileRow::into_record))
    }

    async fn update_contact(
        &self,
        id: Uuid,
        full_name: &str,
        phone_number: &str,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query(
            "UPDATE profiles SET full_name = $1, phone_number = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(full_name)
        .bind(phone_number)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_all(&self) -> Result<Vec<Profile>, RepoError> {
        let rows: Vec<ProfileRow> = sqlx::query_as(&format!(
            "SELECT {} FROM profiles ORDER BY created_at DESC",
            PROFILE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.into_record().profile).collect())
    }
}
