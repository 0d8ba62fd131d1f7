use chrono::Utc;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use models::errors::ModelError;
use models::profile::{self as row, ContactChange, NewProfile};

use crate::profiles::domain::{CompleteProfileInput, Profile, ProfileUpdate};
use crate::profiles::errors::ProfileError;
use crate::profiles::repository::ProfileRepository;

pub struct SeaOrmProfileRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn map_err(e: ModelError) -> ProfileError {
    match e {
        ModelError::Validation(msg) => ProfileError::Validation(msg),
        ModelError::NotFound(_) => ProfileError::NotFound,
        // 主键冲突：同一用户并发提交注册
        ModelError::Conflict(_) => ProfileError::AlreadyExists,
        other => ProfileError::Repository(other.to_string()),
    }
}

fn to_domain(m: row::Model) -> Result<Profile, ProfileError> {
    let role = m
        .role
        .parse()
        .map_err(|e: String| ProfileError::Repository(format!("unexpected role in store: {e}")))?;
    Ok(Profile {
        id: m.id,
        full_name: m.full_name,
        role,
        phone: m.phone,
        avatar_url: m.avatar_url,
        bio: m.bio,
        rating: m.rating,
        completed_jobs: m.completed_jobs,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    })
}

#[async_trait::async_trait]
impl ProfileRepository for SeaOrmProfileRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>, ProfileError> {
        row::find_by_id(&self.db, id).await.map_err(map_err)?.map(to_domain).transpose()
    }

    async fn create(&self, id: Uuid, input: &CompleteProfileInput) -> Result<Profile, ProfileError> {
        let created = row::create(
            &self.db,
            NewProfile {
                id,
                full_name: &input.full_name,
                role: input.role.as_str(),
                phone: input.phone.as_deref(),
                avatar_url: input.avatar_url.as_deref(),
                bio: input.bio.as_deref(),
            },
        )
        .await
        .map_err(map_err)?;
        to_domain(created)
    }

    async fn update_contact(&self, id: Uuid, change: &ProfileUpdate) -> Result<Profile, ProfileError> {
        let updated = row::update_contact(
            &self.db,
            id,
            ContactChange {
                full_name: change.full_name.clone(),
                phone: change.phone.clone(),
                avatar_url: change.avatar_url.clone(),
                bio: change.bio.clone(),
            },
        )
        .await
        .map_err(map_err)?;
        to_domain(updated)
    }

    async fn list(&self) -> Result<Vec<Profile>, ProfileError> {
        row::list(&self.db).await.map_err(map_err)?.into_iter().map(to_domain).collect()
    }
}
