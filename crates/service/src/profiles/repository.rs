use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{CompleteProfileInput, Profile, ProfileUpdate};
use super::errors::ProfileError;

/// Repository abstraction for profile persistence.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>, ProfileError>;
    async fn create(&self, id: Uuid, input: &CompleteProfileInput) -> Result<Profile, ProfileError>;
    async fn update_contact(&self, id: Uuid, change: &ProfileUpdate) -> Result<Profile, ProfileError>;
    async fn list(&self) -> Result<Vec<Profile>, ProfileError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockProfileRepository {
        rows: Mutex<HashMap<Uuid, Profile>>, // key: user id
    }

    fn blank_to_none(v: &Option<String>) -> Option<String> {
        v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
    }

    impl MockProfileRepository {
        /// Insert a profile directly, e.g. an admin provisioned out of band.
        pub fn seed(&self, profile: Profile) {
            self.rows.lock().unwrap().insert(profile.id, profile);
        }
    }

    #[async_trait]
    impl ProfileRepository for MockProfileRepository {
        async fn get(&self, id: Uuid) -> Result<Option<Profile>, ProfileError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn create(&self, id: Uuid, input: &CompleteProfileInput) -> Result<Profile, ProfileError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.contains_key(&id) {
                return Err(ProfileError::AlreadyExists);
            }
            let now = Utc::now();
            let p = Profile {
                id,
                full_name: input.full_name.trim().to_string(),
                role: input.role,
                phone: blank_to_none(&input.phone),
                avatar_url: blank_to_none(&input.avatar_url),
                bio: blank_to_none(&input.bio),
                rating: 0.0,
                completed_jobs: 0,
                created_at: now,
                updated_at: now,
            };
            rows.insert(id, p.clone());
            Ok(p)
        }

        async fn update_contact(&self, id: Uuid, change: &ProfileUpdate) -> Result<Profile, ProfileError> {
            let mut rows = self.rows.lock().unwrap();
            let p = rows.get_mut(&id).ok_or(ProfileError::NotFound)?;
            if let Some(name) = &change.full_name {
                p.full_name = name.trim().to_string();
            }
            if change.phone.is_some() { p.phone = blank_to_none(&change.phone); }
            if change.avatar_url.is_some() { p.avatar_url = blank_to_none(&change.avatar_url); }
            if change.bio.is_some() { p.bio = blank_to_none(&change.bio); }
            p.updated_at = Utc::now();
            Ok(p.clone())
        }

        async fn list(&self) -> Result<Vec<Profile>, ProfileError> {
            let mut all: Vec<Profile> = self.rows.lock().unwrap().values().cloned().collect();
            all.sort_by_key(|p| p.created_at);
            Ok(all)
        }
    }
}
