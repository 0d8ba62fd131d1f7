use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::domain::{check_full_name, CompleteProfileInput, Profile, ProfileUpdate};
use super::errors::ProfileError;
use super::repository::ProfileRepository;
use crate::identity::{Actor, Role};

/// Profile business service independent of web framework
pub struct ProfileService<P: ProfileRepository + ?Sized> {
    repo: Arc<P>,
}

impl<P: ProfileRepository + ?Sized> ProfileService<P> {
    pub fn new(repo: Arc<P>) -> Self { Self { repo } }

    /// Attach a role and display data to a freshly authenticated user.
    ///
    /// # Examples
    /// ```
    /// use service::profiles::{ProfileService, CompleteProfileInput};
    /// use service::profiles::repository::mock::MockProfileRepository;
    /// use service::Role;
    /// use std::sync::Arc;
    /// let svc = ProfileService::new(Arc::new(MockProfileRepository::default()));
    /// let uid = uuid::Uuid::new_v4();
    /// let input = CompleteProfileInput { full_name: "Ana".into(), role: Role::Client, phone: None, avatar_url: None, bio: None };
    /// let p = tokio_test::block_on(svc.complete_signup(uid, input)).unwrap();
    /// assert_eq!(p.role, Role::Client);
    /// ```
    #[instrument(skip(self, input), fields(user_id = %user_id, role = %input.role))]
    pub async fn complete_signup(&self, user_id: Uuid, input: CompleteProfileInput) -> Result<Profile, ProfileError> {
        if input.role == Role::Admin {
            warn!(user_id = %user_id, "admin_self_signup_denied");
            return Err(ProfileError::Forbidden("admin profiles are provisioned by operators".into()));
        }
        check_full_name(&input.full_name)?;
        if self.repo.get(user_id).await?.is_some() {
            return Err(ProfileError::AlreadyExists);
        }
        let p = self.repo.create(user_id, &input).await?;
        info!(user_id = %p.id, role = %p.role, "profile_completed");
        Ok(p)
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Profile, ProfileError> {
        self.repo.get(user_id).await?.ok_or(ProfileError::NotFound)
    }

    /// Build the acting identity from a verified user id. `None` if the user has not
    /// completed their profile yet.
    pub async fn resolve_actor(&self, user_id: Uuid, email: Option<String>) -> Result<Option<Actor>, ProfileError> {
        let Some(p) = self.repo.get(user_id).await? else { return Ok(None) };
        let mut actor = Actor::new(p.id, p.role);
        if let Some(email) = email {
            actor = actor.with_email(email);
        }
        Ok(Some(actor))
    }

    #[instrument(skip(self, change), fields(user_id = %actor.id))]
    pub async fn update_me(&self, actor: &Actor, change: ProfileUpdate) -> Result<Profile, ProfileError> {
        if let Some(name) = &change.full_name {
            check_full_name(name)?;
        }
        let p = self.repo.update_contact(actor.id, &change).await?;
        info!(user_id = %p.id, "profile_updated");
        Ok(p)
    }

    /// Every profile. Admin only.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<Profile>, ProfileError> {
        if actor.role != Role::Admin {
            return Err(ProfileError::Forbidden("only admins list profiles".into()));
        }
        self.repo.list().await
    }

    /// Every profile, for internal aggregation where the caller is already authorized.
    pub(crate) async fn all(&self) -> Result<Vec<Profile>, ProfileError> {
        self.repo.list().await
    }
}
