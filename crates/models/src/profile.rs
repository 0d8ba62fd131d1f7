use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const ROLE_CLIENT: &str = "client";
pub const ROLE_SPECIALIST: &str = "specialist";
pub const ROLE_ADMIN: &str = "admin";

pub const ROLES: [&str; 3] = [ROLE_CLIENT, ROLE_SPECIALIST, ROLE_ADMIN];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    pub role: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub completed_jobs: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted when a profile row is first written.
#[derive(Debug, Clone)]
pub struct NewProfile<'a> {
    pub id: Uuid,
    pub full_name: &'a str,
    pub role: &'a str,
    pub phone: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub bio: Option<&'a str>,
}

/// Editable display fields. `None` leaves the column untouched; role is not here on purpose.
#[derive(Debug, Clone, Default)]
pub struct ContactChange {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

pub fn validate_full_name(name: &str) -> Result<(), ModelError> {
    let len = name.trim().chars().count();
    if len == 0 { return Err(ModelError::Validation("full_name required".into())); }
    if len > 128 { return Err(ModelError::Validation("full_name too long (<=128)".into())); }
    Ok(())
}

pub fn validate_role(role: &str) -> Result<(), ModelError> {
    if !ROLES.contains(&role) {
        return Err(ModelError::Validation(format!("invalid role: {role}")));
    }
    Ok(())
}

fn blank_to_none(v: Option<&str>) -> Option<String> {
    v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewProfile<'_>) -> Result<Model, ModelError> {
    validate_full_name(input.full_name)?;
    validate_role(input.role)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(input.id),
        full_name: Set(input.full_name.trim().to_string()),
        role: Set(input.role.to_string()),
        phone: Set(blank_to_none(input.phone)),
        avatar_url: Set(blank_to_none(input.avatar_url)),
        bio: Set(blank_to_none(input.bio)),
        rating: Set(0.0),
        completed_jobs: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::CreatedAt).all(db).await?)
}

pub async fn update_contact<C: ConnectionTrait>(db: &C, id: Uuid, change: ContactChange) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ModelError::NotFound("profile"))?
        .into();
    if let Some(name) = change.full_name {
        validate_full_name(&name)?;
        am.full_name = Set(name.trim().to_string());
    }
    if let Some(phone) = change.phone { am.phone = Set(blank_to_none(Some(&phone))); }
    if let Some(url) = change.avatar_url { am.avatar_url = Set(blank_to_none(Some(&url))); }
    if let Some(bio) = change.bio { am.bio = Set(blank_to_none(Some(&bio))); }
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}
