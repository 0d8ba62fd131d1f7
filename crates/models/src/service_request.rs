use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::profile;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub specialist_id: Option<Uuid>,
    pub service_type: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub location: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub price: Option<f64>,
    pub preferred_date: Option<Date>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub completed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Client,
    Specialist,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Client => Entity::belongs_to(profile::Entity)
                .from(Column::ClientId)
                .to(profile::Column::Id)
                .into(),
            Relation::Specialist => Entity::belongs_to(profile::Entity)
                .from(Column::SpecialistId)
                .to(profile::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Row fields supplied by the submitting client. Status and assignment are not part of it.
#[derive(Debug, Clone)]
pub struct Draft<'a> {
    pub client_id: Uuid,
    pub service_type: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub price: Option<f64>,
    pub preferred_date: Option<Date>,
}

/// Expected value of `specialist_id` at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Unassigned,
    AssignedTo(Uuid),
}

/// Row state that must still hold for a conditional update to apply.
#[derive(Debug, Clone, Copy)]
pub struct Guard {
    pub status: &'static str,
    pub assignment: Assignment,
    pub client_id: Option<Uuid>,
}

/// Columns written by a conditional update.
#[derive(Debug, Clone, Copy)]
pub struct Change {
    pub status: &'static str,
    pub specialist_id: Option<Uuid>,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub updated_at: DateTimeWithTimeZone,
}

pub fn validate_required(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} required")));
    }
    Ok(())
}

pub fn validate_price(price: Option<f64>) -> Result<(), ModelError> {
    match price {
        Some(p) if !p.is_finite() => Err(ModelError::Validation("price must be a finite number".into())),
        Some(p) if p < 0.0 => Err(ModelError::Validation("price must be >= 0".into())),
        _ => Ok(()),
    }
}

/// Insert a request in `pending` with no specialist.
pub async fn create<C: ConnectionTrait>(db: &C, draft: Draft<'_>) -> Result<Model, ModelError> {
    validate_required("service_type", draft.service_type)?;
    validate_required("description", draft.description)?;
    validate_required("location", draft.location)?;
    validate_price(draft.price)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(draft.client_id),
        specialist_id: Set(None),
        service_type: Set(draft.service_type.trim().to_string()),
        description: Set(draft.description.trim().to_string()),
        location: Set(draft.location.trim().to_string()),
        price: Set(draft.price),
        preferred_date: Set(draft.preferred_date),
        status: Set(STATUS_PENDING.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        completed_at: Set(None),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// `UPDATE ... WHERE <guard> RETURNING *` in one statement.
///
/// Returns `None` when the guard no longer holds; the database decides between
/// concurrent writers, callers must not re-check with a separate read.
pub async fn update_if<C: ConnectionTrait>(db: &C, id: Uuid, guard: Guard, change: Change) -> Result<Option<Model>, ModelError> {
    let mut update = Entity::update_many()
        .col_expr(Column::Status, Expr::value(change.status))
        .col_expr(Column::SpecialistId, Expr::value(change.specialist_id))
        .col_expr(Column::CompletedAt, Expr::value(change.completed_at))
        .col_expr(Column::UpdatedAt, Expr::value(change.updated_at))
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(guard.status));
    update = match guard.assignment {
        Assignment::Unassigned => update.filter(Column::SpecialistId.is_null()),
        Assignment::AssignedTo(sid) => update.filter(Column::SpecialistId.eq(sid)),
    };
    if let Some(cid) = guard.client_id {
        update = update.filter(Column::ClientId.eq(cid));
    }
    let rows = update.exec_with_returning(db).await?;
    Ok(rows.into_iter().next())
}
