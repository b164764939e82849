//! Activity log repository.
//!
//! The activity log is an audit trail, not a dependency of any primary
//! operation: a failed log write is reported through tracing and dropped,
//! never propagated to the caller.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::activity_logs;

/// Records an activity line, discarding failures.
pub(crate) async fn log_activity(
    db: &DatabaseConnection,
    action: &str,
    entity_type: &str,
    entity_id: Uuid,
    detail: &str,
) {
    let model = activity_logs::ActiveModel {
        id: Set(Uuid::new_v4()),
        action: Set(action.to_string()),
        entity_type: Set(entity_type.to_string()),
        entity_id: Set(entity_id),
        detail: Set(detail.to_string()),
        created_at: Set(Utc::now().into()),
    };

    if let Err(err) = model.insert(db).await {
        tracing::warn!(%entity_id, action, "failed to record activity log: {err}");
    }
}

/// Activity log repository for audit queries.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    db: DatabaseConnection,
}

impl ActivityRepository {
    /// Creates a new activity repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an activity line, discarding failures.
    pub async fn record(&self, action: &str, entity_type: &str, entity_id: Uuid, detail: &str) {
        log_activity(&self.db, action, entity_type, entity_id, detail).await;
    }

    /// Returns the most recent activity lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn recent(&self, limit: u64) -> Result<Vec<activity_logs::Model>, DbErr> {
        activity_logs::Entity::find()
            .order_by_desc(activity_logs::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Returns the activity lines for one entity, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn for_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> Result<Vec<activity_logs::Model>, DbErr> {
        activity_logs::Entity::find()
            .filter(activity_logs::Column::EntityType.eq(entity_type))
            .filter(activity_logs::Column::EntityId.eq(entity_id))
            .order_by_desc(activity_logs::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}
