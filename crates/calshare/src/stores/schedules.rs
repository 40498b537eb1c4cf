use std::sync::Arc;

use chrono::Utc;

use calshare_core::calendar::{
    validation::{check_id, check_string},
    CreateScheduleRequest, RecordId, Schedule, UpdateScheduleRequest, Validator,
};
use calshare_core::storage::{
    RepositoryError, ScheduleRepository, StoreError, StoreResult, UserRepository,
};

use super::parse_id;

/// CRUD over schedules.
#[derive(Clone)]
pub struct ScheduleStore {
    users: Arc<dyn UserRepository>,
    schedules: Arc<dyn ScheduleRepository>,
}

impl ScheduleStore {
    pub fn new(users: Arc<dyn UserRepository>, schedules: Arc<dyn ScheduleRepository>) -> Self {
        Self { users, schedules }
    }

    /// Creates a schedule owned by an existing user and returns its id.
    pub async fn create_schedule(&self, payload: CreateScheduleRequest) -> StoreResult<RecordId> {
        let mut validator = Validator::new();
        let user_id = validator.check(check_id(&payload.user_id, "userId"));
        let name = validator.check(check_string(&payload.name, "Schedule Name"));
        let (Some(user_id), Some(name)) = (user_id, name) else {
            return Err(validator.into());
        };

        if self.users.get_user(&user_id).await?.is_none() {
            return Err(StoreError::not_found("User not found with this userId"));
        }

        let schedule = Schedule::new(user_id, name);
        self.schedules.create_schedule(&schedule).await?;

        tracing::info!(
            schedule_id = %schedule.id,
            user_id = %schedule.user_id,
            name = %schedule.name,
            "Created schedule"
        );

        Ok(schedule.id)
    }

    /// Absence is not an error here.
    pub async fn get_schedule_by_id(&self, id: &str) -> StoreResult<Option<Schedule>> {
        let id = parse_id(id, "scheduleId")?;
        Ok(self.schedules.get_schedule(&id).await?)
    }

    pub async fn get_schedule_by_user(&self, user_id: &str) -> StoreResult<Vec<Schedule>> {
        let user_id = parse_id(user_id, "userId")?;
        let schedules = self.schedules.get_schedules_by_user(&user_id).await?;
        if schedules.is_empty() {
            return Err(StoreError::not_found("No schedules found for this user"));
        }
        Ok(schedules)
    }

    pub async fn remove_schedule(&self, id: &str) -> StoreResult<()> {
        let id = parse_id(id, "scheduleId")?;

        if self.schedules.get_schedule(&id).await?.is_none() {
            return Err(StoreError::not_found("Schedule with that id does not exist"));
        }
        if !self.schedules.delete_schedule(&id).await? {
            tracing::error!(schedule_id = %id, "Schedule delete reported no effect");
            return Err(StoreError::write_failed("Could not delete that schedule"));
        }

        tracing::info!(schedule_id = %id, "Deleted schedule");
        Ok(())
    }

    /// Applies the provided fields. Only those fields are validated, and at
    /// least one must be given.
    pub async fn update_schedule(
        &self,
        id: &str,
        payload: UpdateScheduleRequest,
    ) -> StoreResult<Schedule> {
        let mut validator = Validator::new();
        let id = validator.check(check_id(id, "scheduleId"));
        let provided = validator.check(if payload.is_empty() {
            Err("Provide a userId or a name to update".to_string())
        } else {
            Ok(())
        });
        let user_id = validator.check(
            payload
                .user_id
                .as_deref()
                .map(|v| check_id(v, "userId"))
                .transpose(),
        );
        let name = validator.check(
            payload
                .name
                .as_deref()
                .map(|v| check_string(v, "Schedule Name"))
                .transpose(),
        );
        let (Some(id), Some(()), Some(user_id), Some(name)) = (id, provided, user_id, name) else {
            return Err(validator.into());
        };

        let mut schedule = self
            .schedules
            .get_schedule(&id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("Schedule not found with id {id}")))?;

        if let Some(user_id) = user_id {
            if self.users.get_user(&user_id).await?.is_none() {
                return Err(StoreError::not_found("User not found with this userId"));
            }
            schedule.user_id = user_id;
        }
        if let Some(name) = name {
            schedule.name = name;
        }
        schedule.updated_at = Utc::now();

        self.schedules
            .update_schedule(&schedule)
            .await
            .map_err(|e| {
                tracing::error!(
                    schedule_id = %schedule.id,
                    error = %e,
                    "Failed to update schedule"
                );
                match e {
                    RepositoryError::NotFound { .. } => {
                        StoreError::not_found(format!("Schedule not found with id {id}"))
                    }
                    other => other.into(),
                }
            })?;

        tracing::info!(schedule_id = %schedule.id, "Updated schedule");
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::test_support::{stores, user};

    fn new_schedule(user_id: &RecordId, name: &str) -> CreateScheduleRequest {
        CreateScheduleRequest {
            user_id: user_id.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_list_by_user() {
        let s = stores();
        let owner = user(&s, "ada@example.com").await;

        let id = s
            .schedules
            .create_schedule(new_schedule(&owner.id, "Work"))
            .await
            .unwrap();

        let schedules = s
            .schedules
            .get_schedule_by_user(owner.id.as_str())
            .await
            .unwrap();
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].id, id);
        assert_eq!(schedules[0].name, "Work");
    }

    #[tokio::test]
    async fn test_create_requires_existing_owner() {
        let s = stores();

        let err = s
            .schedules
            .create_schedule(new_schedule(&RecordId::new(), "Work"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_collects_validation_errors() {
        let s = stores();

        let err = s
            .schedules
            .create_schedule(CreateScheduleRequest {
                user_id: "nope".to_string(),
                name: "  ".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_by_id_and_by_user_asymmetry() {
        let s = stores();
        let owner = user(&s, "ada@example.com").await;

        let by_id = s
            .schedules
            .get_schedule_by_id(RecordId::new().as_str())
            .await
            .unwrap();
        assert!(by_id.is_none());

        let err = s
            .schedules
            .get_schedule_by_user(owner.id.as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_schedule() {
        let s = stores();
        let owner = user(&s, "ada@example.com").await;
        let id = s
            .schedules
            .create_schedule(new_schedule(&owner.id, "Gym"))
            .await
            .unwrap();

        s.schedules.remove_schedule(id.as_str()).await.unwrap();

        let err = s.schedules.remove_schedule(id.as_str()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = s.schedules.remove_schedule("xyz").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_only_provided_fields() {
        let s = stores();
        let owner = user(&s, "ada@example.com").await;
        let other = user(&s, "grace@example.com").await;
        let id = s
            .schedules
            .create_schedule(new_schedule(&owner.id, "Gym"))
            .await
            .unwrap();

        let renamed = s
            .schedules
            .update_schedule(id.as_str(), UpdateScheduleRequest::new().with_name("Climbing"))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Climbing");
        assert_eq!(renamed.user_id, owner.id);

        let moved = s
            .schedules
            .update_schedule(
                id.as_str(),
                UpdateScheduleRequest::new().with_user_id(other.id.as_str()),
            )
            .await
            .unwrap();
        assert_eq!(moved.name, "Climbing");
        assert_eq!(moved.user_id, other.id);
    }

    #[tokio::test]
    async fn test_update_validates_and_reports_missing() {
        let s = stores();

        let err = s
            .schedules
            .update_schedule(
                RecordId::new().as_str(),
                UpdateScheduleRequest::new().with_name(" "),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = s
            .schedules
            .update_schedule(
                RecordId::new().as_str(),
                UpdateScheduleRequest::new().with_name("Gym"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_without_fields_is_rejected() {
        let s = stores();
        let owner = user(&s, "ada@example.com").await;
        let id = s
            .schedules
            .create_schedule(new_schedule(&owner.id, "Gym"))
            .await
            .unwrap();

        let err = s
            .schedules
            .update_schedule(id.as_str(), UpdateScheduleRequest::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let stored = s.schedules.get_schedule_by_id(id.as_str()).await.unwrap().unwrap();
        assert_eq!(stored.name, "Gym");
    }
}
