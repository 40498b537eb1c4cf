//! MongoDB repository implementation.
//!
//! Membership lists are embedded arrays on the user document and are changed
//! with single-document `$push`/`$pull` updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use calshare_core::calendar::{
    Event, EventFilter, MembershipKind, RecordId, RequestStatus, Schedule, ShareRequest, User,
};
use calshare_core::storage::{
    EventRepository, RepositoryError, RequestRepository, Result, ScheduleRepository,
    UserRepository,
};

use super::conversions::{
    event_filter_to_document, event_sort, membership_path, to_bson_date, EventDocument,
    RequestDocument, ScheduleDocument, UserDocument, EVENTS, REQUESTS, SCHEDULES, USERS,
};
use super::error::map_mongo_error;

/// MongoDB-based repository implementation.
pub struct MongoRepository {
    db: Database,
}

impl MongoRepository {
    /// Connects to `uri` and uses the `database` database.
    ///
    /// Creates the indexes the repository relies on.
    pub async fn new(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        let repo = Self {
            db: client.database(database),
        };
        repo.init_indexes().await?;
        Ok(repo)
    }

    async fn init_indexes(&self) -> Result<()> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users()
            .create_index(unique_email)
            .await
            .map_err(|e| map_mongo_error(e, "User", "email index"))?;

        self.events()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "schedule_id": 1, "start": 1 })
                    .build(),
            )
            .await
            .map_err(|e| map_mongo_error(e, "Event", "schedule index"))?;

        self.requests()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "receiver_email": 1, "status": 1 })
                    .build(),
            )
            .await
            .map_err(|e| map_mongo_error(e, "ShareRequest", "receiver index"))?;

        tracing::debug!(database = %self.db.name(), "MongoDB indexes ready");
        Ok(())
    }

    fn users(&self) -> Collection<UserDocument> {
        self.db.collection(USERS)
    }

    fn schedules(&self) -> Collection<ScheduleDocument> {
        self.db.collection(SCHEDULES)
    }

    fn events(&self) -> Collection<EventDocument> {
        self.db.collection(EVENTS)
    }

    fn requests(&self) -> Collection<RequestDocument> {
        self.db.collection(REQUESTS)
    }

    async fn find_event_documents(
        &self,
        query: Document,
        entity_hint: &str,
    ) -> Result<Vec<Event>> {
        let options = FindOptions::builder().sort(event_sort()).build();
        let cursor = self
            .events()
            .find(query)
            .with_options(options)
            .await
            .map_err(|e| map_mongo_error(e, "Event", entity_hint))?;
        let documents: Vec<EventDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| map_mongo_error(e, "Event", entity_hint))?;
        Ok(documents.into_iter().map(Event::from).collect())
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for MongoRepository {
    async fn get_user(&self, id: &RecordId) -> Result<Option<User>> {
        self.users()
            .find_one(doc! { "_id": id.as_str() })
            .await
            .map(|doc| doc.map(User::from))
            .map_err(|e| map_mongo_error(e, "User", id.as_str()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users()
            .find_one(doc! { "email": email })
            .await
            .map(|doc| doc.map(User::from))
            .map_err(|e| map_mongo_error(e, "User", email))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        self.users()
            .insert_one(UserDocument::from(user))
            .await
            .map_err(|e| map_mongo_error(e, "User", user.email.as_str()))?;
        Ok(())
    }

    async fn add_event_membership(
        &self,
        user_id: &RecordId,
        kind: MembershipKind,
        event_id: &RecordId,
    ) -> Result<bool> {
        let path = membership_path(kind);
        let mut filter = doc! { "_id": user_id.as_str() };
        filter.insert(path.as_str(), doc! { "$ne": event_id.as_str() });
        let mut push = Document::new();
        push.insert(path.as_str(), event_id.as_str());
        let result = self
            .users()
            .update_one(
                filter,
                doc! {
                    "$push": push,
                    "$set": { "updated_at": to_bson_date(Utc::now()) },
                },
            )
            .await
            .map_err(|e| map_mongo_error(e, "User", user_id.as_str()))?;

        if result.matched_count > 0 {
            return Ok(true);
        }

        // Nothing matched: either the id is already listed or the user is gone.
        let exists = self
            .users()
            .count_documents(doc! { "_id": user_id.as_str() })
            .await
            .map_err(|e| map_mongo_error(e, "User", user_id.as_str()))?;
        if exists == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: "User",
                id: user_id.to_string(),
            });
        }
        Ok(false)
    }

    async fn remove_event_membership(
        &self,
        user_id: &RecordId,
        kind: MembershipKind,
        event_id: &RecordId,
    ) -> Result<bool> {
        let path = membership_path(kind);
        let mut filter = doc! { "_id": user_id.as_str() };
        filter.insert(path.as_str(), event_id.as_str());
        let mut pull = Document::new();
        pull.insert(path.as_str(), event_id.as_str());
        let result = self
            .users()
            .update_one(
                filter,
                doc! {
                    "$pull": pull,
                    "$set": { "updated_at": to_bson_date(Utc::now()) },
                },
            )
            .await
            .map_err(|e| map_mongo_error(e, "User", user_id.as_str()))?;
        Ok(result.modified_count > 0)
    }

    async fn unlink_event(&self, event_id: &RecordId) -> Result<u64> {
        let id = event_id.as_str();
        let result = self
            .users()
            .update_many(
                doc! { "$or": [ { "events.organizing": id }, { "events.attending": id } ] },
                doc! {
                    "$pull": { "events.organizing": id, "events.attending": id },
                    "$set": { "updated_at": to_bson_date(Utc::now()) },
                },
            )
            .await
            .map_err(|e| map_mongo_error(e, "Event", id))?;
        Ok(result.modified_count)
    }
}

// ============================================================================
// ScheduleRepository implementation
// ============================================================================

#[async_trait]
impl ScheduleRepository for MongoRepository {
    async fn get_schedule(&self, id: &RecordId) -> Result<Option<Schedule>> {
        self.schedules()
            .find_one(doc! { "_id": id.as_str() })
            .await
            .map(|doc| doc.map(Schedule::from))
            .map_err(|e| map_mongo_error(e, "Schedule", id.as_str()))
    }

    async fn get_schedules_by_user(&self, user_id: &RecordId) -> Result<Vec<Schedule>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": 1, "_id": 1 })
            .build();
        let cursor = self
            .schedules()
            .find(doc! { "user_id": user_id.as_str() })
            .with_options(options)
            .await
            .map_err(|e| map_mongo_error(e, "Schedule", user_id.as_str()))?;
        let documents: Vec<ScheduleDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| map_mongo_error(e, "Schedule", user_id.as_str()))?;
        Ok(documents.into_iter().map(Schedule::from).collect())
    }

    async fn create_schedule(&self, schedule: &Schedule) -> Result<()> {
        self.schedules()
            .insert_one(ScheduleDocument::from(schedule))
            .await
            .map_err(|e| map_mongo_error(e, "Schedule", schedule.id.as_str()))?;
        Ok(())
    }

    async fn update_schedule(&self, schedule: &Schedule) -> Result<()> {
        let result = self
            .schedules()
            .replace_one(
                doc! { "_id": schedule.id.as_str() },
                ScheduleDocument::from(schedule),
            )
            .await
            .map_err(|e| map_mongo_error(e, "Schedule", schedule.id.as_str()))?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: "Schedule",
                id: schedule.id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_schedule(&self, id: &RecordId) -> Result<bool> {
        let result = self
            .schedules()
            .delete_one(doc! { "_id": id.as_str() })
            .await
            .map_err(|e| map_mongo_error(e, "Schedule", id.as_str()))?;
        Ok(result.deleted_count > 0)
    }
}

// ============================================================================
// EventRepository implementation
// ============================================================================

#[async_trait]
impl EventRepository for MongoRepository {
    async fn get_event(&self, id: &RecordId) -> Result<Option<Event>> {
        self.events()
            .find_one(doc! { "_id": id.as_str() })
            .await
            .map(|doc| doc.map(Event::from))
            .map_err(|e| map_mongo_error(e, "Event", id.as_str()))
    }

    async fn get_events_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<&str> = ids.iter().map(RecordId::as_str).collect();
        self.find_event_documents(doc! { "_id": { "$in": ids } }, "by ids")
            .await
    }

    async fn find_events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        self.find_event_documents(event_filter_to_document(filter), "filter")
            .await
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        self.events()
            .insert_one(EventDocument::from(event))
            .await
            .map_err(|e| map_mongo_error(e, "Event", event.id.as_str()))?;
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        let result = self
            .events()
            .replace_one(doc! { "_id": event.id.as_str() }, EventDocument::from(event))
            .await
            .map_err(|e| map_mongo_error(e, "Event", event.id.as_str()))?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: "Event",
                id: event.id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_event(&self, id: &RecordId) -> Result<bool> {
        let result = self
            .events()
            .delete_one(doc! { "_id": id.as_str() })
            .await
            .map_err(|e| map_mongo_error(e, "Event", id.as_str()))?;
        Ok(result.deleted_count > 0)
    }
}

// ============================================================================
// RequestRepository implementation
// ============================================================================

#[async_trait]
impl RequestRepository for MongoRepository {
    async fn get_request(&self, id: &RecordId) -> Result<Option<ShareRequest>> {
        self.requests()
            .find_one(doc! { "_id": id.as_str() })
            .await
            .map(|doc| doc.map(ShareRequest::from))
            .map_err(|e| map_mongo_error(e, "ShareRequest", id.as_str()))
    }

    async fn get_pending_requests(&self, receiver_email: &str) -> Result<Vec<ShareRequest>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": 1, "_id": 1 })
            .build();
        let cursor = self
            .requests()
            .find(doc! {
                "receiver_email": receiver_email,
                "status": RequestStatus::Pending.as_str(),
            })
            .with_options(options)
            .await
            .map_err(|e| map_mongo_error(e, "ShareRequest", receiver_email))?;
        let documents: Vec<RequestDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| map_mongo_error(e, "ShareRequest", receiver_email))?;
        Ok(documents.into_iter().map(ShareRequest::from).collect())
    }

    async fn create_request(&self, request: &ShareRequest) -> Result<()> {
        self.requests()
            .insert_one(RequestDocument::from(request))
            .await
            .map_err(|e| map_mongo_error(e, "ShareRequest", request.id.as_str()))?;
        Ok(())
    }

    async fn transition_request(
        &self,
        id: &RecordId,
        from: RequestStatus,
        to: RequestStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = self
            .requests()
            .update_one(
                doc! { "_id": id.as_str(), "status": from.as_str() },
                doc! { "$set": { "status": to.as_str(), "updated_at": to_bson_date(updated_at) } },
            )
            .await
            .map_err(|e| map_mongo_error(e, "ShareRequest", id.as_str()))?;
        Ok(result.modified_count > 0)
    }

    async fn delete_request(&self, id: &RecordId) -> Result<bool> {
        let result = self
            .requests()
            .delete_one(doc! { "_id": id.as_str() })
            .await
            .map_err(|e| map_mongo_error(e, "ShareRequest", id.as_str()))?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_pending_for_event(&self, event_id: &RecordId) -> Result<u64> {
        let result = self
            .requests()
            .delete_many(doc! {
                "event._id": event_id.as_str(),
                "status": RequestStatus::Pending.as_str(),
            })
            .await
            .map_err(|e| map_mongo_error(e, "ShareRequest", event_id.as_str()))?;
        Ok(result.deleted_count)
    }
}
