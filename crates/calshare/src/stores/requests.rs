use std::sync::Arc;

use chrono::Utc;

use calshare_core::calendar::{
    validation::{check_email, check_id},
    Event, MembershipKind, RecordId, RequestStatus, ResolveShareRequest, ShareRequest, Validator,
};
use calshare_core::storage::{
    EventRepository, RequestRepository, Result as RepoResult, StoreError, StoreResult,
    UserRepository,
};

/// The sharing workflow: `pending` → `accepted` | `rejected`.
#[derive(Clone)]
pub struct RequestStore {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventRepository>,
    requests: Arc<dyn RequestRepository>,
}

impl RequestStore {
    pub fn new(
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        requests: Arc<dyn RequestRepository>,
    ) -> Self {
        Self {
            users,
            events,
            requests,
        }
    }

    /// Persists a pending request carrying a snapshot of `event`.
    pub async fn create_request(
        &self,
        sender_email: &str,
        receiver_email: &str,
        event: &Event,
    ) -> StoreResult<RecordId> {
        let mut validator = Validator::new();
        let sender = validator.check(check_email(sender_email, "senderEmail"));
        let receiver = validator.check(check_email(receiver_email, "receiverEmail"));
        let (Some(sender), Some(receiver)) = (sender, receiver) else {
            return Err(validator.into());
        };

        if self.users.get_user_by_email(&receiver).await?.is_none() {
            return Err(StoreError::not_found(format!(
                "No user registered with email {receiver}"
            )));
        }

        let request = ShareRequest::pending(sender, receiver, event.clone());
        self.requests.create_request(&request).await?;

        tracing::info!(
            request_id = %request.id,
            event_id = %event.id,
            receiver = %request.receiver_email,
            "Created sharing request"
        );

        Ok(request.id)
    }

    /// Pending requests addressed to `email`, oldest first.
    pub async fn get_requests_for_receiver(&self, email: &str) -> StoreResult<Vec<ShareRequest>> {
        let email = check_email(email, "email").map_err(StoreError::validation)?;
        Ok(self.requests.get_pending_requests(&email).await?)
    }

    /// Accepts a pending request: the event joins the receiver's `attending`
    /// list and the request becomes `accepted`.
    pub async fn accept_request(&self, payload: ResolveShareRequest) -> StoreResult<ShareRequest> {
        let (mut request, user_id) = self.load_pending(&payload).await?;
        let event_id = request.event.id.clone();

        if self.events.get_event(&event_id).await?.is_none() {
            return Err(StoreError::not_found(format!(
                "Event {event_id} no longer exists"
            )));
        }

        let added = self
            .users
            .add_event_membership(&user_id, MembershipKind::Attending, &event_id)
            .await?;

        let now = Utc::now();
        let failure = match self
            .requests
            .transition_request(&request.id, RequestStatus::Pending, RequestStatus::Accepted, now)
            .await
        {
            Ok(true) => None,
            Ok(false) => Some(StoreError::conflict("Request has already been resolved")),
            Err(e) => Some(StoreError::from(e)),
        };

        if let Some(err) = failure {
            if added {
                if let Err(e) = self
                    .users
                    .remove_event_membership(&user_id, MembershipKind::Attending, &event_id)
                    .await
                {
                    tracing::warn!(
                        user_id = %user_id,
                        event_id = %event_id,
                        error = %e,
                        "Failed to undo attending link"
                    );
                }
            }
            return Err(err);
        }

        tracing::info!(
            request_id = %request.id,
            event_id = %event_id,
            user_id = %user_id,
            "Accepted sharing request"
        );

        request.status = RequestStatus::Accepted;
        request.updated_at = now;
        Ok(request)
    }

    /// Rejects a pending request. Nothing else changes.
    pub async fn reject_request(&self, payload: ResolveShareRequest) -> StoreResult<ShareRequest> {
        let (mut request, _) = self.load_pending(&payload).await?;

        let now = Utc::now();
        if !self
            .requests
            .transition_request(&request.id, RequestStatus::Pending, RequestStatus::Rejected, now)
            .await?
        {
            return Err(StoreError::conflict("Request has already been resolved"));
        }

        tracing::info!(request_id = %request.id, "Rejected sharing request");

        request.status = RequestStatus::Rejected;
        request.updated_at = now;
        Ok(request)
    }

    /// Removes a request outright. Used to roll back a failed event creation.
    pub(super) async fn delete_request(&self, id: &RecordId) -> RepoResult<bool> {
        self.requests.delete_request(id).await
    }

    /// Discards the pending requests for an event that is being removed.
    pub(super) async fn delete_pending_for_event(&self, event_id: &RecordId) -> RepoResult<u64> {
        self.requests.delete_pending_for_event(event_id).await
    }

    /// Shared checks for accept and reject.
    async fn load_pending(
        &self,
        payload: &ResolveShareRequest,
    ) -> StoreResult<(ShareRequest, RecordId)> {
        let mut validator = Validator::new();
        let request_id = validator.check(check_id(&payload.request_id, "requestId"));
        let user_id = validator.check(check_id(&payload.user_id, "userId"));
        let (Some(request_id), Some(user_id)) = (request_id, user_id) else {
            return Err(validator.into());
        };

        let request = self
            .requests
            .get_request(&request_id)
            .await?
            .ok_or_else(|| {
                StoreError::not_found(format!("Request not found with id {request_id}"))
            })?;

        if request.status.is_terminal() {
            return Err(StoreError::conflict(format!(
                "Request has already been {}",
                request.status.as_str()
            )));
        }

        let user = self
            .users
            .get_user(&user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("User not found with this userId"))?;
        if user.email != request.receiver_email {
            return Err(StoreError::validation(
                "Only the receiver can resolve a sharing request",
            ));
        }

        Ok((request, user_id))
    }
}
