//! Store-facing action dispatch.
//!
//! A dispatched action always settles into an [`ActionOutcome`]; service
//! failures become a rejection value and are never propagated further.

use crate::envelope::ApiResult;
use crate::models::{ContactRequest, RegisterRequest, SellCropRequest, UploadFile};
use crate::services::Services;
use crate::session::LanguagePreference;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "payload", rename_all = "lowercase")]
pub enum ActionOutcome<T> {
    Fulfilled(T),
    Rejected(Value),
}

impl<T> ActionOutcome<T> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, ActionOutcome::Fulfilled(_))
    }

    pub fn fulfilled(self) -> Option<T> {
        match self {
            ActionOutcome::Fulfilled(payload) => Some(payload),
            ActionOutcome::Rejected(_) => None,
        }
    }
}

/// Runs one service call and settles it for the store.
pub async fn dispatch<T, F>(action: &'static str, call: F) -> ActionOutcome<T>
where
    F: Future<Output = ApiResult<T>>,
{
    debug!(action, "dispatching");
    match call.await {
        Ok(payload) => {
            debug!(action, "fulfilled");
            ActionOutcome::Fulfilled(payload)
        }
        Err(err) => {
            warn!(action, error = %err, "rejected");
            ActionOutcome::Rejected(err.rejection_value())
        }
    }
}

/// Per-action slice state: idle, pending, then fulfilled or rejected.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActionState<T> {
    #[default]
    Idle,
    Pending,
    Fulfilled(T),
    Rejected(Value),
}

impl<T> ActionState<T> {
    pub fn begin(&mut self) {
        *self = ActionState::Pending;
    }

    pub fn reduce(&mut self, outcome: ActionOutcome<T>) {
        *self = match outcome {
            ActionOutcome::Fulfilled(payload) => ActionState::Fulfilled(payload),
            ActionOutcome::Rejected(reason) => ActionState::Rejected(reason),
        };
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ActionState::Pending)
    }
}

/// One method per store action, each wrapping its service call.
#[derive(Clone)]
pub struct Dispatcher {
    services: Services,
}

impl Dispatcher {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub async fn register(&self, request: &RegisterRequest) -> ActionOutcome<Value> {
        dispatch("auth/register", self.services.auth().register(request)).await
    }

    pub async fn send_otp(&self, phone: &str) -> ActionOutcome<Value> {
        dispatch("auth/sendOtp", self.services.auth().generate_otp(phone)).await
    }

    pub async fn verify_otp(&self, phone: &str, otp: &str) -> ActionOutcome<Value> {
        dispatch("auth/verifyOtp", self.services.auth().verify_otp(phone, otp)).await
    }

    pub async fn logout(&self) -> ActionOutcome<()> {
        dispatch("auth/logout", self.services.auth().logout()).await
    }

    pub async fn fetch_profile(&self) -> ActionOutcome<Value> {
        dispatch("user/fetchProfile", self.services.profile().get_profile()).await
    }

    pub async fn update_profile(&self, changes: Value) -> ActionOutcome<Value> {
        dispatch("user/updateProfile", self.services.profile().update_profile(changes)).await
    }

    pub async fn sell_crop(&self, request: &SellCropRequest) -> ActionOutcome<Value> {
        dispatch("crop/sell", self.services.crops().sell_crop(request)).await
    }

    pub async fn create_post(&self, post: Value) -> ActionOutcome<Value> {
        dispatch("community/createPost", self.services.community().create_post(post)).await
    }

    pub async fn comment_post(&self, post_id: &str, text: &str) -> ActionOutcome<Value> {
        dispatch("community/comment", self.services.community().comment(post_id, text)).await
    }

    pub async fn like_post(&self, post_id: &str) -> ActionOutcome<Value> {
        dispatch("community/like", self.services.community().like(post_id)).await
    }

    pub async fn contact_us(&self, request: &ContactRequest) -> ActionOutcome<Value> {
        dispatch("cms/contactUs", self.services.cms().contact_us(request)).await
    }

    pub async fn update_language(&self, preference: &LanguagePreference) -> ActionOutcome<Value> {
        dispatch("language/update", self.services.language().set_language(preference)).await
    }

    pub async fn upload_image(&self, file: &UploadFile) -> ActionOutcome<Value> {
        dispatch("media/upload", self.services.media().upload_image(file)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{Envelope, ServiceError, FALLBACK_REJECTION};
    use serde_json::json;

    #[tokio::test]
    async fn success_fulfills_with_payload() {
        let outcome = dispatch("test/ok", async { Ok::<_, ServiceError>(json!({"id": 1})) }).await;
        assert_eq!(outcome, ActionOutcome::Fulfilled(json!({"id": 1})));
    }

    #[tokio::test]
    async fn backend_failure_rejects_with_body() {
        let outcome: ActionOutcome<Value> = dispatch("test/backend", async {
            Envelope::failure("Invalid OTP").into_result().map(|_| Value::Null)
        })
        .await;
        assert_eq!(outcome, ActionOutcome::Rejected(json!({"success": false, "error": "Invalid OTP"})));
    }

    #[tokio::test]
    async fn bodiless_failure_rejects_with_fallback() {
        let outcome: ActionOutcome<Value> = dispatch("test/local", async {
            Err(ServiceError::Local(agrimarket_common::storage_error("disk full")))
        })
        .await;
        assert_eq!(outcome, ActionOutcome::Rejected(json!(FALLBACK_REJECTION)));
    }

    #[test]
    fn state_follows_outcome() {
        let mut state = ActionState::<u8>::default();
        assert_eq!(state, ActionState::Idle);
        state.begin();
        assert!(state.is_pending());
        state.reduce(ActionOutcome::Rejected(json!("nope")));
        assert_eq!(state, ActionState::Rejected(json!("nope")));
        state.reduce(ActionOutcome::Fulfilled(3));
        assert_eq!(state, ActionState::Fulfilled(3));
    }
}
