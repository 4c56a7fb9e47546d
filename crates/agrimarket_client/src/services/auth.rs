use super::settle;
use crate::endpoints::{LOGOUT, OTP_GENERATE, OTP_VERIFY, REGISTER};
use crate::envelope::{ApiResult, ServiceError};
use crate::gateway::{ApiClient, RequestBody};
use crate::models::RegisterRequest;
use crate::session::SessionWriter;
use agrimarket_common::AgriError;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Registration, OTP login and logout.
#[derive(Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
    session: Arc<dyn SessionWriter>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>, session: Arc<dyn SessionWriter>) -> Self {
        Self { client, session }
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<Value> {
        let body = serde_json::to_value(request).map_err(AgriError::from)?;
        let envelope = self
            .client
            .call_endpoint(REGISTER, Some(RequestBody::Json(body)))
            .await;
        Ok(settle("auth.register", envelope)?.into_data())
    }

    pub async fn generate_otp(&self, phone: &str) -> ApiResult<Value> {
        let envelope = self
            .client
            .call_endpoint(OTP_GENERATE, Some(json!({ "phone": phone }).into()))
            .await;
        Ok(settle("auth.generate_otp", envelope)?.into_data())
    }

    /// Verifies the OTP and, on success, persists the returned credential so
    /// that the next request is authenticated.
    pub async fn verify_otp(&self, phone: &str, otp: &str) -> ApiResult<Value> {
        let envelope = self
            .client
            .call_endpoint(OTP_VERIFY, Some(json!({ "phone": phone, "otp": otp }).into()))
            .await;
        let data = settle("auth.verify_otp", envelope)?.into_data();
        if data.is_null() {
            warn!("OTP verified but no credential was returned");
        } else {
            self.session.save_credential(&data)?;
            info!("session credential stored");
        }
        Ok(data)
    }

    /// Logs out on the backend and always drops the local credential, even
    /// when the backend call fails.
    ///
    /// A backend failure is reported in preference to a storage failure;
    /// the storage failure is only returned when the backend call succeeded.
    pub async fn logout(&self) -> ApiResult<()> {
        let envelope = self.client.call_endpoint(LOGOUT, None).await;
        let outcome = settle("auth.logout", envelope);
        let cleared = self.session.clear_credential();
        match &cleared {
            Ok(()) => info!("session credential cleared"),
            Err(err) => error!(error = %err, "failed to clear session credential"),
        }
        outcome?;
        cleared.map_err(ServiceError::from)
    }
}
