use super::settle;
use crate::endpoints::{NOTIFICATIONS, NOTIFICATION_READ};
use crate::envelope::ApiResult;
use crate::gateway::ApiClient;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationService {
    client: Arc<ApiClient>,
}

impl NotificationService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Raw notification payload; normalize with [`crate::normalize::notifications`].
    pub async fn list(&self, page: Option<u32>) -> ApiResult<Value> {
        let envelope = self
            .client
            .call_endpoint_with_query(NOTIFICATIONS, &[("page", page)], None)
            .await;
        Ok(settle("notifications.list", envelope)?.into_data())
    }

    pub async fn mark_read(&self, notification_id: &str) -> ApiResult<Value> {
        let url = NOTIFICATION_READ.url_with_segment(self.client.base_url(), notification_id);
        let envelope = self
            .client
            .call(&url, NOTIFICATION_READ.method, Some(Value::Object(Default::default()).into()))
            .await;
        Ok(settle("notifications.mark_read", envelope)?.into_data())
    }
}
