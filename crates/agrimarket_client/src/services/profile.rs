use super::settle;
use crate::endpoints::{BUYERS, FARMERS, PROFILE, UPDATE_PROFILE};
use crate::envelope::ApiResult;
use crate::gateway::ApiClient;
use crate::normalize::collection;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct ProfileService {
    client: Arc<ApiClient>,
}

impl ProfileService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get_profile(&self) -> ApiResult<Value> {
        let envelope = self.client.call_endpoint(PROFILE, None).await;
        Ok(settle("profile.get", envelope)?.into_data())
    }

    pub async fn update_profile(&self, changes: Value) -> ApiResult<Value> {
        let envelope = self
            .client
            .call_endpoint(UPDATE_PROFILE, Some(changes.into()))
            .await;
        Ok(settle("profile.update", envelope)?.into_data())
    }

    pub async fn list_farmers(&self, page: Option<u32>) -> ApiResult<Vec<Value>> {
        let envelope = self
            .client
            .call_endpoint_with_query(FARMERS, &[("page", page)], None)
            .await;
        Ok(collection(&settle("profile.list_farmers", envelope)?.into_data()))
    }

    pub async fn list_buyers(&self, page: Option<u32>) -> ApiResult<Vec<Value>> {
        let envelope = self
            .client
            .call_endpoint_with_query(BUYERS, &[("page", page)], None)
            .await;
        Ok(collection(&settle("profile.list_buyers", envelope)?.into_data()))
    }
}
