use super::settle;
use crate::endpoints::{COMMUNITY, COMMUNITY_COMMENT, COMMUNITY_LIKE, COMMUNITY_POST};
use crate::envelope::ApiResult;
use crate::gateway::ApiClient;
use crate::normalize::collection;
use serde_json::{json, Value};
use std::sync::Arc;

/// Community feed: posts, comments and likes.
#[derive(Clone)]
pub struct CommunityService {
    client: Arc<ApiClient>,
}

impl CommunityService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_posts(&self, page: Option<u32>) -> ApiResult<Vec<Value>> {
        let envelope = self
            .client
            .call_endpoint_with_query(COMMUNITY, &[("page", page)], None)
            .await;
        Ok(collection(&settle("community.list", envelope)?.into_data()))
    }

    pub async fn create_post(&self, post: Value) -> ApiResult<Value> {
        let envelope = self.client.call_endpoint(COMMUNITY_POST, Some(post.into())).await;
        Ok(settle("community.post", envelope)?.into_data())
    }

    pub async fn comment(&self, post_id: &str, text: &str) -> ApiResult<Value> {
        let body = json!({ "postId": post_id, "comment": text });
        let envelope = self.client.call_endpoint(COMMUNITY_COMMENT, Some(body.into())).await;
        Ok(settle("community.comment", envelope)?.into_data())
    }

    pub async fn like(&self, post_id: &str) -> ApiResult<Value> {
        let body = json!({ "postId": post_id });
        let envelope = self.client.call_endpoint(COMMUNITY_LIKE, Some(body.into())).await;
        Ok(settle("community.like", envelope)?.into_data())
    }
}
