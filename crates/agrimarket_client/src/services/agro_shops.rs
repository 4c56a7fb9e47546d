use super::settle;
use crate::endpoints::AGRO_SHOPS;
use crate::envelope::ApiResult;
use crate::gateway::ApiClient;
use crate::normalize::collection;
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct AgroShopService {
    client: Arc<ApiClient>,
}

impl AgroShopService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_agro_shops(&self, page: Option<u32>, search: Option<&str>) -> ApiResult<Vec<Value>> {
        let page = page.map(|p| p.to_string());
        let envelope = self
            .client
            .call_endpoint_with_query(AGRO_SHOPS, &[("page", page.as_deref()), ("search", search)], None)
            .await;
        Ok(collection(&settle("agro_shops.list", envelope)?.into_data()))
    }
}
