use super::settle;
use crate::endpoints::{CATEGORIES, CATEGORY_CROPS, CROP_DETAIL, SELL_CROP};
use crate::envelope::ApiResult;
use crate::gateway::{ApiClient, RequestBody};
use crate::models::SellCropRequest;
use crate::normalize::collection;
use agrimarket_common::AgriError;
use serde_json::Value;
use std::sync::Arc;

/// Crop catalogue and selling.
#[derive(Clone)]
pub struct CropService {
    client: Arc<ApiClient>,
}

impl CropService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_categories(&self) -> ApiResult<Vec<Value>> {
        let envelope = self.client.call_endpoint(CATEGORIES, None).await;
        Ok(collection(&settle("crops.list_categories", envelope)?.into_data()))
    }

    /// Crops, optionally narrowed to one category.
    pub async fn list_crops(&self, category_id: Option<&str>, page: Option<u32>) -> ApiResult<Vec<Value>> {
        let page = page.map(|p| p.to_string());
        let envelope = self
            .client
            .call_endpoint_with_query(
                CATEGORY_CROPS,
                &[("categoryId", category_id), ("page", page.as_deref())],
                None,
            )
            .await;
        Ok(collection(&settle("crops.list_crops", envelope)?.into_data()))
    }

    pub async fn crop_detail(&self, crop_id: &str) -> ApiResult<Value> {
        let url = CROP_DETAIL.url_with_segment(self.client.base_url(), crop_id);
        let envelope = self.client.call(&url, CROP_DETAIL.method, None).await;
        Ok(settle("crops.detail", envelope)?.into_data())
    }

    pub async fn sell_crop(&self, request: &SellCropRequest) -> ApiResult<Value> {
        let body = serde_json::to_value(request).map_err(AgriError::from)?;
        let envelope = self
            .client
            .call_endpoint(SELL_CROP, Some(RequestBody::Json(body)))
            .await;
        Ok(settle("crops.sell", envelope)?.into_data())
    }
}
