use super::settle;
use crate::endpoints::{CMS, CONTACT_US};
use crate::envelope::ApiResult;
use crate::gateway::{ApiClient, RequestBody};
use crate::models::ContactRequest;
use agrimarket_common::AgriError;
use serde_json::Value;
use std::sync::Arc;

pub const ABOUT_US_SLUG: &str = "about-us";

/// Static content pages and the contact form.
#[derive(Clone)]
pub struct CmsService {
    client: Arc<ApiClient>,
}

impl CmsService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Raw CMS payload for `slug`. The backend may answer with the single
    /// page or with every page; see [`crate::normalize::cms_page`].
    pub async fn get_page(&self, slug: &str) -> ApiResult<Value> {
        let envelope = self
            .client
            .call_endpoint_with_query(CMS, &[("slug", Some(slug))], None)
            .await;
        Ok(settle("cms.get_page", envelope)?.into_data())
    }

    pub async fn contact_us(&self, request: &ContactRequest) -> ApiResult<Value> {
        let body = serde_json::to_value(request).map_err(AgriError::from)?;
        let envelope = self
            .client
            .call_endpoint(CONTACT_US, Some(RequestBody::Json(body)))
            .await;
        Ok(settle("cms.contact_us", envelope)?.into_data())
    }
}
