use super::settle;
use crate::endpoints::{MEDIA_UPLOAD, MEDIA_UPLOAD_BULK};
use crate::envelope::ApiResult;
use crate::gateway::{ApiClient, RequestBody};
use crate::models::UploadFile;
use agrimarket_common::AgriError;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::sync::Arc;

/// Image uploads. Payloads go out as multipart forms.
#[derive(Clone)]
pub struct MediaService {
    client: Arc<ApiClient>,
}

fn part(file: &UploadFile) -> Result<Part, AgriError> {
    Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.mime)
        .map_err(AgriError::from)
}

impl MediaService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn upload_image(&self, file: &UploadFile) -> ApiResult<Value> {
        let form = Form::new().part("file", part(file)?);
        let envelope = self
            .client
            .call_endpoint(MEDIA_UPLOAD, Some(RequestBody::Multipart(form)))
            .await;
        Ok(settle("media.upload", envelope)?.into_data())
    }

    pub async fn upload_bulk(&self, files: &[UploadFile]) -> ApiResult<Value> {
        let mut form = Form::new();
        for file in files {
            form = form.part("files", part(file)?);
        }
        let envelope = self
            .client
            .call_endpoint(MEDIA_UPLOAD_BULK, Some(RequestBody::Multipart(form)))
            .await;
        Ok(settle("media.upload_bulk", envelope)?.into_data())
    }
}
