use super::settle;
use crate::endpoints::LANGUAGE;
use crate::envelope::ApiResult;
use crate::gateway::ApiClient;
use crate::session::{LanguagePreference, SessionWriter};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct LanguageService {
    client: Arc<ApiClient>,
    session: Arc<dyn SessionWriter>,
}

impl LanguageService {
    pub fn new(client: Arc<ApiClient>, session: Arc<dyn SessionWriter>) -> Self {
        Self { client, session }
    }

    /// The stored preference, or English when none was chosen yet.
    pub fn current(&self) -> LanguagePreference {
        self.session.language().unwrap_or_default()
    }

    /// Stores the preference locally first, so the UI switches even when the
    /// backend update fails, then tells the backend.
    pub async fn set_language(&self, preference: &LanguagePreference) -> ApiResult<Value> {
        self.session.save_language(preference)?;
        let body = json!({ "langCode": preference.lang_code });
        let envelope = self.client.call_endpoint(LANGUAGE, Some(body.into())).await;
        Ok(settle("language.set", envelope)?.into_data())
    }
}
