//! Domain service wrappers.
//!
//! Each wrapper binds fixed endpoints to narrow functions, delegates to the
//! [`ApiClient`] and maps the envelope into an [`ApiResult`]. Failures are
//! logged here and returned to the caller, which decides what to do next.

use crate::envelope::{ApiResult, Envelope};
use crate::gateway::ApiClient;
use crate::session::{KeyValueStore, SessionStore, SessionWriter};
use agrimarket_common::AgriError;
use agrimarket_config::ApiConfig;
use std::sync::Arc;
use tracing::{debug, error};

pub mod agro_shops;
pub mod auth;
pub mod cms;
pub mod community;
pub mod crops;
pub mod favorites;
pub mod language;
pub mod media;
pub mod notifications;
pub mod profile;

pub use agro_shops::AgroShopService;
pub use auth::AuthService;
pub use cms::{CmsService, ABOUT_US_SLUG};
pub use community::CommunityService;
pub use crops::CropService;
pub use favorites::FavoritesService;
pub use language::LanguageService;
pub use media::MediaService;
pub use notifications::NotificationService;
pub use profile::ProfileService;

/// Maps an envelope into the service result, logging failures.
///
/// Missing-session failures are routine for anonymous browsing and only
/// logged at debug.
pub(crate) fn settle(operation: &'static str, envelope: Envelope) -> ApiResult<Envelope> {
    envelope.into_result().map_err(|err| {
        match err.envelope() {
            Some(failed) if failed.is_missing_token() => {
                debug!(operation, "call rejected without a session token");
            }
            _ => error!(operation, error = %err, "service call failed"),
        }
        err
    })
}

/// Every service wrapper around one shared client and session.
#[derive(Clone)]
pub struct Services {
    client: Arc<ApiClient>,
    session: Arc<dyn SessionWriter>,
}

impl Services {
    pub fn new(client: Arc<ApiClient>, session: Arc<dyn SessionWriter>) -> Self {
        Self { client, session }
    }

    /// Builds the client and session around `store`, sharing one session
    /// between token injection and the login/logout flows.
    pub fn connect<S: KeyValueStore + 'static>(config: &ApiConfig, store: S) -> Result<Self, AgriError> {
        let session = Arc::new(SessionStore::new(store));
        let client = ApiClient::new(config, session.clone())?;
        Ok(Self::new(Arc::new(client), session))
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn session(&self) -> &Arc<dyn SessionWriter> {
        &self.session
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.client.clone(), self.session.clone())
    }

    pub fn profile(&self) -> ProfileService {
        ProfileService::new(self.client.clone())
    }

    pub fn crops(&self) -> CropService {
        CropService::new(self.client.clone())
    }

    pub fn agro_shops(&self) -> AgroShopService {
        AgroShopService::new(self.client.clone())
    }

    pub fn favorites(&self) -> FavoritesService {
        FavoritesService::new(self.client.clone())
    }

    pub fn cms(&self) -> CmsService {
        CmsService::new(self.client.clone())
    }

    pub fn notifications(&self) -> NotificationService {
        NotificationService::new(self.client.clone())
    }

    pub fn community(&self) -> CommunityService {
        CommunityService::new(self.client.clone())
    }

    pub fn language(&self) -> LanguageService {
        LanguageService::new(self.client.clone(), self.session.clone())
    }

    pub fn media(&self) -> MediaService {
        MediaService::new(self.client.clone())
    }
}
