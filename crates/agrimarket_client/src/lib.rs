//! Client library for the agrimarket farm-to-market backend.
//!
//! Layers, leaves first: the [`endpoints`] registry, credential [`session`]
//! storage, the [`gateway`] access layer returning [`envelope::Envelope`]s,
//! per-domain [`services`], the store-facing [`dispatch`]er, payload
//! [`normalize`]ation and the screen-level [`views`].

pub mod cancel; // Lifetime-bound cancellation
pub mod dispatch; // Store action dispatch
pub mod endpoints; // Endpoint registry
pub mod envelope; // Response envelope and service result
pub mod gateway; // HTTP access layer
pub mod models; // Request payloads and domain enums
pub mod normalize; // Payload reconciliation
pub mod services; // Domain service wrappers
pub mod session; // Credential and preference storage
pub mod views; // Screen view-state loaders

pub use cancel::{CancelSignal, ViewScope};
pub use dispatch::{dispatch, ActionOutcome, ActionState, Dispatcher};
pub use endpoints::{Endpoint, HttpMethod};
pub use envelope::{ApiResult, Envelope, ServiceError, StatusCode, NO_TOKEN_MESSAGE};
pub use gateway::{ApiClient, RequestBody};
pub use models::ItemKind;
pub use services::Services;
pub use session::{
    CredentialRecord, FileStore, KeyValueStore, LanguagePreference, MemoryStore, SessionStore,
    SessionWriter, StaticToken, TokenProvider,
};
pub use views::ViewState;
