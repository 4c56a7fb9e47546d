use super::settle;
use crate::endpoints::{FAVORITE_LIST, FAVORITE_TOGGLE};
use crate::envelope::ApiResult;
use crate::gateway::ApiClient;
use crate::models::ItemKind;
use crate::normalize::collection;
use futures::future::join_all;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct FavoritesService {
    client: Arc<ApiClient>,
}

impl FavoritesService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Flips the favorite flag of one item; the backend decides the direction.
    pub async fn toggle_favorite(&self, item_id: &str, kind: ItemKind) -> ApiResult<Value> {
        let body = json!({ "itemId": item_id, "type": kind.as_str() });
        let envelope = self.client.call_endpoint(FAVORITE_TOGGLE, Some(body.into())).await;
        Ok(settle("favorites.toggle", envelope)?.into_data())
    }

    pub async fn list_favorites(&self, kind: ItemKind) -> ApiResult<Vec<Value>> {
        let envelope = self
            .client
            .call_endpoint_with_query(FAVORITE_LIST, &[("type", Some(kind.as_str()))], None)
            .await;
        Ok(collection(&settle("favorites.list", envelope)?.into_data()))
    }

    /// Fetches every kind concurrently and merges them in [`ItemKind::ALL`]
    /// order. A kind whose call fails contributes no rows instead of failing
    /// the whole fetch.
    pub async fn list_all_favorites(&self) -> Vec<(ItemKind, Vec<Value>)> {
        let results = join_all(ItemKind::ALL.iter().map(|kind| self.list_favorites(*kind))).await;

        ItemKind::ALL
            .iter()
            .copied()
            .zip(results)
            .map(|(kind, result)| match result {
                Ok(rows) => (kind, rows),
                Err(err) => {
                    warn!(%kind, error = %err, "favorites fetch failed, showing none for this kind");
                    (kind, Vec::new())
                }
            })
            .collect()
    }
}
