//! Data side of the marketplace screens.
//!
//! Each view fetches through the services under a [`ViewScope`], normalizes
//! the payload and exposes a [`ViewState`]. When the scope is cancelled
//! before the fetch completes, the result is discarded and the state is left
//! as it was.

use crate::cancel::ViewScope;
use crate::envelope::ApiResult;
use crate::models::ItemKind;
use crate::normalize::{cms_page, notifications, project_favorites, project_item, CmsPage, DisplayItem, NotificationItem};
use crate::services::{Services, ABOUT_US_SLUG};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum ViewState<T> {
    Loading,
    Empty,
    Ready(T),
    Failed(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}

impl<T> ViewState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct AboutUsView {
    pub state: ViewState<CmsPage>,
}

impl AboutUsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the load was cancelled and nothing changed.
    pub async fn load(&mut self, services: &Services, scope: &ViewScope) -> bool {
        let cms = services.cms();
        let Some(result) = scope.run(cms.get_page(ABOUT_US_SLUG)).await else {
            return false;
        };
        self.state = match result {
            Ok(data) => cms_page(&data, ABOUT_US_SLUG).map_or(ViewState::Empty, ViewState::Ready),
            Err(err) => {
                warn!(error = %err, "about-us content unavailable");
                ViewState::Empty
            }
        };
        true
    }
}

#[derive(Debug, Default)]
pub struct FavoritesView {
    pub state: ViewState<Vec<DisplayItem>>,
    pub filter: Option<ItemKind>,
}

impl FavoritesView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, services: &Services, scope: &ViewScope) -> bool {
        let favorites = services.favorites();
        let Some(groups) = scope.run(favorites.list_all_favorites()).await else {
            return false;
        };
        let items: Vec<DisplayItem> = groups
            .iter()
            .flat_map(|(kind, rows)| project_favorites(*kind, rows))
            .collect();
        self.state = non_empty(items);
        true
    }

    pub fn set_filter(&mut self, filter: Option<ItemKind>) {
        self.filter = filter;
    }

    /// Items of the selected kind, or all of them without a filter.
    pub fn visible(&self) -> Vec<&DisplayItem> {
        self.state
            .ready()
            .map(|items| {
                items
                    .iter()
                    .filter(|item| self.filter.map_or(true, |kind| item.kind == kind))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Un-favorites the `kind` item with id `item_id`. Ids are only unique
    /// within a kind. The item leaves the local list before the backend is
    /// called, so the screen updates without a refetch.
    ///
    /// Returns `Ok(false)` when no such item is held locally.
    pub async fn toggle_off(&mut self, services: &Services, kind: ItemKind, item_id: &str) -> ApiResult<bool> {
        let ViewState::Ready(items) = &mut self.state else {
            return Ok(false);
        };
        let Some(position) = items.iter().position(|item| item.kind == kind && item.id == item_id) else {
            return Ok(false);
        };
        items.remove(position);
        if items.is_empty() {
            self.state = ViewState::Empty;
        }
        debug!(item_id, %kind, "favorite removed locally");
        services.favorites().toggle_favorite(item_id, kind).await?;
        Ok(true)
    }
}

#[derive(Debug, Default)]
pub struct NotificationsView {
    pub state: ViewState<Vec<NotificationItem>>,
}

impl NotificationsView {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty list is the empty state, not an error; only a failed call
    /// produces `Failed`.
    pub async fn load(&mut self, services: &Services, scope: &ViewScope) -> bool {
        let service = services.notifications();
        let Some(result) = scope.run(service.list(None)).await else {
            return false;
        };
        self.state = match result {
            Ok(data) => non_empty(notifications(&data)),
            Err(err) => {
                if err.envelope().is_some_and(|failed| failed.is_missing_token()) {
                    debug!("notifications need a session");
                } else {
                    error!(error = %err, "failed to load notifications");
                }
                ViewState::Failed(err.to_string())
            }
        };
        true
    }
}

/// Browsing list for one kind of entity.
#[derive(Debug)]
pub struct ListingView {
    pub kind: ItemKind,
    pub state: ViewState<Vec<DisplayItem>>,
}

impl ListingView {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            state: ViewState::Loading,
        }
    }

    pub async fn load(&mut self, services: &Services, scope: &ViewScope, page: Option<u32>) -> bool {
        let Some(result) = scope.run(fetch_listing(services, self.kind, page)).await else {
            return false;
        };
        self.state = match result {
            Ok(rows) => non_empty(rows.iter().map(|row| project_item(self.kind, row)).collect()),
            Err(err) => {
                warn!(kind = %self.kind, error = %err, "listing unavailable");
                ViewState::Empty
            }
        };
        true
    }
}

async fn fetch_listing(services: &Services, kind: ItemKind, page: Option<u32>) -> ApiResult<Vec<Value>> {
    match kind {
        ItemKind::Crop => services.crops().list_crops(None, page).await,
        ItemKind::Farmer => services.profile().list_farmers(page).await,
        ItemKind::Buyer => services.profile().list_buyers(page).await,
        ItemKind::AgroShop => services.agro_shops().list_agro_shops(page, None).await,
    }
}

fn non_empty<T>(items: Vec<T>) -> ViewState<Vec<T>> {
    if items.is_empty() {
        ViewState::Empty
    } else {
        ViewState::Ready(items)
    }
}
