//! Reconciliation of loosely-shaped backend payloads.
//!
//! The backend names the same field differently depending on the endpoint
//! (`content` vs `description`, `images` vs `imagesUrl`) and sometimes sends
//! one record where a list is expected. All of that probing lives here, with
//! an explicit priority order per field, so views never inspect raw JSON.

use crate::models::ItemKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Wrapper fields under which list endpoints nest their rows.
const COLLECTION_FIELDS: [&str; 4] = ["items", "list", "rows", "docs"];

/// Fields whose presence marks an object as a record rather than a wrapper.
const IDENTITY_FIELDS: [&str; 6] = ["_id", "id", "itemId", "slug", "name", "title"];

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Array(items) => items.iter().find_map(as_text),
        _ => None,
    }
}

/// First non-empty text found at `paths`, in order. Arrays yield their first
/// usable element and numbers are stringified. Missing everywhere gives `""`.
pub fn first_str(value: &Value, paths: &[&str]) -> String {
    paths
        .iter()
        .filter_map(|path| lookup(value, path))
        .find_map(as_text)
        .unwrap_or_default()
}

fn first_bool(value: &Value, paths: &[&str]) -> Option<bool> {
    paths
        .iter()
        .filter_map(|path| lookup(value, path))
        .find_map(|found| match found {
            Value::Bool(flag) => Some(*flag),
            Value::Number(number) => number.as_i64().map(|n| n != 0),
            Value::String(text) => match text.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        })
}

/// Every string found at the first of `paths` that holds any.
fn strings(value: &Value, paths: &[&str]) -> Vec<String> {
    for path in paths {
        let found: Vec<String> = match lookup(value, path) {
            Some(Value::Array(items)) => items.iter().filter_map(as_text).collect(),
            Some(other) => as_text(other).into_iter().collect(),
            None => Vec::new(),
        };
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

/// Rows of a list payload, in order of preference:
/// the array itself; an array under a known wrapper field; a lone record
/// (an object with an identity field); the first array-valued field of any
/// other object. `null`, `{}` and objects holding only counters are empty.
pub fn collection(data: &Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items.clone(),
        Value::Object(map) => {
            let wrapped = COLLECTION_FIELDS.iter().find_map(|field| match map.get(*field) {
                Some(Value::Array(items)) => Some(items.clone()),
                _ => None,
            });
            if let Some(items) = wrapped {
                return items;
            }
            if IDENTITY_FIELDS.iter().any(|field| map.get(*field).and_then(as_text).is_some()) {
                return vec![data.clone()];
            }
            map.values()
                .find_map(|value| value.as_array().cloned())
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// Picks one record: for a non-empty array the element whose `field` equals
/// `wanted`, else the first element; for an object the object itself.
pub fn select_record<'a>(data: &'a Value, field: &str, wanted: &str) -> Option<&'a Value> {
    match data {
        Value::Array(items) => items
            .iter()
            .find(|item| item.get(field).and_then(Value::as_str) == Some(wanted))
            .or_else(|| items.first()),
        Value::Object(_) => Some(data),
        _ => None,
    }
}

/// Uniform projection of a crop, farmer, buyer or agro-shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    pub subtitle: String,
    pub location: String,
    pub image: String,
}

fn default_title(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Crop => "Unnamed crop",
        ItemKind::Farmer => "Unnamed farmer",
        ItemKind::Buyer => "Unnamed buyer",
        ItemKind::AgroShop => "Unnamed agro-shop",
    }
}

pub fn project_item(kind: ItemKind, record: &Value) -> DisplayItem {
    let (title_paths, subtitle_paths): (&[&str], &[&str]) = match kind {
        ItemKind::Crop => (
            &["name", "cropName", "title"],
            &["categoryName", "category.name", "variety"],
        ),
        ItemKind::Farmer | ItemKind::Buyer => (
            &["name", "fullName", "firstName"],
            &["phone", "mobile", "email"],
        ),
        ItemKind::AgroShop => (&["shopName", "name"], &["ownerName", "phone"]),
    };

    let title = first_str(record, title_paths);
    DisplayItem {
        id: first_str(record, &["_id", "id", "itemId"]),
        kind,
        title: if title.is_empty() {
            default_title(kind).to_string()
        } else {
            title
        },
        subtitle: first_str(record, subtitle_paths),
        location: first_str(
            record,
            &["location", "location.city", "address", "address.city", "city", "district"],
        ),
        image: first_str(record, &["image", "imageUrl", "profileImage", "images", "imagesUrl"]),
    }
}

/// Favorite rows either are the entity or wrap it under a per-kind field.
pub fn favorite_entity(kind: ItemKind, record: &Value) -> &Value {
    let nested = match kind {
        ItemKind::Crop => "crop",
        ItemKind::Farmer => "farmer",
        ItemKind::Buyer => "buyer",
        ItemKind::AgroShop => "agroShop",
    };
    [nested, "item", "details"]
        .iter()
        .find_map(|field| record.get(*field).filter(|value| value.is_object()))
        .unwrap_or(record)
}

pub fn project_favorites(kind: ItemKind, rows: &[Value]) -> Vec<DisplayItem> {
    rows.iter()
        .map(|row| {
            let mut item = project_item(kind, favorite_entity(kind, row));
            if item.id.is_empty() {
                item.id = first_str(row, &["itemId", "_id", "id"]);
            }
            item
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmsPage {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
}

/// Reads a CMS payload, preferring the record whose `slug` matches.
pub fn cms_page(data: &Value, slug: &str) -> Option<CmsPage> {
    let record = select_record(data, "slug", slug)?;
    let page = CmsPage {
        title: first_str(record, &["title", "name"]),
        content: first_str(record, &["content", "description"]),
        images: strings(record, &["images", "imagesUrl", "image"]),
    };
    if page.title.is_empty() && page.content.is_empty() && page.images.is_empty() {
        return None;
    }
    Some(page)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationItem {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub read: bool,
}

pub fn notifications(data: &Value) -> Vec<NotificationItem> {
    collection(data)
        .iter()
        .map(|row| NotificationItem {
            id: first_str(row, &["_id", "id"]),
            title: first_str(row, &["title", "heading"]),
            body: first_str(row, &["body", "message", "description"]),
            created_at: DateTime::parse_from_rfc3339(&first_str(row, &["createdAt", "created_at", "date"]))
                .ok()
                .map(|date| date.with_timezone(&Utc)),
            read: first_bool(row, &["isRead", "read"]).unwrap_or(false),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_str_follows_priority_and_degrades_to_empty() {
        let record = json!({"description": "fresh", "content": "", "price": 40});
        assert_eq!(first_str(&record, &["content", "description"]), "fresh");
        assert_eq!(first_str(&record, &["price"]), "40");
        assert_eq!(first_str(&record, &["missing"]), "");
    }

    #[test]
    fn cms_prefers_matching_slug_over_first_element() {
        let data = json!([
            {"title": "Terms", "content": "terms body"},
            {"slug": "about-us", "title": "About Us", "content": "We connect farmers"}
        ]);
        let page = cms_page(&data, "about-us").unwrap();
        assert_eq!(page.title, "About Us");
        assert_eq!(page.content, "We connect farmers");
    }

    #[test]
    fn cms_falls_back_to_first_element() {
        let data = json!([{"slug": "privacy", "title": "Privacy"}]);
        assert_eq!(cms_page(&data, "about-us").unwrap().title, "Privacy");
        assert_eq!(cms_page(&json!([]), "about-us"), None);
    }

    #[test]
    fn cms_single_object_uses_description_and_images_url() {
        let data = json!({"title": "About", "description": "Our story", "imagesUrl": ["a.png", "b.png"]});
        let page = cms_page(&data, "about-us").unwrap();
        assert_eq!(page.content, "Our story");
        assert_eq!(page.images, vec!["a.png".to_string(), "b.png".to_string()]);
    }

    #[test]
    fn projects_each_kind_with_its_field_names() {
        let crop = project_item(
            ItemKind::Crop,
            &json!({"_id": "c1", "cropName": "Wheat", "category": {"name": "Grains"}, "images": ["w.jpg"], "location": {"city": "Indore"}}),
        );
        assert_eq!(crop.id, "c1");
        assert_eq!(crop.title, "Wheat");
        assert_eq!(crop.subtitle, "Grains");
        assert_eq!(crop.image, "w.jpg");
        assert_eq!(crop.location, "Indore");

        let shop = project_item(ItemKind::AgroShop, &json!({"id": 9, "shopName": "Green Tools", "address": "MG Road"}));
        assert_eq!(shop.id, "9");
        assert_eq!(shop.title, "Green Tools");
        assert_eq!(shop.location, "MG Road");
    }

    #[test]
    fn missing_fields_degrade_to_defaults() {
        let farmer = project_item(ItemKind::Farmer, &json!({}));
        assert_eq!(farmer.title, "Unnamed farmer");
        assert_eq!(farmer.subtitle, "");
        assert_eq!(farmer.location, "");
        assert_eq!(farmer.image, "");
    }

    #[test]
    fn collection_unwraps_known_wrappers() {
        assert_eq!(collection(&json!({"items": [1, 2]})).len(), 2);
        assert_eq!(collection(&json!({"name": "solo"})).len(), 1);
        assert!(collection(&Value::Null).is_empty());
    }

    #[test]
    fn collection_never_invents_rows() {
        assert!(collection(&json!({})).is_empty());
        assert!(collection(&json!({"count": 0})).is_empty());
        assert!(collection(&json!({"notifications": [], "total": 0})).is_empty());
        let rows = collection(&json!({"total": 1, "notifications": [{"_id": "n1"}]}));
        assert_eq!(rows, vec![json!({"_id": "n1"})]);
        let record = json!({"_id": "c1", "images": ["a.png"]});
        assert_eq!(collection(&record), vec![record.clone()]);
    }

    #[test]
    fn favorites_unwrap_nested_entities() {
        let rows = vec![json!({"itemId": "f1", "farmer": {"fullName": "Ravi"}})];
        let items = project_favorites(ItemKind::Farmer, &rows);
        assert_eq!(items[0].title, "Ravi");
        assert_eq!(items[0].id, "f1");
    }

    #[test]
    fn notifications_parse_dates_and_read_flags() {
        let data = json!([
            {"_id": "n1", "title": "Price alert", "message": "Wheat up 5%", "createdAt": "2024-03-01T10:00:00Z", "isRead": 1},
            {"id": "n2", "heading": "Welcome"}
        ]);
        let items = notifications(&data);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].body, "Wheat up 5%");
        assert!(items[0].read);
        assert!(items[0].created_at.is_some());
        assert_eq!(items[1].title, "Welcome");
        assert!(!items[1].read);
        assert_eq!(items[1].created_at, None);
    }
}
