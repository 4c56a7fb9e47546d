//! Request payloads and shared domain enums.

use serde::{Deserialize, Serialize};

/// The four kinds of marketplace entity a user can browse and favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Crop,
    Farmer,
    Buyer,
    AgroShop,
}

impl ItemKind {
    /// Fixed order used when merging per-kind results.
    pub const ALL: [ItemKind; 4] = [ItemKind::Crop, ItemKind::Farmer, ItemKind::Buyer, ItemKind::AgroShop];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Crop => "crop",
            ItemKind::Farmer => "farmer",
            ItemKind::Buyer => "buyer",
            ItemKind::AgroShop => "agro-shop",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "crop" | "crops" => Some(ItemKind::Crop),
            "farmer" | "farmers" => Some(ItemKind::Farmer),
            "buyer" | "buyers" => Some(ItemKind::Buyer),
            "agro-shop" | "agro-shops" | "agroshop" | "agro_shop" => Some(ItemKind::AgroShop),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    Farmer,
    Buyer,
    AgroShop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellCropRequest {
    pub crop_id: String,
    pub quantity: f64,
    pub unit: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
}

/// One file for a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}
