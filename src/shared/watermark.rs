//! Watermark preferences embedded in every account.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Text stamped on Free-tier output.
pub const DEFAULT_WATERMARK_TEXT: &str = "AI Interior Designer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    Logo,
    Text,
}

impl WatermarkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatermarkKind::Logo => "logo",
            WatermarkKind::Text => "text",
        }
    }
}

impl TryFrom<String> for WatermarkKind {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "logo" => Ok(WatermarkKind::Logo),
            "text" => Ok(WatermarkKind::Text),
            other => Err(SharedError::validation(
                "type",
                format!("unknown watermark type: {}", other),
            )),
        }
    }
}

/// Watermark preferences as stored on the account row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WatermarkSettings {
    #[sqlx(rename = "watermark_enabled")]
    pub enabled: bool,
    #[serde(rename = "type")]
    #[sqlx(rename = "watermark_kind", try_from = "String")]
    pub kind: WatermarkKind,
    #[sqlx(rename = "watermark_logo_url")]
    pub logo_url: Option<String>,
    #[sqlx(rename = "watermark_text")]
    pub text: Option<String>,
    #[serde(rename = "language")]
    #[sqlx(rename = "watermark_locale")]
    pub locale: Option<String>,
    #[sqlx(rename = "watermark_position")]
    pub position: String,
    /// 0 (transparent) to 100 (opaque)
    #[sqlx(rename = "watermark_opacity")]
    pub opacity: i64,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: WatermarkKind::Text,
            logo_url: None,
            text: None,
            locale: None,
            position: "bottom-right".to_string(),
            opacity: 70,
        }
    }
}

impl WatermarkSettings {
    pub fn validate(&self) -> Result<(), SharedError> {
        if !(0..=100).contains(&self.opacity) {
            return Err(SharedError::validation("opacity", "Opacity must be between 0 and 100"));
        }
        if self.position.trim().is_empty() {
            return Err(SharedError::validation("position", "Position is required"));
        }
        if self.enabled && self.kind == WatermarkKind::Logo && self.logo_url.is_none() {
            return Err(SharedError::validation("logoUrl", "A logo watermark needs a logo URL"));
        }
        Ok(())
    }
}
