//! Logged-in user's profile, decoded from the `/v1/user/me` response.
//!
//! Decoding never fails on shape: unknown keys are kept in the property
//! bag and missing optional keys become `None`.

use crate::error::Result;
use serde::Serialize;
use serde_json::{Map, Value};

pub const EMAIL_KEY: &str = "kaccount_email";
pub const IS_VERIFIED_EMAIL_KEY: &str = "kaccount_email_verified";
pub const NICKNAME_KEY: &str = "nickname";
pub const PROFILE_IMAGE_KEY: &str = "profile_image";
pub const THUMBNAIL_IMAGE_KEY: &str = "thumbnail_image";

const ID_KEY: &str = "id";
const PROPERTIES_KEY: &str = "properties";

/// Immutable user profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserProfile {
    id: String,
    nickname: String,
    email: Option<String>,
    verified_email: bool,
    profile_image: Option<String>,
    thumbnail_image: Option<String>,
    properties: Map<String, Value>,
}

impl UserProfile {
    /// Decode from a parsed response body. Total: any JSON value yields a profile.
    pub fn from_value(body: &Value) -> Self {
        let empty = Map::new();
        let root = body.as_object().unwrap_or(&empty);
        let nested = root
            .get(PROPERTIES_KEY)
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        // Nested app properties shadow top-level keys of the same name.
        let mut properties: Map<String, Value> = root
            .iter()
            .filter(|(k, _)| k.as_str() != ID_KEY && k.as_str() != PROPERTIES_KEY)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (k, v) in nested {
            properties.insert(k.clone(), v.clone());
        }

        let id = match root.get(ID_KEY) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Self {
            id,
            nickname: non_empty_str(&properties, NICKNAME_KEY).unwrap_or_default(),
            email: non_empty_str(&properties, EMAIL_KEY),
            verified_email: flag(&properties, IS_VERIFIED_EMAIL_KEY),
            profile_image: non_empty_str(&properties, PROFILE_IMAGE_KEY),
            thumbnail_image: non_empty_str(&properties, THUMBNAIL_IMAGE_KEY),
            properties,
        }
    }

    /// Decode from a raw JSON string. Fails only when the text is not JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_verified_email(&self) -> bool {
        self.verified_email
    }

    pub fn profile_image(&self) -> Option<&str> {
        self.profile_image.as_deref()
    }

    pub fn thumbnail_image(&self) -> Option<&str> {
        self.thumbnail_image.as_deref()
    }

    /// Look up any response field, well-known or not.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Convenience for string-valued properties.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(Value::as_str)
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }
}

fn non_empty_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn flag(map: &Map<String, Value>, key: &str) -> bool {
    match map.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}
