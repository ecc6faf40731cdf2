use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Cruce visto desde el usuario actual (solo lectura, propiedad del backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CrossingPayload")]
pub struct CrossingSummary {
    pub id: i64,
    pub other_user_id: i64,
    pub other_username: String,
    pub other_avatar_url: Option<String>,
    pub other_look_id: Option<i64>,
    /// Fotos del look del otro usuario, en el orden del backend
    pub other_look_photo_refs: Vec<String>,
    pub crossed_at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub views_count: u32,
    pub likes_count: u32,
    pub location_label: Option<String>,
}

/// Forma en que `GET /crossings/` entrega cada cruce
#[derive(Debug, Deserialize)]
struct CrossingPayload {
    id: i64,
    other_user_id: i64,
    other_username: String,
    #[serde(default)]
    other_avatar_url: Option<String>,
    #[serde(default)]
    other_look_id: Option<i64>,
    #[serde(default)]
    other_look_photo_url: Option<String>,
    #[serde(default, alias = "other_look_photo_refs")]
    other_look_photos: Vec<String>,
    #[serde(deserialize_with = "deserialize_server_time")]
    crossed_at: DateTime<Utc>,
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
    #[serde(default)]
    views_count: u32,
    #[serde(default)]
    likes_count: u32,
    #[serde(default, alias = "location_label")]
    location_name: Option<String>,
}

impl From<CrossingPayload> for CrossingSummary {
    fn from(raw: CrossingPayload) -> Self {
        // Backends antiguos solo mandan una foto
        let other_look_photo_refs = if raw.other_look_photos.is_empty() {
            raw.other_look_photo_url.into_iter().collect()
        } else {
            raw.other_look_photos
        };

        Self {
            id: raw.id,
            other_user_id: raw.other_user_id,
            other_username: raw.other_username,
            other_avatar_url: raw.other_avatar_url,
            other_look_id: raw.other_look_id,
            other_look_photo_refs,
            crossed_at: raw.crossed_at,
            latitude: raw.latitude,
            longitude: raw.longitude,
            views_count: raw.views_count,
            likes_count: raw.likes_count,
            location_label: raw.location_name,
        }
    }
}

/// Fechas del backend: RFC 3339 o ISO sin zona (UTC implícito)
pub fn parse_server_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_server_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_server_time(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("fecha inválida: {}", raw)))
}
