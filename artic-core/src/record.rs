use std::{fmt, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize};

pub const MISSING_INSCRIPTIONS: &str = "—";

#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// One artwork row, exactly as the page fetch returned it.  Identity is the
/// `id` alone, the rest is a display snapshot.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default = "default_str", deserialize_with = "deserialize_null_arc_str")]
    pub title: Arc<str>,
    #[serde(rename = "place_of_origin")]
    #[serde(default = "default_str", deserialize_with = "deserialize_null_arc_str")]
    pub origin: Arc<str>,
    #[serde(rename = "artist_display")]
    #[serde(default = "default_str", deserialize_with = "deserialize_null_arc_str")]
    pub artist: Arc<str>,
    #[serde(default)]
    pub inscriptions: Option<Arc<str>>,
    #[serde(default)]
    pub date_start: Option<i32>,
    #[serde(default)]
    pub date_end: Option<i32>,
}

impl Record {
    pub fn inscriptions_display(&self) -> &str {
        match self.inscriptions.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => MISSING_INSCRIPTIONS,
        }
    }
}

fn default_str() -> Arc<str> {
    "".into()
}

fn deserialize_null_arc_str<'de, D>(deserializer: D) -> Result<Arc<str>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_else(default_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_source_fields() {
        let record: Record = serde_json::from_str(
            r#"{
                "id": 27992,
                "title": "A Sunday on La Grande Jatte — 1884",
                "place_of_origin": "France",
                "artist_display": "Georges Seurat\nFrench, 1859-1891",
                "inscriptions": null,
                "date_start": 1884,
                "date_end": 1886
            }"#,
        )
        .unwrap();

        assert_eq!(record.id, RecordId(27992));
        assert_eq!(&*record.origin, "France");
        assert!(record.artist.starts_with("Georges Seurat"));
        assert_eq!(record.inscriptions, None);
        assert_eq!(record.inscriptions_display(), MISSING_INSCRIPTIONS);
        assert_eq!(record.date_start, Some(1884));
        assert_eq!(record.date_end, Some(1886));
    }

    #[test]
    fn null_and_missing_strings_become_empty() {
        let record: Record =
            serde_json::from_str(r#"{"id": 1, "title": null, "date_start": null}"#).unwrap();

        assert_eq!(&*record.title, "");
        assert_eq!(&*record.origin, "");
        assert_eq!(&*record.artist, "");
        assert_eq!(record.date_start, None);
        assert_eq!(record.date_end, None);
    }

    #[test]
    fn inscriptions_shown_when_present() {
        let record: Record =
            serde_json::from_str(r#"{"id": 2, "inscriptions": "signed l.r."}"#).unwrap();
        assert_eq!(record.inscriptions_display(), "signed l.r.");
    }
}
