use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maintenance issue document. Status transitions are what the update trigger
/// reacts to; there is no transition validation beyond "value changed".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub admin_note: String,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_date: Option<DateTime<Utc>>,
}

impl Issue {
    pub fn title_label(&self) -> &str {
        if self.title.is_empty() {
            "Talebiniz"
        } else {
            &self.title
        }
    }
}

/// User-facing Turkish label for an issue status. Unknown values pass through
/// as-is; an empty status reads as a generic update.
pub fn status_label(status: &str) -> &str {
    match status {
        "beklemede" => "Beklemede",
        "ilgileniliyor" => "İşleme Alındı",
        "tamamlandi" => "Tamamlandı",
        "" => "güncellendi",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_map_to_turkish_labels() {
        assert_eq!(status_label("beklemede"), "Beklemede");
        assert_eq!(status_label("ilgileniliyor"), "İşleme Alındı");
        assert_eq!(status_label("tamamlandi"), "Tamamlandı");
    }

    #[test]
    fn unknown_status_passes_through() {
        assert_eq!(status_label("iptal"), "iptal");
        assert_eq!(status_label(""), "güncellendi");
    }

    #[test]
    fn empty_title_falls_back() {
        let issue: Issue = serde_json::from_value(serde_json::json!({ "user_id": "u1" })).unwrap();
        assert_eq!(issue.title_label(), "Talebiniz");
    }
}
