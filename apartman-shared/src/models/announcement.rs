use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Truncation limit for announcement push bodies.
const BODY_LIMIT: usize = 100;
const BODY_KEEP: usize = 97;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_active: i64,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
}

impl Announcement {
    pub fn title_label(&self) -> &str {
        if self.title.is_empty() {
            "Yeni Duyuru"
        } else {
            &self.title
        }
    }

    /// Active and not yet expired at `now`. Announcements without an expiry
    /// never expire on their own.
    pub fn is_broadcastable(&self, now: DateTime<Utc>) -> bool {
        self.is_active == 1 && self.expiry_date.map_or(true, |expiry| expiry >= now)
    }

    /// Push body: full content up to 100 characters, otherwise the first 97
    /// with an ellipsis.
    pub fn push_body(&self) -> String {
        if self.content.chars().count() > BODY_LIMIT {
            let mut body: String = self.content.chars().take(BODY_KEEP).collect();
            body.push_str("...");
            body
        } else {
            self.content.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn announcement(is_active: i64, expiry: Option<DateTime<Utc>>) -> Announcement {
        Announcement {
            title: "Su Kesintisi".to_string(),
            content: "Yarın 09:00-12:00 arası su kesintisi olacaktır.".to_string(),
            is_active,
            created_date: None,
            expiry_date: expiry,
        }
    }

    #[test]
    fn broadcastable_requires_active_and_unexpired() {
        let now = Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap();
        let future = now + chrono::Duration::days(3);
        let past = now - chrono::Duration::days(1);

        assert!(announcement(1, Some(future)).is_broadcastable(now));
        assert!(announcement(1, None).is_broadcastable(now));
        assert!(announcement(1, Some(now)).is_broadcastable(now));
        assert!(!announcement(1, Some(past)).is_broadcastable(now));
        assert!(!announcement(0, Some(future)).is_broadcastable(now));
    }

    #[test]
    fn short_content_is_kept_verbatim() {
        let a = announcement(1, None);
        assert_eq!(a.push_body(), a.content);
    }

    #[test]
    fn long_content_truncates_to_97_chars_plus_ellipsis() {
        let mut a = announcement(1, None);
        a.content = "ç".repeat(150);
        let body = a.push_body();
        assert_eq!(body.chars().count(), 100);
        assert!(body.ends_with("..."));
        assert_eq!(body.chars().take(97).collect::<String>(), "ç".repeat(97));
    }

    #[test]
    fn content_of_exactly_100_chars_is_not_truncated() {
        let mut a = announcement(1, None);
        a.content = "a".repeat(100);
        assert_eq!(a.push_body(), a.content);
    }
}
