use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Document-write envelope delivered by the platform when a watched
/// collection changes. `before` is only present on updates.
#[derive(Debug, Deserialize)]
pub struct DocumentEvent {
    pub collection: String,
    pub kind: EventKind,
    pub document_id: String,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Created,
    Updated,
}

impl DocumentEvent {
    pub fn after_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.after.clone().and_then(|value| {
            serde_json::from_value(value)
                .map_err(|e| log::warn!("Belge ({}) çözümlenemedi: {}", self.document_id, e))
                .ok()
        })
    }

    pub fn before_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.before.clone().and_then(|value| {
            serde_json::from_value(value)
                .map_err(|e| log::warn!("Önceki belge ({}) çözümlenemedi: {}", self.document_id, e))
                .ok()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_update_envelope() {
        let event: DocumentEvent = serde_json::from_value(json!({
            "collection": "payments",
            "kind": "updated",
            "document_id": "p1",
            "before": { "is_paid": 0 },
            "after": { "is_paid": 1 }
        }))
        .unwrap();

        assert_eq!(event.kind, EventKind::Updated);
        assert_eq!(event.document_id, "p1");
        assert!(event.before.is_some());
    }

    #[test]
    fn created_envelope_has_no_before() {
        let event: DocumentEvent = serde_json::from_value(json!({
            "collection": "payments",
            "kind": "created",
            "document_id": "p1",
            "after": {}
        }))
        .unwrap();

        assert_eq!(event.kind, EventKind::Created);
        assert!(event.before.is_none());
    }
}
