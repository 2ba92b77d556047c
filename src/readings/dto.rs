use serde::{Deserialize, Serialize};

use crate::readings::repo::ReadingKind;

/// Request body for submitting a reading. This route carries the
/// session token in the body; the GET routes take it as a query
/// parameter.
#[derive(Debug, Deserialize)]
pub struct AddReadingRequest {
    pub session: String,
    pub date: String,
    /// HH:MM. Left empty, it is filled with the category default.
    #[serde(default)]
    pub time: String,
    #[serde(rename = "type")]
    pub kind: ReadingKind,
    /// mg/dL. The UI keeps values inside [50, 500]; this layer records
    /// whatever number arrives.
    pub value: f64,
}

/// Response for a recorded reading.
#[derive(Debug, Serialize)]
pub struct AddReadingResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_defaults_to_empty_when_absent() {
        let body = serde_json::json!({
            "session": "abc123",
            "date": "2026-08-07",
            "type": "night",
            "value": 120
        });
        let req: AddReadingRequest = serde_json::from_value(body).unwrap();
        assert!(req.time.is_empty());
        assert_eq!(req.kind, ReadingKind::Night);
        assert_eq!(req.value, 120.0);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let body = serde_json::json!({
            "session": "abc123",
            "date": "2026-08-07",
            "type": "brunch",
            "value": 120
        });
        assert!(serde_json::from_value::<AddReadingRequest>(body).is_err());
    }
}
