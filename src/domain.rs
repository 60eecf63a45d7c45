use compact_str::CompactString;
use serde_json::{Map, Value};

use crate::result::{PollError, SchemaViolation};

/// Decoded body of the homework status endpoint
///
/// Kept as raw JSON so every shape check is explicit and reported as a
/// [`SchemaViolation`] instead of a generic decode error.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusResponse(Value);

/// One element of the `homeworks` list
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord(Map<String, Value>);

/// Review status codes the bot knows how to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl StatusResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Cursor to use for the next request, if the API supplied one
    ///
    /// Anything other than an integer (including `null`) counts as absent.
    pub fn current_date(&self) -> Option<i64> {
        self.0.get("current_date").and_then(Value::as_i64)
    }
}

impl SubmissionRecord {
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn homework_name(&self) -> Result<&str, SchemaViolation> {
        self.string_field("homework_name")
    }

    pub fn status_code(&self) -> Result<&str, SchemaViolation> {
        self.string_field("status")
    }

    fn string_field(&self, key: &'static str) -> Result<&str, SchemaViolation> {
        self.0
            .get(key)
            .ok_or(SchemaViolation::MissingKey(key))?
            .as_str()
            .ok_or(SchemaViolation::InvalidType(key))
    }
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, PollError> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or_else(|| PollError::UnknownStatus { code: CompactString::from(code) })
    }
}

/// Pick the most recent submission out of a status response
///
/// The API lists submissions newest first, so element 0 is returned as-is.
pub fn validate_response(response: &StatusResponse) -> Result<SubmissionRecord, SchemaViolation> {
    let object = response.as_value().as_object().ok_or(SchemaViolation::NotAnObject)?;
    let homeworks = object
        .get("homeworks")
        .ok_or(SchemaViolation::HomeworksMissing)?
        .as_array()
        .ok_or(SchemaViolation::HomeworksNotList)?;

    match homeworks.first() {
        Some(Value::Object(record)) => Ok(SubmissionRecord(record.clone())),
        Some(_) => Err(SchemaViolation::SubmissionNotAnObject),
        None => Err(SchemaViolation::NoSubmissions),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn returns_first_submission_unchanged() {
        let first = json!({
            "homework_name": "hw3",
            "status": "approved",
            "reviewer_comment": "ok",
            "id": 7
        });
        let response = StatusResponse::new(json!({
            "homeworks": [first.clone(), {"homework_name": "hw2", "status": "rejected"}],
            "current_date": 1000
        }));

        let record = validate_response(&response).unwrap();
        assert_eq!(Value::Object(record.fields().clone()), first);
    }

    #[test]
    fn rejects_non_object_response() {
        let response = StatusResponse::new(json!([{"homework_name": "hw1"}]));
        assert_eq!(validate_response(&response), Err(SchemaViolation::NotAnObject));
    }

    #[test]
    fn rejects_missing_homeworks() {
        let response = StatusResponse::new(json!({"current_date": 1000}));
        assert_eq!(validate_response(&response), Err(SchemaViolation::HomeworksMissing));
    }

    #[test]
    fn rejects_non_list_homeworks() {
        for homeworks in [json!({"homework_name": "hw1"}), json!("hw1"), json!(null), json!(3)] {
            let response = StatusResponse::new(json!({ "homeworks": homeworks }));
            assert_eq!(validate_response(&response), Err(SchemaViolation::HomeworksNotList));
        }
    }

    #[test]
    fn rejects_empty_homeworks() {
        let response = StatusResponse::new(json!({"homeworks": [], "current_date": 1000}));
        assert_eq!(validate_response(&response), Err(SchemaViolation::NoSubmissions));
    }

    #[test]
    fn rejects_scalar_submission() {
        let response = StatusResponse::new(json!({"homeworks": ["hw1"]}));
        assert_eq!(validate_response(&response), Err(SchemaViolation::SubmissionNotAnObject));
    }

    #[test]
    fn current_date_only_counts_integers() {
        assert_eq!(StatusResponse::new(json!({"current_date": 1000})).current_date(), Some(1000));
        assert_eq!(StatusResponse::new(json!({"current_date": null})).current_date(), None);
        assert_eq!(StatusResponse::new(json!({"current_date": "1000"})).current_date(), None);
        assert_eq!(StatusResponse::new(json!({"homeworks": []})).current_date(), None);
    }

    #[test]
    fn status_codes_round_trip() {
        for status in HomeworkStatus::ALL {
            assert_eq!(HomeworkStatus::from_code(status.code()), Ok(status));
        }
        assert_eq!(
            HomeworkStatus::from_code("done"),
            Err(PollError::UnknownStatus { code: "done".into() })
        );
    }
}
