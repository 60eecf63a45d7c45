//! Message catalogs and verdict rendering

use std::str::FromStr;

use crate::{
    domain::{HomeworkStatus, SubmissionRecord},
    result::{BotError, PollError},
};

/// Language used for every message the bot sends
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

/// Static text for one locale
///
/// `status_changed` contains the `{name}` and `{verdict}` placeholders.
#[derive(Debug)]
pub struct Catalog {
    pub approved: &'static str,
    pub reviewing: &'static str,
    pub rejected: &'static str,
    pub status_changed: &'static str,
    pub malfunction_prefix: &'static str,
}

static EN: Catalog = Catalog {
    approved: "The work has been checked: the reviewer liked everything. Hooray!",
    reviewing: "The work is under review by the reviewer.",
    rejected: "The work has been checked: the reviewer has comments.",
    status_changed: "The status of the work \"{name}\" review has changed. {verdict}",
    malfunction_prefix: "Program malfunction: ",
};

static RU: Catalog = Catalog {
    approved: "Работа проверена: ревьюеру всё понравилось. Ура!",
    reviewing: "Работа взята на проверку ревьюером.",
    rejected: "Работа проверена: у ревьюера есть замечания.",
    status_changed: "Изменился статус проверки работы \"{name}\". {verdict}",
    malfunction_prefix: "Сбой в работе программы: ",
};

impl Locale {
    pub fn catalog(&self) -> &'static Catalog {
        match self {
            Locale::En => &EN,
            Locale::Ru => &RU,
        }
    }
}

impl FromStr for Locale {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            other => Err(BotError::config_validation(
                "BOT_LOCALE",
                format!("unsupported locale \"{other}\", expected en or ru"),
            )),
        }
    }
}

impl Catalog {
    pub fn verdict(&self, status: HomeworkStatus) -> &'static str {
        match status {
            HomeworkStatus::Approved => self.approved,
            HomeworkStatus::Reviewing => self.reviewing,
            HomeworkStatus::Rejected => self.rejected,
        }
    }

    /// Operator report for an error that interrupted a poll iteration
    pub fn malfunction(&self, error: &PollError) -> String {
        format!("{}{error}", self.malfunction_prefix)
    }
}

/// Build the chat message announcing the submission's current verdict
pub fn render_verdict(record: &SubmissionRecord, catalog: &Catalog) -> Result<String, PollError> {
    let name = record.homework_name()?;
    let status = HomeworkStatus::from_code(record.status_code()?)?;

    Ok(catalog
        .status_changed
        .replace("{verdict}", catalog.verdict(status))
        .replace("{name}", name))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        domain::{StatusResponse, validate_response},
        result::SchemaViolation,
    };

    fn record(value: serde_json::Value) -> SubmissionRecord {
        validate_response(&StatusResponse::new(json!({ "homeworks": [value] }))).unwrap()
    }

    #[test]
    fn renders_reviewing_verdict() {
        let message =
            render_verdict(&record(json!({"homework_name": "hw1", "status": "reviewing"})), &EN)
                .unwrap();
        assert_eq!(
            message,
            concat!(
                "The status of the work \"hw1\" review has changed. ",
                "The work is under review by the reviewer."
            )
        );
    }

    #[test]
    fn every_known_status_has_a_verdict() {
        for locale in [Locale::En, Locale::Ru] {
            let catalog = locale.catalog();
            for status in HomeworkStatus::ALL {
                let message = render_verdict(
                    &record(json!({"homework_name": "hw", "status": status.code()})),
                    catalog,
                )
                .unwrap();
                assert!(message.ends_with(catalog.verdict(status)), "{message}");
                assert!(message.contains("\"hw\""));
            }
        }
    }

    #[test]
    fn missing_name_is_reported_by_key() {
        let err = render_verdict(&record(json!({"status": "approved"})), &EN).unwrap_err();
        assert_eq!(err, PollError::Schema(SchemaViolation::MissingKey("homework_name")));
    }

    #[test]
    fn missing_status_is_reported_by_key() {
        let err = render_verdict(&record(json!({"homework_name": "hw1"})), &EN).unwrap_err();
        assert_eq!(err, PollError::Schema(SchemaViolation::MissingKey("status")));
    }

    #[test]
    fn unknown_status_carries_the_code() {
        for code in ["done", "APPROVED", ""] {
            let err =
                render_verdict(&record(json!({"homework_name": "hw2", "status": code})), &EN)
                    .unwrap_err();
            assert_eq!(err, PollError::UnknownStatus { code: code.into() });
        }
    }

    #[test]
    fn non_string_status_is_a_schema_violation() {
        let err = render_verdict(&record(json!({"homework_name": "hw1", "status": 3})), &EN)
            .unwrap_err();
        assert_eq!(err, PollError::Schema(SchemaViolation::InvalidType("status")));
    }

    #[test]
    fn malfunction_uses_locale_prefix() {
        let err = PollError::UnknownStatus { code: "done".into() };
        assert_eq!(EN.malfunction(&err), "Program malfunction: Unknown work status: done");
        assert!(RU.malfunction(&err).starts_with("Сбой в работе программы: "));
    }

    #[test]
    fn parses_locales() {
        assert_eq!("en".parse::<Locale>(), Ok(Locale::En));
        assert_eq!(" RU ".parse::<Locale>(), Ok(Locale::Ru));
        assert!("de".parse::<Locale>().is_err());
    }
}
