//! Aggregate JSON document codec.
//!
//! # Responsibility
//! - Decode user-supplied or remote JSON into a validated `Portfolio`.
//! - Render the aggregate as the pretty-printed export document.
//! - Overlay stored record fields onto a baseline record.
//!
//! # Invariants
//! - Decoding is all-or-nothing: a rejected document yields no partial data.
//! - Every rejection names the offending section when there is one.

use crate::model::portfolio::{
    Contact, Education, Experience, PersonalInfo, Portfolio, PortfolioValidationError, Project,
    Skill,
};
use crate::model::section::Section;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EXPORT_FILE_PREFIX: &str = "portfolio-data";

/// Reason an aggregate document was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Text is not JSON at all.
    MalformedJson(String),
    /// JSON root is not an object.
    NotAnObject,
    MissingSection(Section),
    /// Section is present but does not match its schema.
    InvalidSection { section: Section, message: String },
    Validation(PortfolioValidationError),
}

impl ImportError {
    /// Short banner text suitable for the admin panel.
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedJson(_) => {
                "Error parsing JSON file. Please check the file format.".to_string()
            }
            other => format!(
                "Invalid data format. Please ensure the file contains valid portfolio data ({other})."
            ),
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedJson(message) => write!(f, "document is not valid JSON: {message}"),
            Self::NotAnObject => write!(f, "document root must be a JSON object"),
            Self::MissingSection(section) => write!(f, "document is missing `{section}`"),
            Self::InvalidSection { section, message } => {
                write!(f, "`{section}` does not match the expected shape: {message}")
            }
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PortfolioValidationError> for ImportError {
    fn from(value: PortfolioValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Decodes a full aggregate document.
///
/// # Errors
/// - `MalformedJson` / `NotAnObject` for unusable input.
/// - `MissingSection` for the first absent section, checking `projects` first.
/// - `InvalidSection` when a section fails its typed decode.
/// - `Validation` when identifiers are blank or duplicated.
pub fn decode_portfolio_document(text: &str) -> Result<Portfolio, ImportError> {
    let root: Value =
        serde_json::from_str(text).map_err(|err| ImportError::MalformedJson(err.to_string()))?;
    let object = root.as_object().ok_or(ImportError::NotAnObject)?;

    let projects: Vec<Project> = decode_section(object, Section::Projects)?;
    let personal_info: PersonalInfo = decode_section(object, Section::PersonalInfo)?;
    let contact: Contact = decode_section(object, Section::Contact)?;
    let skills: Vec<Skill> = decode_section(object, Section::Skills)?;
    let experience: Vec<Experience> = decode_section(object, Section::Experience)?;
    let education: Vec<Education> = decode_section(object, Section::Education)?;

    let portfolio = Portfolio {
        personal_info,
        projects,
        skills,
        experience,
        education,
        contact,
    };
    portfolio.validate()?;
    Ok(portfolio)
}

/// Renders the aggregate as a pretty-printed JSON document.
pub fn encode_portfolio_document(portfolio: &Portfolio) -> serde_json::Result<String> {
    serde_json::to_string_pretty(portfolio)
}

/// Returns the date-stamped download name for an export taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}-{}.json", date.format("%Y-%m-%d"))
}

/// Overlays the top-level fields of the stored JSON object onto `base`.
///
/// Fields absent from `stored` keep their `base` value. Fails when `stored`
/// is not a JSON object or the merged value no longer matches `T`.
pub fn overlay_record<T>(base: &T, stored: &str) -> serde_json::Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = serde_json::to_value(base)?;
    let overlay: Map<String, Value> = serde_json::from_str(stored)?;
    if let Value::Object(fields) = &mut merged {
        fields.extend(overlay);
    }
    serde_json::from_value(merged)
}

fn decode_section<T: DeserializeOwned>(
    object: &Map<String, Value>,
    section: Section,
) -> Result<T, ImportError> {
    let value = object
        .get(section.field_name())
        .ok_or(ImportError::MissingSection(section))?;
    if !section.is_record() && !value.is_array() {
        return Err(ImportError::InvalidSection {
            section,
            message: "expected an array".to_string(),
        });
    }
    T::deserialize(value).map_err(|err| ImportError::InvalidSection {
        section,
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{
        decode_portfolio_document, encode_portfolio_document, export_file_name, overlay_record,
        ImportError,
    };
    use crate::baseline::{baseline_document, baseline_portfolio};
    use crate::model::portfolio::{PersonalInfo, PortfolioValidationError};
    use crate::model::section::Section;
    use chrono::NaiveDate;
    use serde_json::Value;

    fn baseline_value() -> Value {
        serde_json::from_str(baseline_document()).unwrap()
    }

    #[test]
    fn decodes_baseline_document() {
        let decoded = decode_portfolio_document(baseline_document()).unwrap();
        assert_eq!(decoded, baseline_portfolio());
    }

    #[test]
    fn encoded_document_decodes_to_same_aggregate() {
        let mut portfolio = baseline_portfolio();
        portfolio.projects.truncate(1);
        portfolio.contact.instagram = Some("https://instagram.com/me".to_string());

        let text = encode_portfolio_document(&portfolio).unwrap();
        assert_eq!(decode_portfolio_document(&text).unwrap(), portfolio);
    }

    #[test]
    fn rejects_malformed_json_with_parse_banner() {
        let err = decode_portfolio_document("{ not json").unwrap_err();
        assert!(matches!(err, ImportError::MalformedJson(_)));
        assert!(err.user_message().contains("parsing JSON"));
    }

    #[test]
    fn rejects_non_object_root() {
        assert_eq!(
            decode_portfolio_document("[1, 2]").unwrap_err(),
            ImportError::NotAnObject
        );
    }

    #[test]
    fn rejects_missing_projects_first() {
        let mut value = baseline_value();
        let object = value.as_object_mut().unwrap();
        object.remove("projects");
        object.remove("skills");

        let err = decode_portfolio_document(&value.to_string()).unwrap_err();
        assert_eq!(err, ImportError::MissingSection(Section::Projects));
        assert!(err.user_message().contains("Invalid data format"));
    }

    #[test]
    fn rejects_projects_that_are_not_an_array() {
        let mut value = baseline_value();
        value["projects"] = Value::String("nope".to_string());

        let err = decode_portfolio_document(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::InvalidSection {
                section: Section::Projects,
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_status_tag_with_section_context() {
        let mut value = baseline_value();
        value["projects"][0]["status"] = Value::String("abandoned".to_string());

        let err = decode_portfolio_document(&value.to_string()).unwrap_err();
        match err {
            ImportError::InvalidSection { section, message } => {
                assert_eq!(section, Section::Projects);
                assert!(message.contains("abandoned"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_skill_ids() {
        let mut value = baseline_value();
        value["skills"][1]["id"] = value["skills"][0]["id"].clone();

        let err = decode_portfolio_document(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::Validation(PortfolioValidationError::DuplicateId {
                section: Section::Skills,
                ..
            })
        ));
    }

    #[test]
    fn export_file_name_is_date_stamped() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "portfolio-data-2024-03-09.json");
    }

    #[test]
    fn overlay_record_keeps_unspecified_fields() {
        let base = baseline_portfolio().personal_info;
        let merged: PersonalInfo = overlay_record(&base, r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(merged.name, "Ada");
        assert_eq!(merged.title, base.title);
        assert_eq!(merged.years_of_experience, base.years_of_experience);
    }

    #[test]
    fn overlay_record_rejects_non_object_values() {
        let base = baseline_portfolio().personal_info;
        assert!(overlay_record(&base, "[]").is_err());
    }
}
