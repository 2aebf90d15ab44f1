//! Locator configuration for the target contact page
//!
//! The per-field mapping of input locator, error locator, and message
//! contract is a single declarative table rather than per-field procedures.
//! The table is loadable from YAML so locator drift on the target page is a
//! configuration change, not a code change; [`PageModel::builtin`] carries
//! the locators the suite currently targets.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::E2eResult;
use crate::model::FormField;

/// Static description of the contact page: where things are and what the
/// page is expected to say. Constructed once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageModel {
    /// Target page URL.
    pub url: String,

    /// Consent banner accept button, dismissed after navigation if present.
    #[serde(default)]
    pub cookie_banner: Option<String>,

    /// Submit control.
    pub submit: String,

    /// Success confirmation element and its exact text.
    pub success: SuccessDescriptor,

    /// Per-field descriptors, in fill order.
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessDescriptor {
    pub selector: String,
    pub text: String,
}

/// Binding of one logical field to its UI locators and error-message
/// contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub field: FormField,
    pub kind: FieldKind,

    /// Locator for the input element itself.
    pub input: String,

    /// Locator for the field's inline error message.
    pub error: String,

    /// What the error message must say for this field's error outcome.
    #[serde(default)]
    pub message: MessageContract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-text input, set via clear-and-type.
    Text,
    /// Dropdown, set by exact visible-text match.
    Select,
}

/// Contract on an error message's text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageContract {
    /// Visibility alone is enough; the text is not pinned down.
    #[default]
    Displayed,
    /// Trimmed text must equal this literal.
    Exact(String),
    /// Text must contain at least one of these substrings.
    AnyOf(Vec<String>),
    /// Text must contain all of these substrings.
    AllOf(Vec<String>),
}

impl MessageContract {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            MessageContract::Displayed => true,
            MessageContract::Exact(expected) => text == expected,
            MessageContract::AnyOf(needles) => needles.iter().any(|n| text.contains(n.as_str())),
            MessageContract::AllOf(needles) => needles.iter().all(|n| text.contains(n.as_str())),
        }
    }

    /// Human-readable form for assertion messages.
    pub fn describe(&self) -> String {
        match self {
            MessageContract::Displayed => "be displayed".to_string(),
            MessageContract::Exact(expected) => format!("equal {expected:?}"),
            MessageContract::AnyOf(needles) => format!("contain any of {needles:?}"),
            MessageContract::AllOf(needles) => format!("contain all of {needles:?}"),
        }
    }
}

impl PageModel {
    /// Parse a page model from a YAML string.
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a page model from a YAML file.
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// The descriptor for a logical field, if the table maps it.
    pub fn field(&self, field: FormField) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|d| d.field == field)
    }

    /// The built-in model of the public contact-me form.
    pub fn builtin() -> Self {
        fn text(field: FormField, name: &str, message: MessageContract) -> FieldDescriptor {
            FieldDescriptor {
                field,
                kind: FieldKind::Text,
                input: format!("input[name='{name}']"),
                error: format!("input[name='{name}'] ~ span.error-msg"),
                message,
            }
        }
        fn select(field: FormField, name: &str, message: MessageContract) -> FieldDescriptor {
            FieldDescriptor {
                field,
                kind: FieldKind::Select,
                input: format!("select[name='{name}']"),
                error: format!("select[name='{name}'] ~ span.error-msg"),
                message,
            }
        }

        Self {
            url: "https://www.salesforce.com/form/contact/contactme/".to_string(),
            cookie_banner: Some("#onetrust-accept-btn-handler".to_string()),
            submit: "[name='contact me']".to_string(),
            success: SuccessDescriptor {
                selector: "#thank-you-well-be-in-touch-soon span".to_string(),
                text: "Thank you. We'll be in touch soon.".to_string(),
            },
            fields: vec![
                text(
                    FormField::FirstName,
                    "UserFirstName",
                    MessageContract::Exact("Enter your first name".to_string()),
                ),
                text(
                    FormField::LastName,
                    "UserLastName",
                    MessageContract::Exact("Enter your last name".to_string()),
                ),
                text(FormField::JobTitle, "UserTitle", MessageContract::Displayed),
                text(
                    FormField::Email,
                    "UserEmail",
                    MessageContract::AnyOf(vec!["valid".to_string(), "email".to_string()]),
                ),
                text(FormField::Company, "CompanyName", MessageContract::Displayed),
                select(
                    FormField::Employees,
                    "CompanyEmployees",
                    MessageContract::AllOf(vec!["employee".to_string(), "number".to_string()]),
                ),
                text(
                    FormField::Phone,
                    "UserPhone",
                    MessageContract::AnyOf(vec![
                        "phone".to_string(),
                        "number".to_string(),
                        "format".to_string(),
                    ]),
                ),
                select(
                    FormField::ProductInterest,
                    "Lead.Primary_Product_Interest__c",
                    MessageContract::Displayed,
                ),
                select(FormField::Country, "CompanyCountry", MessageContract::Displayed),
                select(FormField::State, "CompanyState", MessageContract::Displayed),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Outcome;
    use test_case::test_case;

    #[test]
    fn test_builtin_maps_every_error_outcome() {
        let page = PageModel::builtin();
        let errors = [
            Outcome::FirstNameError,
            Outcome::LastNameError,
            Outcome::JobTitleError,
            Outcome::EmailError,
            Outcome::CompanyError,
            Outcome::EmployeesError,
            Outcome::PhoneError,
            Outcome::ProductInterestError,
            Outcome::CountryError,
            Outcome::StateError,
        ];
        for outcome in errors {
            let field = outcome.field().unwrap();
            assert!(page.field(field).is_some(), "no descriptor for {field}");
        }
    }

    #[test]
    fn test_builtin_field_order_ends_with_country_then_state() {
        let page = PageModel::builtin();
        let order: Vec<FormField> = page.fields.iter().map(|d| d.field).collect();
        assert_eq!(order[order.len() - 2], FormField::Country);
        assert_eq!(order[order.len() - 1], FormField::State);
    }

    #[test]
    fn test_parse_page_model_yaml() {
        let yaml = r##"
url: https://example.org/contact
submit: "button[type='submit']"
success:
  selector: "#done"
  text: "Thanks!"
fields:
  - field: first_name
    kind: text
    input: "#fn"
    error: "#fn-err"
    message:
      exact: Enter your first name
  - field: country
    kind: select
    input: "#country"
    error: "#country-err"
"##;
        let page = PageModel::from_yaml(yaml).unwrap();
        assert_eq!(page.url, "https://example.org/contact");
        assert_eq!(page.cookie_banner, None);
        assert_eq!(page.fields.len(), 2);

        let first = page.field(FormField::FirstName).unwrap();
        assert_eq!(first.kind, FieldKind::Text);
        assert_eq!(
            first.message,
            MessageContract::Exact("Enter your first name".to_string())
        );

        // Message contract defaults to visibility-only when omitted.
        let country = page.field(FormField::Country).unwrap();
        assert_eq!(country.message, MessageContract::Displayed);
    }

    #[test_case("Enter a valid email", true; "mentions valid")]
    #[test_case("Please use a business email", true; "mentions email")]
    #[test_case("This field is required", false; "mentions neither")]
    fn test_email_contract(message: &str, ok: bool) {
        let contract = MessageContract::AnyOf(vec!["valid".to_string(), "email".to_string()]);
        assert_eq!(contract.matches(message), ok);
    }

    #[test_case("Enter the number of employees", true; "both words")]
    #[test_case("Select employee count", false; "missing number")]
    #[test_case("Enter a number", false; "missing employee")]
    fn test_employees_contract(message: &str, ok: bool) {
        let contract = MessageContract::AllOf(vec!["employee".to_string(), "number".to_string()]);
        assert_eq!(contract.matches(message), ok);
    }

    #[test]
    fn test_exact_contract_is_literal() {
        let contract = MessageContract::Exact("Enter your first name".to_string());
        assert!(contract.matches("Enter your first name"));
        assert!(!contract.matches("Enter your first name."));
    }
}
