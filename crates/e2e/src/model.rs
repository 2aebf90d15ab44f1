//! Field value model and outcome taxonomy for contact-form test cases

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Countries for which the target form requires a state/province selection.
pub const REQUIRED_STATE_COUNTRIES: [&str; 3] = ["United States", "Canada", "Australia"];

/// Whether the selected country makes the state field mandatory.
///
/// Kept as a standalone rule so the form driver and the verifier cannot
/// drift apart on the country list.
pub fn state_required(country: Option<&str>) -> bool {
    country
        .map(|c| REQUIRED_STATE_COUNTRIES.contains(&c))
        .unwrap_or(false)
}

/// Logical form fields, in the order they are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    FirstName,
    LastName,
    JobTitle,
    Email,
    Company,
    Employees,
    Phone,
    ProductInterest,
    Country,
    State,
}

impl FormField {
    /// Stable wire name, used as the observation-map key in the script protocol.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::FirstName => "first_name",
            FormField::LastName => "last_name",
            FormField::JobTitle => "job_title",
            FormField::Email => "email",
            FormField::Company => "company",
            FormField::Employees => "employees",
            FormField::Phone => "phone",
            FormField::ProductInterest => "product_interest",
            FormField::Country => "country",
            FormField::State => "state",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One test case's worth of form input.
///
/// Every attribute is optional: absence means "leave the field at its
/// default UI state", and the driver emits no action for it. Construct via
/// a fixture row or a literal, then treat as immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    /// Opaque identifier carried through diagnostics; never compared.
    pub test_case_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub employees: Option<String>,
    pub phone: Option<String>,
    pub product_interest: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
}

impl FieldValues {
    pub fn new(test_case_id: impl Into<String>) -> Self {
        Self {
            test_case_id: test_case_id.into(),
            ..Default::default()
        }
    }

    /// Look up the value for a logical field.
    pub fn get(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::FirstName => self.first_name.as_deref(),
            FormField::LastName => self.last_name.as_deref(),
            FormField::JobTitle => self.job_title.as_deref(),
            FormField::Email => self.email.as_deref(),
            FormField::Company => self.company.as_deref(),
            FormField::Employees => self.employees.as_deref(),
            FormField::Phone => self.phone.as_deref(),
            FormField::ProductInterest => self.product_interest.as_deref(),
            FormField::Country => self.country.as_deref(),
            FormField::State => self.state.as_deref(),
        }
    }

    /// Enforce the model invariant on every attribute: values are either
    /// absent or non-empty trimmed strings.
    pub fn normalized(mut self) -> Self {
        self.first_name = normalize(self.first_name);
        self.last_name = normalize(self.last_name);
        self.job_title = normalize(self.job_title);
        self.email = normalize(self.email);
        self.company = normalize(self.company);
        self.employees = normalize(self.employees);
        self.phone = normalize(self.phone);
        self.product_interest = normalize(self.product_interest);
        self.country = normalize(self.country);
        self.state = normalize(self.state);
        self
    }
}

/// Normalize a raw cell: trim surrounding whitespace, map empty to absent.
pub fn normalize(raw: Option<String>) -> Option<String> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == raw.len() {
        Some(raw)
    } else {
        Some(trimmed.to_string())
    }
}

/// The classified result of one form submission attempt.
///
/// A closed set: one success case plus one error case per validatable
/// field. Exactly one tag per test case, supplied by the fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Success,
    FirstNameError,
    LastNameError,
    JobTitleError,
    EmailError,
    CompanyError,
    EmployeesError,
    PhoneError,
    ProductInterestError,
    CountryError,
    StateError,
}

impl Outcome {
    /// The fixture tag for this outcome.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Outcome::Success => "SUCCESS",
            Outcome::FirstNameError => "FIRST_NAME_ERROR",
            Outcome::LastNameError => "LAST_NAME_ERROR",
            Outcome::JobTitleError => "JOB_TITLE_ERROR",
            Outcome::EmailError => "EMAIL_ERROR",
            Outcome::CompanyError => "COMPANY_ERROR",
            Outcome::EmployeesError => "EMPLOYEES_ERROR",
            Outcome::PhoneError => "PHONE_ERROR",
            Outcome::ProductInterestError => "PRODUCT_INTEREST_ERROR",
            Outcome::CountryError => "COUNTRY_ERROR",
            Outcome::StateError => "STATE_ERROR",
        }
    }

    /// Parse a fixture tag. `None` for unrecognized tags; the caller decides
    /// whether that is a skipped row or a fatal configuration error.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "SUCCESS" => Some(Outcome::Success),
            "FIRST_NAME_ERROR" => Some(Outcome::FirstNameError),
            "LAST_NAME_ERROR" => Some(Outcome::LastNameError),
            "JOB_TITLE_ERROR" => Some(Outcome::JobTitleError),
            "EMAIL_ERROR" => Some(Outcome::EmailError),
            "COMPANY_ERROR" => Some(Outcome::CompanyError),
            "EMPLOYEES_ERROR" => Some(Outcome::EmployeesError),
            "PHONE_ERROR" => Some(Outcome::PhoneError),
            "PRODUCT_INTEREST_ERROR" => Some(Outcome::ProductInterestError),
            "COUNTRY_ERROR" => Some(Outcome::CountryError),
            "STATE_ERROR" => Some(Outcome::StateError),
            _ => None,
        }
    }

    /// The field whose validation message this outcome points at.
    /// `None` for [`Outcome::Success`].
    pub fn field(&self) -> Option<FormField> {
        match self {
            Outcome::Success => None,
            Outcome::FirstNameError => Some(FormField::FirstName),
            Outcome::LastNameError => Some(FormField::LastName),
            Outcome::JobTitleError => Some(FormField::JobTitle),
            Outcome::EmailError => Some(FormField::Email),
            Outcome::CompanyError => Some(FormField::Company),
            Outcome::EmployeesError => Some(FormField::Employees),
            Outcome::PhoneError => Some(FormField::Phone),
            Outcome::ProductInterestError => Some(FormField::ProductInterest),
            Outcome::CountryError => Some(FormField::Country),
            Outcome::StateError => Some(FormField::State),
        }
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A fixture or literal pairing of inputs and the expectation for them.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub values: FieldValues,
    pub expected: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_tag_roundtrip() {
        let all = [
            Outcome::Success,
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
        for outcome in all {
            assert_eq!(Outcome::from_tag(outcome.as_tag()), Some(outcome));
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert_eq!(Outcome::from_tag("MAYBE_ERROR"), None);
        assert!("success".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_every_error_outcome_names_a_field() {
        assert_eq!(Outcome::Success.field(), None);
        assert_eq!(Outcome::EmailError.field(), Some(FormField::Email));
        assert_eq!(Outcome::StateError.field(), Some(FormField::State));
    }

    #[test]
    fn test_state_required_set() {
        assert!(state_required(Some("United States")));
        assert!(state_required(Some("Canada")));
        assert!(state_required(Some("Australia")));
        assert!(!state_required(Some("United Kingdom")));
        assert!(!state_required(None));
    }

    #[test]
    fn test_normalize_cells() {
        assert_eq!(normalize(None), None);
        assert_eq!(normalize(Some(String::new())), None);
        assert_eq!(normalize(Some("   ".into())), None);
        assert_eq!(normalize(Some("  James ".into())), Some("James".to_string()));
        assert_eq!(normalize(Some("James".into())), Some("James".to_string()));
    }

    #[test]
    fn test_normalized_values_hold_invariant() {
        let values = FieldValues {
            test_case_id: "TC-X".into(),
            first_name: Some("  James ".into()),
            last_name: Some(String::new()),
            ..Default::default()
        }
        .normalized();

        assert_eq!(values.first_name.as_deref(), Some("James"));
        assert_eq!(values.last_name, None);
        assert_eq!(values.get(FormField::FirstName), Some("James"));
        assert_eq!(values.get(FormField::Phone), None);
    }

    #[test]
    fn test_outcome_serializes_as_tag() {
        let json = serde_json::to_string(&Outcome::FirstNameError).unwrap();
        assert_eq!(json, "\"FIRST_NAME_ERROR\"");
    }
}
