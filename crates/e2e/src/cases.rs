//! Curated literal test cases
//!
//! Hand-picked scenarios that exist independently of any fixture file: one
//! known-good submission, plus sweeps over malformed email and phone
//! inputs. The sweeps only pin the error *category* — the page decides why
//! a given input is invalid, the suite only requires that the reported
//! message satisfies the field's contract.

use crate::model::{FieldValues, Outcome, TestCase};

/// Malformed email formats: missing '@' or domain, empty user, bare
/// domain, double dots on either side of the '@'.
pub const INVALID_EMAILS: [&str; 7] = [
    "email-without-at-or-domain",
    "email-without-domain-or-domainName@",
    "@withoutuser.com",
    "without-domain@domain",
    "wihtout-domain-name@.com",
    "double..dots@domain.com",
    "double-Dots-DomainName@domain..com",
];

/// Malformed phone values: non-numeric bodies, truncated groups,
/// bracket/paren-wrapped digits, too many delimiter groups.
pub const INVALID_PHONES: [&str; 6] = [
    "abcdef",
    "123-456",
    "[4024124851]",
    "(402)412485",
    "402-412-4851-9999",
    "12--34",
];

/// A complete, well-formed set of values; sweeps override one field each.
fn baseline(test_case_id: String) -> FieldValues {
    FieldValues {
        test_case_id,
        first_name: Some("Jack".into()),
        last_name: Some("Ellis".into()),
        job_title: Some("Software Engineer".into()),
        email: Some("jack.ellis@example.com".into()),
        company: Some("Liberty IT".into()),
        employees: Some("201 - 10000 employees".into()),
        phone: Some("07124045248".into()),
        product_interest: Some("Artificial Intelligence".into()),
        country: Some("United Kingdom".into()),
        state: None,
    }
}

/// The smoke case: every field valid, a required-state country with its
/// state supplied, expecting the success confirmation.
pub fn valid_submission() -> TestCase {
    TestCase {
        values: FieldValues {
            test_case_id: "valid-submission".into(),
            first_name: Some("James".into()),
            last_name: Some("Smith".into()),
            job_title: Some("Accountant".into()),
            email: Some("jamesSmith@example.com".into()),
            company: Some("BlackRock".into()),
            employees: Some("201 - 10000 employees".into()),
            phone: Some("07402182492".into()),
            product_interest: Some("Artificial Intelligence".into()),
            country: Some("United States".into()),
            state: Some("Alabama".into()),
        },
        expected: Outcome::Success,
    }
}

/// Every curated malformed email, one case each.
pub fn invalid_email_sweep() -> Vec<TestCase> {
    INVALID_EMAILS
        .iter()
        .enumerate()
        .map(|(i, email)| {
            let mut values = baseline(format!("invalid-email-{:02}", i + 1));
            values.email = Some((*email).to_string());
            TestCase {
                values,
                expected: Outcome::EmailError,
            }
        })
        .collect()
}

/// Every curated malformed phone value, one case each.
pub fn invalid_phone_sweep() -> Vec<TestCase> {
    INVALID_PHONES
        .iter()
        .enumerate()
        .map(|(i, phone)| {
            let mut values = baseline(format!("invalid-phone-{:02}", i + 1));
            values.phone = Some((*phone).to_string());
            TestCase {
                values,
                expected: Outcome::PhoneError,
            }
        })
        .collect()
}

/// All built-in cases, in a stable order.
pub fn builtin() -> Vec<TestCase> {
    let mut cases = vec![valid_submission()];
    cases.extend(invalid_email_sweep());
    cases.extend(invalid_phone_sweep());
    cases
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_case_ids_are_unique() {
        let cases = builtin();
        let ids: HashSet<&str> = cases
            .iter()
            .map(|c| c.values.test_case_id.as_str())
            .collect();
        assert_eq!(ids.len(), cases.len());
    }

    #[test]
    fn test_sweeps_cover_every_literal() {
        assert_eq!(invalid_email_sweep().len(), INVALID_EMAILS.len());
        assert_eq!(invalid_phone_sweep().len(), INVALID_PHONES.len());
    }

    #[test]
    fn test_email_sweep_only_varies_email() {
        for case in invalid_email_sweep() {
            assert_eq!(case.expected, Outcome::EmailError);
            assert_eq!(case.values.first_name.as_deref(), Some("Jack"));
            assert!(INVALID_EMAILS.contains(&case.values.email.as_deref().unwrap()));
            // No state and a non-required country, so state resolution
            // never gets in the way of the email expectation.
            assert_eq!(case.values.state, None);
            assert_eq!(case.values.country.as_deref(), Some("United Kingdom"));
        }
    }

    #[test]
    fn test_phone_sweep_expects_phone_errors() {
        for case in invalid_phone_sweep() {
            assert_eq!(case.expected, Outcome::PhoneError);
            assert!(INVALID_PHONES.contains(&case.values.phone.as_deref().unwrap()));
        }
    }

    #[test]
    fn test_valid_submission_supplies_state_for_required_country() {
        let case = valid_submission();
        assert_eq!(case.expected, Outcome::Success);
        assert_eq!(case.values.country.as_deref(), Some("United States"));
        assert!(case.values.state.is_some());
    }
}
