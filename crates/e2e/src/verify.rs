//! Outcome verification against a post-submission page observation
//!
//! Dispatches once on the expected tag: the success path pins the
//! confirmation literal, each error path pins its field's message contract.
//! Every failure is immediate and local to the test case.

use crate::error::{E2eError, E2eResult};
use crate::model::Outcome;
use crate::page::PageModel;
use crate::playwright::{ElementProbe, FormObservation};

/// Assert that the observed page state matches the expected outcome.
pub fn verify_outcome(
    expected: Outcome,
    observation: &FormObservation,
    page: &PageModel,
    case_id: &str,
) -> E2eResult<()> {
    match expected.field() {
        None => verify_success(observation, page, case_id),
        Some(field) => {
            let descriptor = page.field(field).ok_or(E2eError::UnmappedField(field))?;
            let probe: ElementProbe = observation
                .errors
                .get(&field)
                .cloned()
                .unwrap_or_default();

            if !probe.visible {
                return Err(assertion(
                    case_id,
                    format!(
                        "{field} error message was not displayed (expected {})",
                        expected.as_tag()
                    ),
                ));
            }

            let text = probe.text.as_deref().unwrap_or("");
            if !descriptor.message.matches(text) {
                return Err(assertion(
                    case_id,
                    format!(
                        "{field} error message should {}, got {text:?}",
                        descriptor.message.describe()
                    ),
                ));
            }
            Ok(())
        }
    }
}

fn verify_success(
    observation: &FormObservation,
    page: &PageModel,
    case_id: &str,
) -> E2eResult<()> {
    if !observation.success.visible {
        return Err(assertion(
            case_id,
            "success confirmation was not displayed".to_string(),
        ));
    }
    let text = observation.success.text.as_deref().unwrap_or("");
    if text != page.success.text {
        return Err(assertion(
            case_id,
            format!(
                "success text mismatch: expected {:?}, got {text:?}",
                page.success.text
            ),
        ));
    }
    Ok(())
}

fn assertion(case_id: &str, message: String) -> E2eError {
    E2eError::AssertionFailed {
        case_id: case_id.to_string(),
        message,
    }
}
