//! Form driver — translates field values into a deterministic action plan
//!
//! The plan is pure data: one step per present field, in the page table's
//! order, with the conditional state policy resolved up front. The
//! [`crate::playwright`] module compiles the plan into a browser script.

use crate::error::{E2eError, E2eResult};
use crate::model::{state_required, FieldValues, FormField};
use crate::page::{FieldKind, PageModel};

/// A single UI action in a form-filling sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum FormStep {
    /// Load the target page.
    Navigate { url: String },

    /// Accept the consent banner if it shows up; absence is fine.
    DismissCookieBanner { selector: String },

    /// Clear the input and type the value.
    Fill {
        field: FormField,
        selector: String,
        value: String,
    },

    /// Select a dropdown option by exact visible text. A missing option is
    /// a configuration error, surfaced rather than ignored.
    SelectByLabel {
        field: FormField,
        selector: String,
        label: String,
    },

    /// Apply the conditional state-field policy.
    ///
    /// With a value: wait for the field to become interactable and select,
    /// failing hard on timeout. Without a value: wait briefly for the field
    /// to appear (its visibility depends asynchronously on the just-set
    /// country) and proceed only if the country does not require a state.
    ResolveState {
        selector: String,
        value: Option<String>,
        required: bool,
        country: Option<String>,
    },

    /// Click the submit control, retrying once after a short delay if the
    /// first click fails. A second failure surfaces.
    Submit { selector: String },
}

/// Build the action plan for one test case.
///
/// Absent attributes produce no step, so the corresponding UI fields keep
/// their default state. The state field is always handled after every other
/// field, regardless of its position in the table.
pub fn plan(values: &FieldValues, page: &PageModel) -> E2eResult<Vec<FormStep>> {
    let mut steps = vec![FormStep::Navigate {
        url: page.url.clone(),
    }];

    if let Some(selector) = &page.cookie_banner {
        steps.push(FormStep::DismissCookieBanner {
            selector: selector.clone(),
        });
    }

    for descriptor in &page.fields {
        if descriptor.field == FormField::State {
            continue; // handled below, after the country is set
        }
        let Some(value) = values.get(descriptor.field) else {
            continue;
        };
        let step = match descriptor.kind {
            FieldKind::Text => FormStep::Fill {
                field: descriptor.field,
                selector: descriptor.input.clone(),
                value: value.to_string(),
            },
            FieldKind::Select => FormStep::SelectByLabel {
                field: descriptor.field,
                selector: descriptor.input.clone(),
                label: value.to_string(),
            },
        };
        steps.push(step);
    }

    let required = state_required(values.country.as_deref());
    match page.field(FormField::State) {
        Some(descriptor) => {
            if values.state.is_some() || required {
                steps.push(FormStep::ResolveState {
                    selector: descriptor.input.clone(),
                    value: values.state.clone(),
                    required,
                    country: values.country.clone(),
                });
            }
        }
        None => {
            // Tolerated drift: some page variants have no state field at
            // all. A supplied value still has nowhere to go.
            if values.state.is_some() {
                return Err(E2eError::UnmappedField(FormField::State));
            }
            if required {
                return Err(E2eError::StateFieldRequired {
                    country: values.country.clone().unwrap_or_default(),
                });
            }
        }
    }

    steps.push(FormStep::Submit {
        selector: page.submit.clone(),
    });
    Ok(steps)
}
