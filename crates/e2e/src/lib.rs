//! Contact-form E2E test framework
//!
//! This crate drives a public "contact us" marketing form through
//! Playwright, asserts on validation error messages and the success
//! confirmation, and captures diagnostic screenshots on failure:
//! - Compiles a declarative field-value record into a per-case browser
//!   script, executed with `node`
//! - Classifies the post-submission page state against an expected outcome
//! - Loads data-driven cases from CSV fixtures
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Suite Runner (Rust)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SuiteRunner                                                │
//! │    ├── collect_cases() -> fixture rows + curated literals   │
//! │    ├── plan(FieldValues, PageModel) -> [FormStep]           │
//! │    ├── BrowserSession::run_case() -> FormObservation        │
//! │    └── verify_outcome(Outcome, FormObservation)             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Generated script (one per case)                            │
//! │    ├── navigate, dismiss consent banner                     │
//! │    ├── fill / select each present field                     │
//! │    ├── conditional state resolution, submit (retry once)    │
//! │    └── probe outcome elements -> E2E_OBSERVATION {json}     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod cases;
pub mod error;
pub mod fixture;
pub mod form;
pub mod model;
pub mod page;
pub mod playwright;
pub mod report;
pub mod runner;
pub mod verify;

pub use error::{E2eError, E2eResult};
pub use model::{FieldValues, FormField, Outcome, TestCase};
pub use page::PageModel;
pub use runner::{RunnerConfig, SuiteRunner};
