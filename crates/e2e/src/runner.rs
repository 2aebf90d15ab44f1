//! Suite orchestration — one isolated browser session per test case
//!
//! Cases are independent and order-insensitive: each one gets a fresh
//! session, its own plan, and its own verdict. A failing case never aborts
//! the rest of the run.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::cases;
use crate::error::{E2eError, E2eResult};
use crate::fixture::{self, FixtureLoad};
use crate::form;
use crate::model::TestCase;
use crate::page::PageModel;
use crate::playwright::{BrowserSession, PlaywrightConfig};
use crate::report::{CaseResult, FailureReporter, SuiteResult};
use crate::verify;

/// Configuration for the suite runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Locator table for the target page.
    pub page: PageModel,

    /// Browser and timing configuration.
    pub playwright: PlaywrightConfig,

    /// Single fixture file to load, if any.
    pub fixture: Option<PathBuf>,

    /// Directory of fixture files to sweep, if any.
    pub fixtures_dir: Option<PathBuf>,

    /// Whether the curated literal cases run alongside fixture rows.
    pub include_builtin: bool,

    /// Run only the case with this id.
    pub name_filter: Option<String>,

    /// Where results and failure screenshots land.
    pub output_dir: PathBuf,

    /// Check target reachability before running.
    pub preflight: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            page: PageModel::builtin(),
            playwright: PlaywrightConfig::default(),
            fixture: None,
            fixtures_dir: None,
            include_builtin: true,
            name_filter: None,
            output_dir: PathBuf::from("test-results"),
            preflight: true,
        }
    }
}

/// Main suite runner.
pub struct SuiteRunner {
    config: RunnerConfig,
}

impl SuiteRunner {
    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Fail fast on a missing Playwright install or an unreachable target.
    pub async fn preflight(&self) -> E2eResult<()> {
        BrowserSession::check_installed()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        match client.get(&self.config.page.url).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Target reachable: {}", self.config.page.url);
                Ok(())
            }
            Ok(response) => {
                // Marketing pages answer bots with odd statuses; the
                // browser run is the authority, so only note it.
                warn!(
                    "Target {} answered preflight with {}",
                    self.config.page.url,
                    response.status()
                );
                Ok(())
            }
            Err(e) => Err(E2eError::TargetUnreachable(e.to_string())),
        }
    }

    /// Assemble the case list: curated literals, then fixture rows.
    pub fn collect_cases(&self) -> E2eResult<(Vec<TestCase>, usize)> {
        let mut load = FixtureLoad::default();

        if self.config.include_builtin {
            load.cases.extend(cases::builtin());
        }
        if let Some(path) = &self.config.fixture {
            let file_load = fixture::load_file(path)?;
            load.cases.extend(file_load.cases);
            load.skipped += file_load.skipped;
        }
        if let Some(dir) = &self.config.fixtures_dir {
            let dir_load = fixture::load_dir(dir)?;
            load.cases.extend(dir_load.cases);
            load.skipped += dir_load.skipped;
        }

        let mut cases = load.cases;
        if let Some(name) = &self.config.name_filter {
            cases.retain(|c| &c.values.test_case_id == name);
            if cases.is_empty() {
                return Err(E2eError::Fixture(format!("no case named '{name}'")));
            }
        }

        Ok((cases, load.skipped))
    }

    /// Run every collected case and tally the suite result.
    pub async fn run_all(&self) -> E2eResult<SuiteResult> {
        let start = Instant::now();

        if self.config.preflight {
            self.preflight().await?;
        }

        let (cases, skipped_rows) = self.collect_cases()?;
        let reporter = FailureReporter::new(&self.config.output_dir)?;

        info!("Running {} test case(s)...", cases.len());

        let mut results = Vec::with_capacity(cases.len());
        let mut passed = 0;
        let mut failed = 0;

        for case in &cases {
            let result = self.run_case(case, &reporter).await;
            if result.passed {
                passed += 1;
                info!("✓ {} ({} ms)", result.case_id, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.case_id,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        info!("");
        info!(
            "Test Results: {} passed, {} failed, {} fixture row(s) skipped ({} ms)",
            passed, failed, skipped_rows, duration_ms
        );

        Ok(SuiteResult {
            total: cases.len(),
            passed,
            failed,
            skipped_rows,
            duration_ms,
            results,
        })
    }

    /// Run one case in its own session. All errors become a failed
    /// [`CaseResult`]; nothing propagates out of the case.
    async fn run_case(&self, case: &TestCase, reporter: &FailureReporter) -> CaseResult {
        let case_id = case.values.test_case_id.clone();
        let start = Instant::now();
        let screenshot = reporter.artifact_path(&case_id);

        let verdict = self.drive_case(case, &screenshot).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match verdict {
            Ok(()) => {
                reporter.discard(&screenshot);
                CaseResult {
                    case_id,
                    expected: case.expected,
                    passed: true,
                    duration_ms,
                    error: None,
                    screenshot: None,
                }
            }
            Err(e) => {
                reporter.keep(&case_id, &screenshot);
                CaseResult {
                    case_id,
                    expected: case.expected,
                    passed: false,
                    duration_ms,
                    error: Some(e.to_string()),
                    screenshot: screenshot.exists().then_some(screenshot),
                }
            }
        }
    }

    async fn drive_case(&self, case: &TestCase, screenshot: &std::path::Path) -> E2eResult<()> {
        let session = BrowserSession::new(self.config.playwright.clone())?;
        let steps = form::plan(&case.values, &self.config.page)?;
        let observation = session
            .run_case(
                &case.values.test_case_id,
                &steps,
                &self.config.page,
                case.expected,
                screenshot,
            )
            .await?;
        verify::verify_outcome(
            case.expected,
            &observation,
            &self.config.page,
            &case.values.test_case_id,
        )
    }
}
