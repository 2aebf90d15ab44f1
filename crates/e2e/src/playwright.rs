//! Playwright session — compiles a form plan into a generated script
//!
//! One browser session per test case: the whole action sequence is compiled
//! to a single self-contained Playwright program, executed with `node`, and
//! the post-submission page state comes back as one JSON observation line.
//! Driver-phase failures travel on the same protocol as typed markers.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tokio::process::Command as TokioCommand;
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::form::FormStep;
use crate::model::{FormField, Outcome};
use crate::page::PageModel;

const OBSERVATION_PREFIX: &str = "E2E_OBSERVATION ";
const FAILURE_PREFIX: &str = "E2E_FAILURE ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Timing and browser configuration for generated scripts.
///
/// Every wait in the generated code is bounded by one of these values.
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Page-load bound for the initial navigation.
    pub navigation_timeout_ms: u64,

    /// Bound for element interaction waits (fill, select, click).
    pub action_timeout_ms: u64,

    /// Brief bound for the state field to appear when no value was supplied.
    pub state_probe_timeout_ms: u64,

    /// Bound for the consent banner; absence is tolerated.
    pub cookie_timeout_ms: u64,

    /// Post-submission bound for the expected outcome element to appear.
    pub settle_timeout_ms: u64,

    /// Delay before the one-shot submit retry.
    pub submit_retry_delay_ms: u64,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            navigation_timeout_ms: 30_000,
            action_timeout_ms: 15_000,
            state_probe_timeout_ms: 5_000,
            cookie_timeout_ms: 5_000,
            settle_timeout_ms: 15_000,
            submit_retry_delay_ms: 500,
        }
    }
}

/// What one element probe saw after submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementProbe {
    pub present: bool,
    pub visible: bool,
    pub text: Option<String>,
}

/// Page state captured by the script once the form was submitted: the
/// success confirmation plus every configured error element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormObservation {
    pub success: ElementProbe,
    pub errors: BTreeMap<FormField, ElementProbe>,
}

/// One live browser session, backed by a generated script per case.
pub struct BrowserSession {
    config: PlaywrightConfig,
    script_dir: tempfile::TempDir,
}

impl BrowserSession {
    /// Stage a session. The Playwright install check lives in the runner
    /// preflight so plans and scripts can be built (and tested) offline.
    pub fn new(config: PlaywrightConfig) -> E2eResult<Self> {
        let script_dir = tempfile::tempdir()?;
        Ok(Self { config, script_dir })
    }

    /// Check that Playwright is available via npx.
    pub fn check_installed() -> E2eResult<()> {
        let status = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Compile a form plan into a self-contained Playwright program.
    ///
    /// The script fills and submits the form, waits (bounded) for the
    /// element the expected outcome should reveal, probes every outcome
    /// element, screenshots the final page state, and emits one
    /// `E2E_OBSERVATION` line. Action failures emit `E2E_FAILURE` instead.
    pub fn build_script(
        &self,
        steps: &[FormStep],
        page: &PageModel,
        expected: Outcome,
        screenshot: &Path,
    ) -> E2eResult<String> {
        let settle_selector = match expected.field() {
            None => page.success.selector.clone(),
            Some(field) => page
                .field(field)
                .ok_or(E2eError::UnmappedField(field))?
                .error
                .clone(),
        };

        let mut script = String::new();
        script.push_str(&format!(
            r#"const {{ chromium, firefox, webkit }} = require('playwright');

async function probe(page, selector) {{
  const loc = page.locator(selector).first();
  if (await loc.count() === 0) return {{ present: false, visible: false, text: null }};
  const visible = await loc.isVisible();
  const text = visible ? (await loc.innerText()).trim() : null;
  return {{ present: true, visible, text }};
}}

async function selectByLabel(page, selector, label, field, timeout) {{
  const loc = page.locator(selector);
  await loc.waitFor({{ state: 'visible', timeout }});
  const labels = await loc.evaluate(el => Array.from(el.options).map(o => o.textContent.trim()));
  if (!labels.includes(label)) throw new Error('no-such-option:' + field + ':' + label);
  await loc.selectOption({{ label }});
}}

async function resolveState(page, selector, value, required, country, probeTimeout, actionTimeout) {{
  if (value !== null) {{
    try {{
      await page.locator(selector).waitFor({{ state: 'visible', timeout: actionTimeout }});
    }} catch (e) {{
      throw new Error('state-timeout:' + value);
    }}
    await selectByLabel(page, selector, value, 'state', actionTimeout);
  }} else {{
    let appeared = true;
    try {{
      await page.locator(selector).waitFor({{ state: 'visible', timeout: probeTimeout }});
    }} catch (e) {{
      appeared = false;
    }}
    if (!appeared && required) throw new Error('state-required:' + (country || ''));
  }}
}}

async function submitWithRetry(page, selector, timeout, retryDelay) {{
  try {{
    await page.locator(selector).click({{ timeout }});
  }} catch (e) {{
    await page.waitForTimeout(retryDelay);
    await page.locator(selector).click({{ timeout }});
  }}
}}

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();

  try {{
"#,
            browser = self.config.browser.as_str(),
            headless = self.config.headless,
            width = self.config.viewport_width,
            height = self.config.viewport_height,
        ));

        for (i, step) in steps.iter().enumerate() {
            script.push_str(&format!("    // Step {}: {}\n", i + 1, step_name(step)));
            script.push_str(&self.step_to_js(step));
            script.push('\n');
        }

        // Settle: give the page a bounded chance to reveal the element the
        // expectation points at; the verifier decides what a miss means.
        script.push_str(&format!(
            r#"
    try {{
      await page.locator({settle}).first().waitFor({{ state: 'visible', timeout: {settle_timeout} }});
    }} catch (e) {{}}

    const observation = {{
      success: await probe(page, {success}),
      errors: {{
"#,
            settle = js_str(&settle_selector),
            settle_timeout = self.config.settle_timeout_ms,
            success = js_str(&page.success.selector),
        ));

        for descriptor in &page.fields {
            script.push_str(&format!(
                "        {key}: await probe(page, {selector}),\n",
                key = js_str(descriptor.field.as_str()),
                selector = js_str(&descriptor.error),
            ));
        }

        script.push_str(&format!(
            r#"      }}
    }};
    console.log('{observation_prefix}' + JSON.stringify(observation));
  }} catch (error) {{
    console.log('{failure_prefix}' + JSON.stringify({{ error: error.message }}));
    process.exitCode = 1;
  }} finally {{
    try {{
      await page.screenshot({{ path: {screenshot}, fullPage: true }});
    }} catch (e) {{}}
    await browser.close();
  }}
}})();
"#,
            observation_prefix = OBSERVATION_PREFIX,
            failure_prefix = FAILURE_PREFIX,
            screenshot = js_str(&screenshot.to_string_lossy()),
        ));

        Ok(script)
    }

    fn step_to_js(&self, step: &FormStep) -> String {
        let action = self.config.action_timeout_ms;
        match step {
            FormStep::Navigate { url } => format!(
                "    await page.goto({}, {{ waitUntil: 'load', timeout: {} }});",
                js_str(url),
                self.config.navigation_timeout_ms,
            ),
            FormStep::DismissCookieBanner { selector } => format!(
                r#"    try {{
      const banner = page.locator({sel});
      await banner.click({{ timeout: {timeout} }});
      await banner.waitFor({{ state: 'hidden', timeout: {timeout} }});
    }} catch (e) {{}}"#,
                sel = js_str(selector),
                timeout = self.config.cookie_timeout_ms,
            ),
            FormStep::Fill {
                selector, value, ..
            } => format!(
                r#"    {{
      const loc = page.locator({sel});
      await loc.waitFor({{ state: 'visible', timeout: {action} }});
      await loc.fill({value});
    }}"#,
                sel = js_str(selector),
                value = js_str(value),
            ),
            FormStep::SelectByLabel {
                field,
                selector,
                label,
            } => format!(
                "    await selectByLabel(page, {}, {}, {}, {});",
                js_str(selector),
                js_str(label),
                js_str(field.as_str()),
                action,
            ),
            FormStep::ResolveState {
                selector,
                value,
                required,
                country,
            } => format!(
                "    await resolveState(page, {}, {}, {}, {}, {}, {});",
                js_str(selector),
                js_opt_str(value.as_deref()),
                required,
                js_opt_str(country.as_deref()),
                self.config.state_probe_timeout_ms,
                action,
            ),
            FormStep::Submit { selector } => format!(
                "    await submitWithRetry(page, {}, {}, {});",
                js_str(selector),
                action,
                self.config.submit_retry_delay_ms,
            ),
        }
    }

    /// Run one case's plan to completion and return the page observation.
    pub async fn run_case(
        &self,
        case_id: &str,
        steps: &[FormStep],
        page: &PageModel,
        expected: Outcome,
        screenshot: &Path,
    ) -> E2eResult<FormObservation> {
        let script = self.build_script(steps, page, expected, screenshot)?;
        let script_path = self
            .script_dir
            .path()
            .join(format!("{}.js", sanitize(case_id)));
        std::fs::write(&script_path, &script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let output = TokioCommand::new("node")
            .arg(&script_path)
            .current_dir(self.script_dir.path())
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        parse_output(&stdout, &stderr, output.status.success())
    }
}

/// Decode the script's stdout protocol into an observation or a typed error.
fn parse_output(stdout: &str, stderr: &str, exit_ok: bool) -> E2eResult<FormObservation> {
    for line in stdout.lines() {
        if let Some(json) = line.strip_prefix(OBSERVATION_PREFIX) {
            return Ok(serde_json::from_str(json)?);
        }
        if let Some(json) = line.strip_prefix(FAILURE_PREFIX) {
            #[derive(Deserialize)]
            struct Failure {
                error: String,
            }
            let failure: Failure = serde_json::from_str(json)?;
            return Err(map_script_error(&failure.error));
        }
    }

    if exit_ok {
        Err(E2eError::Playwright(
            "script produced no observation".to_string(),
        ))
    } else {
        Err(E2eError::Playwright(format!(
            "script failed:\nstdout: {stdout}\nstderr: {stderr}"
        )))
    }
}

/// Map the script's typed error markers back to Rust errors.
fn map_script_error(message: &str) -> E2eError {
    if let Some(rest) = message.strip_prefix("no-such-option:") {
        let (field, label) = rest.split_once(':').unwrap_or((rest, ""));
        return E2eError::NoSuchOption {
            field: field.to_string(),
            label: label.to_string(),
        };
    }
    if let Some(country) = message.strip_prefix("state-required:") {
        return E2eError::StateFieldRequired {
            country: country.to_string(),
        };
    }
    if let Some(state) = message.strip_prefix("state-timeout:") {
        return E2eError::Timeout(format!("state field to become interactable (state '{state}')"));
    }
    if message.contains("Timeout") {
        return E2eError::Timeout(message.to_string());
    }
    E2eError::Playwright(message.to_string())
}

/// Quote a string as a JavaScript literal. Fixture values flow into the
/// generated source, so everything is JSON-escaped.
fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""))
}

fn js_opt_str(s: Option<&str>) -> String {
    match s {
        Some(s) => js_str(s),
        None => "null".to_string(),
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}

fn step_name(step: &FormStep) -> String {
    match step {
        FormStep::Navigate { url } => format!("navigate:{url}"),
        FormStep::DismissCookieBanner { .. } => "dismiss-cookie-banner".to_string(),
        FormStep::Fill { field, .. } => format!("fill:{field}"),
        FormStep::SelectByLabel { field, .. } => format!("select:{field}"),
        FormStep::ResolveState { value, .. } => match value {
            Some(v) => format!("resolve-state:{v}"),
            None => "resolve-state".to_string(),
        },
        FormStep::Submit { .. } => "submit".to_string(),
    }
}
