//! CSV fixture loading for data-driven contact-form cases
//!
//! Header-led, comma-delimited; headers matched case-insensitively, cells
//! trimmed, empty cells meaning "leave the field untouched". A malformed
//! row is skipped with a diagnostic and never aborts the remaining rows.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{E2eError, E2eResult};
use crate::model::{normalize, FieldValues, Outcome, TestCase};

/// Result of loading a fixture: the usable cases plus how many rows were
/// dropped on the floor.
#[derive(Debug, Default)]
pub struct FixtureLoad {
    pub cases: Vec<TestCase>,
    pub skipped: usize,
}

impl FixtureLoad {
    fn merge(&mut self, other: FixtureLoad) {
        self.cases.extend(other.cases);
        self.skipped += other.skipped;
    }
}

/// Case-insensitive column lookup over the header record.
struct Columns {
    header: StringRecord,
}

impl Columns {
    fn new(header: StringRecord) -> Self {
        Self { header }
    }

    fn index(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    fn require(&self, name: &str, source: &str) -> E2eResult<usize> {
        self.index(name).ok_or_else(|| {
            E2eError::Fixture(format!("{source}: missing column '{name}'"))
        })
    }
}

/// Load cases from a single CSV fixture file.
pub fn load_file(path: &Path) -> E2eResult<FixtureLoad> {
    let data = std::fs::read_to_string(path)?;
    load_str(&data, &path.display().to_string())
}

/// Load every `*.csv` fixture under a directory.
pub fn load_dir(dir: &Path) -> E2eResult<FixtureLoad> {
    let mut load = FixtureLoad::default();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .extension()
                .map(|ext| ext == "csv")
                .unwrap_or(false)
        })
    {
        load.merge(load_file(entry.path())?);
    }
    Ok(load)
}

/// Parse fixture rows from CSV text. `source` names the input in
/// diagnostics.
pub fn load_str(data: &str, source: &str) -> E2eResult<FixtureLoad> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(data.as_bytes());

    let columns = Columns::new(reader.headers()?.clone());
    let id_col = columns.require("testCaseId", source)?;
    let expected_col = columns.require("expectedResult", source)?;

    // Optional value columns: a fixture variant without e.g. the state
    // column is still loadable, the field just stays untouched.
    let value_col = |name: &str| columns.index(name);
    let first_name = value_col("firstName");
    let last_name = value_col("lastName");
    let job_title = value_col("jobTitle");
    let email = value_col("email");
    let company = value_col("company");
    let employees = value_col("employeesNumber");
    let phone = value_col("phone");
    let product_interest = value_col("productInterest");
    let country = value_col("country");
    let state = value_col("state");

    let mut load = FixtureLoad::default();

    for (row_number, record) in reader.records().enumerate() {
        // Header is line 1; data rows start at 2.
        let line = row_number + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("{source}:{line}: skipping unreadable row: {e}");
                load.skipped += 1;
                continue;
            }
        };

        let cell = |col: Option<usize>| -> Option<String> {
            normalize(col.and_then(|i| record.get(i)).map(str::to_string))
        };

        let Some(test_case_id) = cell(Some(id_col)) else {
            warn!("{source}:{line}: skipping row without a testCaseId");
            load.skipped += 1;
            continue;
        };

        let Some(tag) = cell(Some(expected_col)) else {
            warn!("{source}:{line}: skipping '{test_case_id}': empty expectedResult");
            load.skipped += 1;
            continue;
        };
        let Some(expected) = Outcome::from_tag(&tag) else {
            let err = E2eError::UnknownOutcome {
                case_id: test_case_id.clone(),
                value: tag,
            };
            warn!("{source}:{line}: skipping row: {err}");
            load.skipped += 1;
            continue;
        };

        let values = FieldValues {
            test_case_id,
            first_name: cell(first_name),
            last_name: cell(last_name),
            job_title: cell(job_title),
            email: cell(email),
            company: cell(company),
            employees: cell(employees),
            phone: cell(phone),
            product_interest: cell(product_interest),
            country: cell(country),
            state: cell(state),
        };

        load.cases.push(TestCase { values, expected });
    }

    debug!(
        "{source}: loaded {} case(s), skipped {} row(s)",
        load.cases.len(),
        load.skipped
    );
    Ok(load)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "testCaseId,firstName,lastName,jobTitle,email,company,employeesNumber,phone,productInterest,country,state,expectedResult";

    #[test]
    fn test_load_rows_with_absent_cells() {
        let data = format!(
            "{HEADER}\n\
             TC-001,James,Smith,Accountant,james@example.com,BlackRock,201 - 10000 employees,07402182492,Artificial Intelligence,United States,Alabama,SUCCESS\n\
             TC-002,,Smith,Accountant,james@example.com,BlackRock,201 - 10000 employees,07402182492,Artificial Intelligence,United Kingdom,,FIRST_NAME_ERROR\n"
        );
        let load = load_str(&data, "inline").unwrap();
        assert_eq!(load.cases.len(), 2);
        assert_eq!(load.skipped, 0);

        let first = &load.cases[0];
        assert_eq!(first.values.test_case_id, "TC-001");
        assert_eq!(first.values.state.as_deref(), Some("Alabama"));
        assert_eq!(first.expected, Outcome::Success);

        let second = &load.cases[1];
        assert_eq!(second.values.first_name, None);
        assert_eq!(second.values.state, None);
        assert_eq!(second.expected, Outcome::FirstNameError);
    }

    #[test]
    fn test_headers_are_case_insensitive_and_cells_trimmed() {
        let data = "TESTCASEID,FIRSTNAME,EXPECTEDRESULT\n tc-1 ,  James  , SUCCESS \n";
        let load = load_str(data, "inline").unwrap();
        assert_eq!(load.cases.len(), 1);
        assert_eq!(load.cases[0].values.test_case_id, "tc-1");
        assert_eq!(load.cases[0].values.first_name.as_deref(), Some("James"));
        assert_eq!(load.cases[0].expected, Outcome::Success);
    }

    #[test]
    fn test_unknown_tag_skips_row_but_run_continues() {
        let data = "testCaseId,firstName,expectedResult\n\
                    TC-1,James,SUCCESS\n\
                    TC-2,James,NOT_A_TAG\n\
                    TC-3,,FIRST_NAME_ERROR\n";
        let load = load_str(data, "inline").unwrap();
        assert_eq!(load.cases.len(), 2);
        assert_eq!(load.skipped, 1);
        assert_eq!(load.cases[1].values.test_case_id, "TC-3");
    }

    #[test]
    fn test_ragged_row_is_skipped() {
        let data = "testCaseId,firstName,expectedResult\n\
                    TC-1,James,SUCCESS\n\
                    TC-2,only-two-cells\n\
                    TC-3,Ann,SUCCESS\n";
        let load = load_str(data, "inline").unwrap();
        assert_eq!(load.cases.len(), 2);
        assert_eq!(load.skipped, 1);
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let data = "firstName,lastName\nJames,Smith\n";
        assert!(matches!(
            load_str(data, "inline").unwrap_err(),
            E2eError::Fixture(_)
        ));
    }

    #[test]
    fn test_rows_without_id_or_expectation_are_skipped() {
        let data = "testCaseId,firstName,expectedResult\n\
                    ,James,SUCCESS\n\
                    TC-2,James,\n";
        let load = load_str(data, "inline").unwrap();
        assert!(load.cases.is_empty());
        assert_eq!(load.skipped, 2);
    }

    #[test]
    fn test_load_dir_sweeps_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.csv"),
            "testCaseId,firstName,expectedResult\nTC-A,James,SUCCESS\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.csv"),
            "testCaseId,firstName,expectedResult\nTC-B,,FIRST_NAME_ERROR\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let load = load_dir(dir.path()).unwrap();
        assert_eq!(load.cases.len(), 2);
        let ids: Vec<&str> = load
            .cases
            .iter()
            .map(|c| c.values.test_case_id.as_str())
            .collect();
        assert_eq!(ids, vec!["TC-A", "TC-B"]);
    }
}
