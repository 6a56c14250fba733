//! Row loading options.

/// Column whose value marks a row as a runnable test case.
pub const DEFAULT_TEST_CASE_COLUMN: &str = "isTestCase";

/// Options for projecting worksheet rows into [`GenericRow`](crate::GenericRow)s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// 1-based row number of the header row naming the columns
    pub header_row: usize,

    /// Column names to keep; `None` keeps every header name
    pub columns: Option<Vec<String>>,

    /// Keep only rows whose test-case column reads `true`
    pub test_cases_only: bool,

    /// Name of the test-case column
    pub test_case_column: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            header_row: 1,
            columns: None,
            test_cases_only: false,
            test_case_column: DEFAULT_TEST_CASE_COLUMN.to_string(),
        }
    }
}

impl LoadOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header row (1-based).
    pub fn with_header_row(mut self, row: usize) -> Self {
        self.header_row = row;
        self
    }

    /// Restrict the projection to these column names.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Keep only test-case rows.
    pub fn with_test_cases_only(mut self, enabled: bool) -> Self {
        self.test_cases_only = enabled;
        self
    }

    /// Set the column that marks test-case rows.
    pub fn with_test_case_column(mut self, column: impl Into<String>) -> Self {
        self.test_case_column = column.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LoadOptions::default();
        assert_eq!(options.header_row, 1);
        assert_eq!(options.columns, None);
        assert!(!options.test_cases_only);
        assert_eq!(options.test_case_column, "isTestCase");
    }

    #[test]
    fn test_builder() {
        let options = LoadOptions::new()
            .with_header_row(2)
            .with_columns(["testCase", "url"])
            .with_test_cases_only(true)
            .with_test_case_column("run");

        assert_eq!(options.header_row, 2);
        assert_eq!(
            options.columns,
            Some(vec!["testCase".to_string(), "url".to_string()])
        );
        assert!(options.test_cases_only);
        assert_eq!(options.test_case_column, "run");
    }
}
