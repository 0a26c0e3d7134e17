//! Log scanning and the end-of-run summary.
//!
//! Results come only from lines the test programs print themselves. The
//! harness never interprets exit codes here; it just counts markers.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

// ============================================================================
// RESULT MARKERS
// ============================================================================

/// A self-reported result line prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Pass,
    Fail,
    /// Expected failure.
    XFail,
    /// Unexpected pass.
    XPass,
}

impl Marker {
    pub fn prefix(self) -> &'static str {
        match self {
            Marker::Pass => "PASS:",
            Marker::Fail => "FAIL:",
            Marker::XFail => "XFAIL:",
            Marker::XPass => "XPASS:",
        }
    }

    /// Classifies a log line by its literal prefix.
    ///
    /// The six-character prefixes are tried first so that `XFAIL:` and
    /// `XPASS:` lines never land in the `FAIL:`/`PASS:` buckets.
    pub fn of_line(line: &str) -> Option<Self> {
        [Marker::XPass, Marker::XFail, Marker::Pass, Marker::Fail]
            .into_iter()
            .find(|marker| line.starts_with(marker.prefix()))
    }
}

// ============================================================================
// TALLY
// ============================================================================

/// Result lines found in a log, bucketed by marker, in log order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub passed: Vec<String>,
    pub failed: Vec<String>,
    pub xfailed: Vec<String>,
    pub xpassed: Vec<String>,
}

impl Tally {
    pub fn scan(log: &str) -> Self {
        let mut tally = Tally::default();
        for line in log.lines() {
            let Some(marker) = Marker::of_line(line) else {
                continue;
            };
            tally.bucket_mut(marker).push(line.to_string());
        }
        tally
    }

    pub fn count(&self, marker: Marker) -> usize {
        self.bucket(marker).len()
    }

    /// Total number of self-reported result lines.
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len() + self.xfailed.len() + self.xpassed.len()
    }

    pub fn bucket(&self, marker: Marker) -> &[String] {
        match marker {
            Marker::Pass => &self.passed,
            Marker::Fail => &self.failed,
            Marker::XFail => &self.xfailed,
            Marker::XPass => &self.xpassed,
        }
    }

    fn bucket_mut(&mut self, marker: Marker) -> &mut Vec<String> {
        match marker {
            Marker::Pass => &mut self.passed,
            Marker::Fail => &mut self.failed,
            Marker::XFail => &mut self.xfailed,
            Marker::XPass => &mut self.xpassed,
        }
    }
}

// ============================================================================
// SUMMARY REPORT
// ============================================================================

/// Plain-text rendering of a [`Tally`], as printed at the end of a run.
pub struct SummaryReport<'a> {
    log_file: &'a Path,
    tally: &'a Tally,
}

impl<'a> SummaryReport<'a> {
    pub fn new(log_file: &'a Path, tally: &'a Tally) -> Self {
        Self { log_file, tally }
    }
}

impl Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let tally = self.tally;
        writeln!(f, "\nSummary results from {}", self.log_file.display())?;
        writeln!(f, "number of passed tests: {}", tally.count(Marker::Pass))?;
        writeln!(f, "number of failed tests: {}", tally.count(Marker::Fail))?;
        writeln!(f, "number of expected failures: {}", tally.count(Marker::XFail))?;
        writeln!(f, "number of unexpected passes: {}", tally.count(Marker::XPass))?;

        for (heading, marker) in [
            ("Failed tests:", Marker::Fail),
            ("Expected failures:", Marker::XFail),
            ("Unexpected passes:", Marker::XPass),
        ] {
            let lines = tally.bucket(marker);
            if lines.is_empty() {
                continue;
            }
            writeln!(f, "\n{heading}")?;
            for line in lines {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
START: basic_tests.py
PASS:  basic_tests.py 1: basic checkout
XFAIL: basic_tests.py 2: unsupported url scheme
FAIL:  basic_tests.py 3: basic commit
XPASS: basic_tests.py 4: fixed by accident
END: basic_tests.py

START: string-test
PASS: string-test 1: make string from cstring
 FAIL: indented lines are not results
END: string-test

";

    #[test]
    fn long_prefixes_win_over_short_ones() {
        assert_eq!(Marker::of_line("XFAIL: x"), Some(Marker::XFail));
        assert_eq!(Marker::of_line("XPASS: x"), Some(Marker::XPass));
        assert_eq!(Marker::of_line("FAIL: x"), Some(Marker::Fail));
        assert_eq!(Marker::of_line("PASS: x"), Some(Marker::Pass));
        assert_eq!(Marker::of_line("PASSED x"), None);
        assert_eq!(Marker::of_line("START: x"), None);
    }

    #[test]
    fn scan_buckets_lines_in_order() {
        let tally = Tally::scan(LOG);
        assert_eq!(
            tally.passed,
            vec![
                "PASS:  basic_tests.py 1: basic checkout",
                "PASS: string-test 1: make string from cstring",
            ]
        );
        assert_eq!(tally.failed, vec!["FAIL:  basic_tests.py 3: basic commit"]);
        assert_eq!(tally.count(Marker::XFail), 1);
        assert_eq!(tally.count(Marker::XPass), 1);
    }

    #[test]
    fn total_counts_only_self_reported_lines() {
        let tally = Tally::scan(LOG);
        assert_eq!(tally.total(), 5);
        assert_eq!(Tally::scan("START: a\nEND: a\n\n").total(), 0);
    }

    #[test]
    fn report_lists_counts_and_offending_lines() {
        let tally = Tally::scan(LOG);
        let report = SummaryReport::new(Path::new("/build/tests.log"), &tally).to_string();
        assert_eq!(
            report,
            "\nSummary results from /build/tests.log\n\
             number of passed tests: 2\n\
             number of failed tests: 1\n\
             number of expected failures: 1\n\
             number of unexpected passes: 1\n\
             \nFailed tests:\n\
             FAIL:  basic_tests.py 3: basic commit\n\
             \nExpected failures:\n\
             XFAIL: basic_tests.py 2: unsupported url scheme\n\
             \nUnexpected passes:\n\
             XPASS: basic_tests.py 4: fixed by accident\n"
        );
    }

    #[test]
    fn report_omits_empty_sections() {
        let tally = Tally::scan("PASS: only\n");
        let report = SummaryReport::new(Path::new("tests.log"), &tally).to_string();
        assert!(report.ends_with("number of unexpected passes: 0\n"));
        assert!(!report.contains("Failed tests:"));
    }
}
