//! Per-execution console buffer
//!
//! User functions run inside a sandbox that hands them a `FunctionConsole`
//! in place of stdout. Every `log`/`error` call appends one timestamped line;
//! the harness reads the lines back once the function returns and relays
//! them in the execution result.

use chrono::{Local, NaiveDateTime};
use std::fmt::{self, Write};

/// `strftime` pattern for line timestamps (`YYYY/MM/DD HH:mm:ss`)
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Append-only buffer of formatted console lines for one execution
///
/// `log` and `error` produce identical lines; severity is only a call-site
/// distinction.
#[derive(Debug, Clone)]
pub struct FunctionConsole {
    lines: Vec<String>,
    clock: fn() -> NaiveDateTime,
}

impl FunctionConsole {
    /// Create an empty console stamped with local wall-clock time
    pub fn new() -> Self {
        Self::with_clock(local_now)
    }

    /// Create an empty console that reads timestamps from `clock`
    pub fn with_clock(clock: fn() -> NaiveDateTime) -> Self {
        Self {
            lines: Vec::new(),
            clock,
        }
    }

    /// Append `"[<timestamp>] - <values>"`
    ///
    /// # Example
    ///
    /// ```
    /// use laf_core::console_log;
    /// use laf_core::FunctionConsole;
    ///
    /// let mut console = FunctionConsole::new();
    /// console_log!(console, "hello", 42);
    /// assert!(console.logs()[0].ends_with("] - hello 42"));
    /// ```
    pub fn log(&mut self, values: &[&dyn fmt::Display]) {
        self.append(values);
    }

    /// Append a line exactly as `log` does
    pub fn error(&mut self, values: &[&dyn fmt::Display]) {
        self.append(values);
    }

    /// Lines appended so far, in call order
    pub fn logs(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consume the console and hand its lines to the caller
    pub fn into_logs(self) -> Vec<String> {
        self.lines
    }

    fn append(&mut self, values: &[&dyn fmt::Display]) {
        let line = format_line((self.clock)(), values);
        self.lines.push(line);
    }
}

impl Default for FunctionConsole {
    fn default() -> Self {
        Self::new()
    }
}

/// Render one console line: timestamp, separator, then values joined by a space
pub fn format_line(at: NaiveDateTime, values: &[&dyn fmt::Display]) -> String {
    let mut line = format!("[{}] -", at.format(TIMESTAMP_FORMAT));
    for value in values {
        // Writing into a String cannot fail
        let _ = write!(line, " {}", value);
    }
    line
}

/// Append a line to a `FunctionConsole` from any `Display` values
#[macro_export]
macro_rules! console_log {
    ($console:expr $(, $value:expr)* $(,)?) => {
        $console.log(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

/// Append a line to a `FunctionConsole` through its `error` entry point
#[macro_export]
macro_rules! console_error {
    ($console:expr $(, $value:expr)* $(,)?) => {
        $console.error(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn new_year() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn test_new_console_is_empty() {
        let console = FunctionConsole::new();
        assert!(console.is_empty());
        assert!(console.logs().is_empty());
    }

    #[test]
    fn test_log_formats_known_timestamp() {
        let mut console = FunctionConsole::with_clock(new_year);
        console_log!(console, "hello", 42);
        assert_eq!(console.logs(), ["[2023/01/01 00:00:00] - hello 42"]);
    }

    #[test]
    fn test_error_matches_log() {
        let mut console = FunctionConsole::with_clock(new_year);
        console_log!(console, "boom", true);
        console_error!(console, "boom", true);
        assert_eq!(console.logs()[0], console.logs()[1]);
    }

    #[test]
    fn test_log_without_values() {
        let mut console = FunctionConsole::with_clock(new_year);
        console_log!(console);
        assert_eq!(console.logs(), ["[2023/01/01 00:00:00] -"]);
    }

    #[test]
    fn test_primitive_and_json_formatting() {
        let mut console = FunctionConsole::with_clock(new_year);
        let doc = serde_json::json!({"name": "laf"});
        console_log!(console, "value:", 1.5, -3, 'x', doc);
        assert_eq!(
            console.logs()[0],
            r#"[2023/01/01 00:00:00] - value: 1.5 -3 x {"name":"laf"}"#
        );
    }

    #[test]
    fn test_timestamp_shape_with_wall_clock() {
        let mut console = FunctionConsole::new();
        console_log!(console, "now");
        let line = &console.logs()[0];
        // "[YYYY/MM/DD HH:mm:ss] - now"
        assert_eq!(line.len(), "[2023/01/01 00:00:00] - now".len());
        assert_eq!(&line[5..6], "/");
        assert_eq!(&line[8..9], "/");
        assert_eq!(&line[20..24], "] - ");
        assert!(NaiveDateTime::parse_from_str(&line[1..20], TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_into_logs_hands_over_lines() {
        let mut console = FunctionConsole::with_clock(new_year);
        console_log!(console, "a");
        console_error!(console, "b");
        let lines = console.into_logs();
        assert_eq!(
            lines,
            vec![
                "[2023/01/01 00:00:00] - a".to_string(),
                "[2023/01/01 00:00:00] - b".to_string(),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_lines_keep_call_order(calls in proptest::collection::vec((any::<bool>(), any::<u32>()), 0..64)) {
            let mut console = FunctionConsole::with_clock(new_year);
            for (is_error, n) in &calls {
                if *is_error {
                    console_error!(console, n);
                } else {
                    console_log!(console, n);
                }
            }

            prop_assert_eq!(console.len(), calls.len());
            for (line, (_, n)) in console.logs().iter().zip(&calls) {
                prop_assert_eq!(line, &format!("[2023/01/01 00:00:00] - {}", n));
            }
        }
    }
}
