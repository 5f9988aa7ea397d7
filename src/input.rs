// ⌨️ Interactive Entry
// Retry driver over an abstract input source, plus the two ways of entering
// a sales record by hand.
//
// The driver asks, validates, and on failure shows the validation message and
// asks again, with no attempt limit. Only the end of input stops it early.

use crate::calendar::{max_day, MAX_YEAR, MIN_YEAR};
use crate::error::{LedgerError, Result};
use crate::record::SalesRecord;
use crate::validation::{
    parse_amount, parse_date, parse_region, require_positive, Amount, Region, SalesDate,
    ValidationError,
};
use std::io::{self, BufRead, Write};
use tracing::debug;

const PROMPT_WIDTH: usize = 20;

// ============================================================================
// INPUT SOURCE
// ============================================================================

/// Where raw answers come from. The core never touches the terminal itself.
pub trait InputSource {
    /// Show `prompt` and return the raw answer, or None at end of input
    fn ask(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Show a corrective message after a rejected answer
    fn notify(&mut self, message: &str);
}

/// Terminal-backed source: prompts on stdout, answers from stdin
pub struct StdinInput<R> {
    reader: R,
}

impl StdinInput<io::StdinLock<'static>> {
    pub fn new() -> Self {
        StdinInput {
            reader: io::stdin().lock(),
        }
    }
}

impl<R: BufRead> StdinInput<R> {
    pub fn from_reader(reader: R) -> Self {
        StdinInput { reader }
    }
}

impl<R: BufRead> InputSource for StdinInput<R> {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{:PROMPT_WIDTH$}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn notify(&mut self, message: &str) {
        println!("{}", message);
    }
}

// ============================================================================
// RETRY DRIVER
// ============================================================================

pub struct Prompter<S> {
    source: S,
}

impl<S: InputSource> Prompter<S> {
    pub fn new(source: S) -> Self {
        Prompter { source }
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Direct access for unvalidated questions such as menu choices
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Ask until `check` accepts the trimmed answer
    fn ask_until<T>(
        &mut self,
        prompt: &str,
        mut check: impl FnMut(&str) -> std::result::Result<T, ValidationError>,
    ) -> Result<T> {
        loop {
            let raw = self.source.ask(prompt)?.ok_or(LedgerError::EndOfInput)?;
            match check(raw.trim()) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!(prompt, answer = %raw, error = %e, "rejected input");
                    self.source.notify(&e.to_string());
                }
            }
        }
    }

    /// A number passing `check`
    pub fn supply_number(
        &mut self,
        prompt: &str,
        check: impl Fn(f64) -> std::result::Result<f64, ValidationError>,
    ) -> Result<f64> {
        self.ask_until(prompt, |raw| parse_amount(raw).and_then(&check))
    }

    /// A whole number in `low..=high`; `field` names it in the prompt and messages
    pub fn supply_int(&mut self, field: &str, low: i64, high: i64) -> Result<i64> {
        let prompt = format!("{} ({}-{}):", field, low, high);
        self.ask_until(&prompt, |raw| {
            let value: i64 = raw.parse().map_err(|_| ValidationError::NotAnInteger {
                field: field.to_string(),
                raw: raw.to_string(),
            })?;
            if (low..=high).contains(&value) {
                Ok(value)
            } else {
                Err(ValidationError::OutOfRange {
                    field: field.to_string(),
                    low,
                    high,
                })
            }
        })
    }

    /// Free text passing `check`
    pub fn supply_text<T>(
        &mut self,
        prompt: &str,
        check: impl FnMut(&str) -> std::result::Result<T, ValidationError>,
    ) -> Result<T> {
        self.ask_until(prompt, check)
    }

    // ------------------------------------------------------------------------
    // Field-level helpers
    // ------------------------------------------------------------------------

    pub fn supply_amount(&mut self) -> Result<f64> {
        self.supply_number("Amount:", require_positive)
    }

    pub fn supply_year(&mut self) -> Result<i32> {
        let year = self.supply_int("Year", i64::from(MIN_YEAR), i64::from(MAX_YEAR))?;
        Ok(year as i32)
    }

    pub fn supply_month(&mut self) -> Result<u32> {
        Ok(self.supply_int("Month", 1, 12)? as u32)
    }

    pub fn supply_day(&mut self, year: i32, month: u32) -> Result<u32> {
        Ok(self.supply_int("Day", 1, i64::from(max_day(year, month)))? as u32)
    }

    pub fn supply_date(&mut self) -> Result<SalesDate> {
        let date = self.supply_text("Date (yyyy-mm-dd):", parse_date)?;
        Ok(SalesDate::Valid(date))
    }

    pub fn supply_region(&mut self) -> Result<Region> {
        let prompt = format!("Region ({}):", Region::valid_codes().join(", "));
        self.supply_text(&prompt, parse_region)
    }
}

// ============================================================================
// ENTRY STRATEGIES
// ============================================================================

/// Amount, then year, month and day one at a time, then region
pub fn from_component_entry<S: InputSource>(prompter: &mut Prompter<S>) -> Result<SalesRecord> {
    let amount = prompter.supply_amount()?;
    let year = prompter.supply_year()?;
    let month = prompter.supply_month()?;
    let day = prompter.supply_day(year, month)?;

    let sales_date = parse_date(&format!("{}-{:02}-{:02}", year, month, day))?;
    let region = prompter.supply_region()?;

    Ok(SalesRecord::new(
        Amount::Valid(amount),
        SalesDate::Valid(sales_date),
        region,
    ))
}

/// Amount, then the whole date as one `yyyy-mm-dd` string, then region
pub fn from_date_entry<S: InputSource>(prompter: &mut Prompter<S>) -> Result<SalesRecord> {
    let amount = prompter.supply_amount()?;
    let sales_date = prompter.supply_date()?;
    let region = prompter.supply_region()?;

    Ok(SalesRecord::new(Amount::Valid(amount), sales_date, region))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::VecDeque;

    /// Replays canned answers and records what was asked and said
    struct ScriptedInput {
        answers: VecDeque<String>,
        prompts: Vec<String>,
        messages: Vec<String>,
    }

    impl ScriptedInput {
        fn new(answers: &[&str]) -> Self {
            ScriptedInput {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                prompts: Vec::new(),
                messages: Vec::new(),
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
            self.prompts.push(prompt.to_string());
            Ok(self.answers.pop_front())
        }

        fn notify(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }
    }

    fn date(y: i32, m: u32, d: u32) -> SalesDate {
        SalesDate::Valid(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_component_entry_happy_path() {
        let mut prompter = Prompter::new(ScriptedInput::new(&["125.75", "2024", "3", "7", "w"]));

        let record = from_component_entry(&mut prompter).unwrap();

        assert_eq!(
            record,
            SalesRecord::new(Amount::Valid(125.75), date(2024, 3, 7), Region::West)
        );
        assert_eq!(record.sales_date.to_string(), "2024-03-07");

        let input = prompter.into_inner();
        assert!(input.messages.is_empty());
        assert_eq!(input.prompts[1], "Year (2000-2999):");
        assert_eq!(input.prompts[3], "Day (1-31):");
    }

    #[test]
    fn test_component_entry_retries_each_field() {
        let mut prompter = Prompter::new(ScriptedInput::new(&[
            "abc", "-4", "0", "10", // amount
            "1999", "2023", // year
            "13", "2", // month
            "29", "28", // day: 2023 is not a leap year
            "x", "c", // region
        ]));

        let record = from_component_entry(&mut prompter).unwrap();

        assert_eq!(
            record,
            SalesRecord::new(Amount::Valid(10.0), date(2023, 2, 28), Region::Central)
        );

        let input = prompter.into_inner();
        assert_eq!(
            input.messages,
            vec![
                "Amount must be a number, got 'abc'.",
                "Amount must be greater than zero.",
                "Amount must be greater than zero.",
                "Year must be between 2000 and 2999.",
                "Month must be between 1 and 12.",
                "Day must be between 1 and 28.",
                "Region must be one of the following: w, m, c, e.",
            ]
        );
    }

    #[test]
    fn test_leap_day_allowed_in_leap_year() {
        let mut prompter = Prompter::new(ScriptedInput::new(&["5", "2024", "2", "29", "m"]));
        let record = from_component_entry(&mut prompter).unwrap();
        assert_eq!(record.sales_date, date(2024, 2, 29));
    }

    #[test]
    fn test_non_integer_is_reprompted() {
        let mut prompter = Prompter::new(ScriptedInput::new(&["june", "6"]));
        assert_eq!(prompter.supply_month().unwrap(), 6);
        assert_eq!(
            prompter.into_inner().messages,
            vec!["Month must be a whole number, got 'june'."]
        );
    }

    #[test]
    fn test_date_entry_retries_until_valid() {
        let mut prompter = Prompter::new(ScriptedInput::new(&[
            "42",
            "2024-02-30",
            "1999-01-01",
            "  2024-02-29  ",
            "e",
        ]));

        let record = from_date_entry(&mut prompter).unwrap();

        assert_eq!(
            record,
            SalesRecord::new(Amount::Valid(42.0), date(2024, 2, 29), Region::East)
        );
        assert!(!record.has_bad_data());

        let input = prompter.into_inner();
        assert_eq!(input.messages.len(), 2);
        assert!(input.messages[0].contains("2024-02-30"));
        assert_eq!(input.messages[1], "Year of the date must be between 2000 and 2999.");
    }

    #[test]
    fn test_end_of_input_stops_retrying() {
        let mut prompter = Prompter::new(ScriptedInput::new(&["nope", "still nope"]));
        let err = prompter.supply_amount().unwrap_err();
        assert!(matches!(err, LedgerError::EndOfInput));
    }

    #[test]
    fn test_stdin_input_reads_lines() {
        let mut input = StdinInput::from_reader("12.5\r\nw\n".as_bytes());
        assert_eq!(input.ask("Amount:").unwrap(), Some("12.5".to_string()));
        assert_eq!(input.ask("Region:").unwrap(), Some("w".to_string()));
        assert_eq!(input.ask("Region:").unwrap(), None);
    }
}
