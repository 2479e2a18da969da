//! Parsing of menu selections such as `1 3`, `2,5` or `1,3-5`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::SelectionError;

lazy_static! {
    // Numbers are separated by commas and/or whitespace
    static ref SEPARATOR_RE: Regex = Regex::new(r"[,\s]+").unwrap();
    // Inclusive range like "3-5"
    static ref RANGE_RE: Regex = Regex::new(r"^(\d+)-(\d+)$").unwrap();
}

/// What the user asked for at the menu prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Quit,
    /// 0-based indices into the result list, in the order given, without duplicates
    Items(Vec<usize>),
}

/// Parse a selection line against a list of `len` results
pub fn parse_selection(input: &str, len: usize) -> Result<Choice, SelectionError> {
    let trimmed = input.trim();

    if trimmed.eq_ignore_ascii_case("q") {
        return Ok(Choice::Quit);
    }

    let mut picks: Vec<usize> = Vec::new();

    for token in SEPARATOR_RE.split(trimmed).filter(|t| !t.is_empty()) {
        let (start, end) = match RANGE_RE.captures(token) {
            Some(caps) => {
                let start = parse_number(&caps[1], len)?;
                let end = parse_number(&caps[2], len)?;
                if start > end {
                    return Err(SelectionError::InvalidRange(token.to_string()));
                }
                (start, end)
            }
            None => {
                let n = parse_number(token, len)?;
                (n, n)
            }
        };

        for n in start..=end {
            if !picks.contains(&(n - 1)) {
                picks.push(n - 1);
            }
        }
    }

    if picks.is_empty() {
        return Err(SelectionError::Empty);
    }

    Ok(Choice::Items(picks))
}

/// Parse a 1-based menu number and check it against the list length
fn parse_number(token: &str, len: usize) -> Result<usize, SelectionError> {
    let out_of_range = || SelectionError::OutOfRange {
        value: token.to_string(),
        max: len,
    };

    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return Err(SelectionError::NotANumber(token.to_string()));
    }

    // All digits but too large for usize
    let n: usize = token.parse().map_err(|_| out_of_range())?;

    if n == 0 || n > len {
        return Err(out_of_range());
    }

    Ok(n)
}
