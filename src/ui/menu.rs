use std::io::{self, BufRead, Write};

use crate::api::SearchResult;
use crate::selection::{parse_selection, Choice};
use crate::ui::theme::Theme;

/// Numbered menu of search results
pub struct Menu<'a> {
    results: &'a [SearchResult],
    theme: Theme,
}

impl<'a> Menu<'a> {
    pub fn new(results: &'a [SearchResult]) -> Self {
        Self {
            results,
            theme: Theme::default(),
        }
    }

    /// Print the 1-indexed result list followed by the exit entry
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (index, result) in self.results.iter().enumerate() {
            let line = format!("({}) {}", index + 1, result.display_line());
            writeln!(out, "{}", self.theme.row(index, line))?;
        }
        writeln!(out, "{}", self.theme.exit("(q) Exit"))?;
        out.flush()
    }

    /// Ask for a selection until one parses.
    ///
    /// Returns 0-based indices, or `None` when the user quits or input ends.
    pub fn prompt<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
    ) -> io::Result<Option<Vec<usize>>> {
        loop {
            write!(out, "{}", self.theme.prompt("Choose a number: "))?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(None);
            }

            match parse_selection(&line, self.results.len()) {
                Ok(Choice::Quit) => return Ok(None),
                Ok(Choice::Items(picks)) => return Ok(Some(picks)),
                Err(e) => {
                    tracing::debug!("Rejected selection {:?}: {}", line.trim(), e);
                    writeln!(out, "{}", self.theme.error(format!("Invalid choice. {}", e)))?;
                }
            }
        }
    }
}

/// Ask for a search query until a non-blank one is entered.
///
/// Returns `None` when input ends.
pub fn prompt_query<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Option<String>> {
    let theme = Theme::default();

    loop {
        write!(out, "{}", theme.prompt("Search: "))?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(None);
        }

        let query = line.trim();
        if !query.is_empty() {
            return Ok(Some(query.to_string()));
        }
    }
}
