use std::fmt::Display;

use crossterm::style::{style, Color, StyledContent, Stylize};

/// Terminal color theme for the menu and prompts
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub warning: Color,
    pub error: Color,
    pub prompt: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

impl Theme {
    /// Bright ANSI palette that reads on light and dark terminals
    pub fn classic() -> Self {
        Self {
            primary: Color::Blue,
            secondary: Color::Cyan,
            warning: Color::Yellow,
            error: Color::Red,
            prompt: Color::Magenta,
        }
    }

    /// Style for a result row, alternating colors between rows
    pub fn row<D: Display>(&self, index: usize, content: D) -> StyledContent<D> {
        let color = if index % 2 == 0 {
            self.primary
        } else {
            self.secondary
        };
        style(content).with(color)
    }

    /// Style for the exit entry
    pub fn exit<D: Display>(&self, content: D) -> StyledContent<D> {
        style(content).with(self.warning).bold()
    }

    /// Style for input prompts
    pub fn prompt<D: Display>(&self, content: D) -> StyledContent<D> {
        style(content).with(self.prompt).bold()
    }

    /// Style for error messages
    pub fn error<D: Display>(&self, content: D) -> StyledContent<D> {
        style(content).with(self.error)
    }
}
