mod menu;
mod theme;

pub use menu::{prompt_query, Menu};
