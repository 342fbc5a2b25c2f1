//! Terminal interface for bookrag

mod ui;

#[cfg(test)]
mod tests;

pub use ui::{
    display_banner, handle_input_with_history, print_help, render_answer, render_error,
    render_health,
};

// Re-export core types
pub use bookrag_core::{Error, Result};
