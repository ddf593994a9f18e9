//! Message surface trait.
//!
//! The core never renders the transcript itself; it appends lines through
//! this seam and leaves presentation to the implementation (an in-memory
//! log, a console, a game UI panel).

/// A sink for conversation lines shown to the trainee.
pub trait MessageSurface: Send + Sync {
    /// Appends one line. `from_assistant` distinguishes assistant output
    /// from the echo of the user's own input.
    fn append(&self, text: &str, from_assistant: bool);

    /// Removes every line shown so far.
    fn clear_all(&self);
}
