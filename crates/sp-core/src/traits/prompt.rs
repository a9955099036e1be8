//! User prompt traits

use async_trait::async_trait;

/// Single-line text prompt
pub struct InputRequest<'a> {
    /// Text shown above the input
    pub prompt: &'a str,
    /// Keep the prompt open when focus moves elsewhere
    pub ignore_focus_out: bool,
    /// Returns `None` for acceptable input, otherwise the message to show inline
    pub validate: &'a (dyn Fn(&str) -> Option<String> + Send + Sync),
}

/// Prompts offered by the UI shell.
///
/// Every method is a suspension point: the calling flow waits until the
/// user answers or dismisses the prompt.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Pick one of `items`; `None` when dismissed
    async fn pick(&self, items: &[String], placeholder: &str) -> Option<String>;

    /// Ask for one line of text; `None` when dismissed.
    ///
    /// The UI keeps the prompt open while `validate` rejects the input.
    async fn input(&self, request: InputRequest<'_>) -> Option<String>;

    /// Informational message with a single action button; `true` if it was pressed
    async fn confirm(&self, message: &str, button: &str) -> bool;

    /// Informational message
    async fn show_info(&self, message: &str);

    /// Error notification with a single action button; `true` if it was pressed
    async fn show_error(&self, message: &str, action: &str) -> bool;
}
