//! Line-based prompts on the controlling terminal
//!
//! Questions go to stderr so stdout stays clean for dry-run output. An
//! empty answer or end of input counts as dismissing the prompt.

use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

use sp_core::traits::{InputRequest, Prompter};

use crate::output::{print_error, print_info, print_warning};

pub struct ConsolePrompter<R = BufReader<Stdin>> {
    input: Mutex<R>,
}

impl ConsolePrompter {
    /// Prompt on stdin
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsolePrompter<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            input: Mutex::new(reader),
        }
    }

    /// Show `question` and read one line; `None` at end of input
    pub async fn ask(&self, question: &str) -> Option<String> {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{} ", question);
        let _ = stderr.flush();

        let mut line = String::new();
        match self.input.lock().await.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::warn!("Failed to read answer: {}", e);
                None
            }
        }
    }
}

/// Match an answer against the list, by 1-based number or exact text
fn choose(items: &[String], answer: &str) -> Option<String> {
    if let Ok(n) = answer.parse::<usize>() {
        if (1..=items.len()).contains(&n) {
            return Some(items[n - 1].clone());
        }
    }
    items.iter().find(|item| item.as_str() == answer).cloned()
}

fn is_yes(answer: &str, button: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case(button)
        || answer.eq_ignore_ascii_case("y")
        || answer.eq_ignore_ascii_case("yes")
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Prompter for ConsolePrompter<R> {
    async fn pick(&self, items: &[String], placeholder: &str) -> Option<String> {
        eprintln!("{}", placeholder);
        for (i, item) in items.iter().enumerate() {
            eprintln!("  {}) {}", i + 1, item);
        }

        loop {
            let answer = self.ask(">").await?;
            let answer = answer.trim();
            if answer.is_empty() {
                return None;
            }
            match choose(items, answer) {
                Some(item) => return Some(item),
                None => print_warning(&format!("'{}' is not in the list", answer)),
            }
        }
    }

    async fn input(&self, request: InputRequest<'_>) -> Option<String> {
        loop {
            let answer = self.ask(&format!("{}:", request.prompt)).await?;
            if answer.is_empty() {
                return Some(answer);
            }
            match (request.validate)(&answer) {
                Some(message) => print_warning(&message),
                None => return Some(answer),
            }
        }
    }

    async fn confirm(&self, message: &str, button: &str) -> bool {
        match self.ask(&format!("{} [{}/No]", message, button)).await {
            Some(answer) => is_yes(&answer, button),
            None => false,
        }
    }

    async fn show_info(&self, message: &str) {
        print_info(message);
    }

    async fn show_error(&self, message: &str, action: &str) -> bool {
        print_error(message);
        match self.ask(&format!("{}? [y/N]", action)).await {
            Some(answer) => is_yes(&answer, action),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompter(script: &'static str) -> ConsolePrompter<&'static [u8]> {
        ConsolePrompter::from_reader(script.as_bytes())
    }

    fn items() -> Vec<String> {
        vec!["alpha".to_string(), "beta".to_string()]
    }

    #[tokio::test]
    async fn test_pick_by_number_or_name() {
        assert_eq!(prompter("2\n").pick(&items(), "Pick").await.as_deref(), Some("beta"));
        assert_eq!(prompter("alpha\n").pick(&items(), "Pick").await.as_deref(), Some("alpha"));
        assert_eq!(
            prompter("7\ngamma\n1\n").pick(&items(), "Pick").await.as_deref(),
            Some("alpha")
        );
    }

    #[tokio::test]
    async fn test_pick_dismissed() {
        assert!(prompter("\n").pick(&items(), "Pick").await.is_none());
        assert!(prompter("").pick(&items(), "Pick").await.is_none());
    }

    #[tokio::test]
    async fn test_input_reasks_until_valid() {
        let validate = |s: &str| {
            if s.contains(':') {
                None
            } else {
                Some("need a colon".to_string())
            }
        };
        let answer = prompter("9000\nlocalhost:9000\n")
            .input(InputRequest {
                prompt: "Address",
                ignore_focus_out: true,
                validate: &validate,
            })
            .await;
        assert_eq!(answer.as_deref(), Some("localhost:9000"));
    }

    #[tokio::test]
    async fn test_confirm() {
        assert!(prompter("Yes\n").confirm("Save?", "Yes").await);
        assert!(prompter("y\n").confirm("Save?", "Yes").await);
        assert!(!prompter("n\n").confirm("Save?", "Yes").await);
        assert!(!prompter("").confirm("Save?", "Yes").await);
    }
}
