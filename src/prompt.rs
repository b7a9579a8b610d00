use std::io::{self, BufRead, Write};

/// Blocking yes/no confirmation asked before destructive actions
/// (clearing the cart, deleting a listing).
pub trait ConfirmPrompt {
    fn confirm(&self, question: &str) -> bool;
}

/// Reads the answer from stdin; anything but `y`/`yes` declines.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&self, question: &str) -> bool {
        print!("{question} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Fixed answer, for non-interactive use (`--yes`) and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmPrompt for FixedAnswer {
    fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}
