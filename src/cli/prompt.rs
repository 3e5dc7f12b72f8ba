//! Interactive confirmation

use std::io::{self, BufRead, Write};

/// Asks the user a yes/no question
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Confirmation read from one line of stdin; EOF declines
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", question)?;
        stdout.flush()?;

        let mut line = Vec::new();
        let read = io::stdin().lock().read_until(b'\n', &mut line)?;
        Ok(read > 0 && is_consent(&String::from_utf8_lossy(&line)))
    }
}

/// Only `y` and `yes`, in any case, count as consent
pub fn is_consent(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
