//! Minimal interactive prompts: a numbered single-select menu and a
//! free-text question, both over stdin/stdout.

use std::io::{BufRead, Write};

use crate::error::{GrabError, Result};

/// Present a numbered menu and return the index of the chosen option.
///
/// Re-asks on invalid input; EOF cancels.
pub fn select<S: AsRef<str>>(message: &str, options: &[S]) -> Result<usize> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    println!("{message}");
    for (i, option) in options.iter().enumerate() {
        println!("  {}) {}", i + 1, option.as_ref());
    }

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Err(GrabError::Cancelled),
        };

        if let Some(index) = parse_selection(&line, options.len()) {
            return Ok(index);
        }
        println!("Enter a number between 1 and {}.", options.len());
    }
}

/// Ask a free-text question and return the trimmed answer.
pub fn input(message: &str) -> Result<String> {
    print!("{message} ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Err(GrabError::Cancelled);
    }
    Ok(line.trim().to_string())
}

/// Parse a 1-based menu answer into a 0-based index.
fn parse_selection(line: &str, len: usize) -> Option<usize> {
    let n: usize = line.trim().parse().ok()?;
    if n >= 1 && n <= len {
        Some(n - 1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection_valid() {
        assert_eq!(parse_selection("1", 3), Some(0));
        assert_eq!(parse_selection(" 3 ", 3), Some(2));
    }

    #[test]
    fn test_parse_selection_out_of_range() {
        assert_eq!(parse_selection("0", 3), None);
        assert_eq!(parse_selection("4", 3), None);
    }

    #[test]
    fn test_parse_selection_garbage() {
        assert_eq!(parse_selection("two", 3), None);
        assert_eq!(parse_selection("", 3), None);
    }
}
