use crate::errors::AppResult;
use std::io::{Write, stdin, stdout};

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> AppResult<bool> {
    print!("⚠️  {question} [y/N]: ");
    stdout().flush()?;

    let mut answer = String::new();
    stdin().read_line(&mut answer)?;

    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Read one line, e.g. a PIN typed a second time.
pub fn read_line(label: &str) -> AppResult<String> {
    print!("{label}: ");
    stdout().flush()?;

    let mut line = String::new();
    stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
