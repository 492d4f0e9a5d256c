//! Minimal stdin prompts for the interactive flows.

use std::io::{self, Write};

/// Prints `label` and reads one trimmed line.
///
/// A closed stdin is an error rather than an empty answer, so interactive
/// loops cannot spin on end-of-input.
pub fn line(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut input = String::new();
    let bytes = io::stdin().read_line(&mut input)?;
    if bytes == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed",
        ));
    }
    Ok(input.trim().to_string())
}

/// Numbered selection; reprompts until a valid index is entered.
pub fn select(title: &str, choices: &[&str]) -> io::Result<usize> {
    println!("{title}");
    for (i, choice) in choices.iter().enumerate() {
        println!("  {}) {choice}", i + 1);
    }
    loop {
        let input = line("> ")?;
        match input.parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => return Ok(n - 1),
            _ => println!("Enter a number between 1 and {}.", choices.len()),
        }
    }
}

/// Yes/no confirmation; any answer starting with `y` is a yes. A closed
/// stdin counts as a no, so batch invocations fall through safely.
pub fn confirm(question: &str) -> io::Result<bool> {
    match line(&format!("{question} (y/n) ")) {
        Ok(answer) => Ok(answer.to_lowercase().starts_with('y')),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(err) => Err(err),
    }
}
