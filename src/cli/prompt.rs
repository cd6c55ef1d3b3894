//! Interactive prompts

use std::io::{self, BufRead, Write};

/// Ask a yes/no question; anything but `y` or `yes` counts as no
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "{} [y/N]: ", question)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// [`confirm`] against the process's stdin and stdout
pub fn confirm_stdin(question: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    confirm(question, &mut stdin.lock(), &mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn ask(answer: &str) -> (bool, String) {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut output = Vec::new();
        let confirmed = confirm("Delete this transaction?", &mut input, &mut output).unwrap();
        (confirmed, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_yes_answers() {
        assert!(ask("y\n").0);
        assert!(ask("YES\n").0);
        assert!(ask("  yes  \n").0);
    }

    #[test]
    fn test_everything_else_is_no() {
        assert!(!ask("n\n").0);
        assert!(!ask("\n").0);
        assert!(!ask("").0);
        assert!(!ask("yep\n").0);
    }

    #[test]
    fn test_prompt_text() {
        assert_eq!(ask("n\n").1, "Delete this transaction? [y/N]: ");
    }
}
