use std::io::{self, Write};

/// Yes/no console confirmation.
///
/// Injected as a capability so the browser-opening step can be driven
/// by a scripted answer in tests instead of blocking on real stdin.
pub trait Confirmation {
    fn confirm(&self, question: &str) -> bool;
}

/// The real prompt: asks on stdout, reads one line from stdin.
/// Anything other than "y"/"Y" counts as a no.
pub struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&self, question: &str) -> bool {
        print!("{} (Y/N): ", question);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }

        answer.trim().eq_ignore_ascii_case("y")
    }
}

/// Block until the user presses Enter, so a double-clicked console
/// window keeps its output visible
pub fn pause_before_exit() {
    println!("\nAll tasks finished. Press Enter to exit...");
    let mut line = String::new();
    let _ = io::stdin().read_line(&mut line);
}
