// Console output helpers for the diagnostic tools

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Render a bus-level failure in red for the terminal. The `i^2c` tag is
/// the chassis wiring label used on the bench printouts.
pub fn bus_error(message: &str) -> String {
    format!("{RED}i^2c Error: {message}{RESET}")
}
