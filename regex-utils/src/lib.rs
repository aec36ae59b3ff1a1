//! Regex utilities for psmanifest
//! Extracted to a separate crate for compilation optimization

use once_cell::sync::Lazy;
use regex::Regex;

/// Compiled patterns for flat `key = 'value'` manifest assignments
pub mod manifest {
    use super::*;

    /// One scalar assignment per line.
    ///
    /// Group 1 is greedy, so with several `=` on a line the split happens at
    /// the last `=` that still leaves a quoted value behind it. Group 2 runs to
    /// the last quote before the optional `;`. Opening and closing quotes do
    /// not have to be of the same kind.
    // Tabs count as whitespace alongside spaces, unlike the space-only form ` *`
    pub static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"^(.*)[ \t]*=[ \t]*['"](.*)['"][ \t]*(;)?[ \t]*$"#)
            .expect("Invalid regex pattern")
    });

    /// Split a single line into its raw key and raw value.
    ///
    /// The line must not carry its line terminator. Neither side is trimmed.
    pub fn capture(line: &str) -> Option<(&str, &str)> {
        let caps = ASSIGNMENT.captures(line)?;
        let key = caps.get(1)?.as_str();
        let value = caps.get(2)?.as_str();
        Some((key, value))
    }
}
