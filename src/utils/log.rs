// src/utils/log.rs

//! Multi-line progress formatting on top of the `log` facade.
//!
//! Timestamps and levels come from whichever logger the binary installs.

/// Width of header rules.
const RULE_WIDTH: usize = 60;

/// Log a boxed header.
pub fn header(title: &str) {
    let border = "═".repeat(RULE_WIDTH);
    ::log::info!("{border}");
    ::log::info!("  {title}");
    ::log::info!("{border}");
}

/// Format a step in a process.
pub fn format_step(step_num: usize, total: usize, message: &str) -> String {
    format!("[STEP {step_num}/{total}] {message}")
}

/// Log a step in a process.
pub fn step(step_num: usize, total: usize, message: &str) {
    ::log::info!("{}", format_step(step_num, total, message));
}

/// Log a summary section.
pub fn summary(title: &str, items: &[(&str, String)]) {
    ::log::info!("[SUMMARY] {title}");
    for (key, value) in items {
        ::log::info!("    {key}: {value}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_step() {
        assert_eq!(format_step(2, 4, "Fingerprint"), "[STEP 2/4] Fingerprint");
    }
}
