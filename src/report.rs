use console::{Emoji, Style};

pub static PASS: Emoji<'static, 'static> = Emoji("✅", "ok");
pub static FAIL: Emoji<'static, 'static> = Emoji("❌", "FAILED");

/// Aggregate counters accumulated by the execution loop and read once at the
/// end of a run. The process exit code is 0 iff no failures were recorded.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub executed: usize,
    pub failures: usize,
}

impl RunSummary {
    /// Record one probe outcome.
    pub const fn record(&mut self, passed: bool) {
        self.executed += 1;
        if !passed {
            self.failures += 1;
        }
    }

    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failures == 0
    }
}

/// Print the trailing summary block and pass/fail banner.
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("Test Summary:");
    println!("Total Tests Executed: {}", summary.executed);
    println!("Total Errors: {}", summary.failures);
    if summary.all_passed() {
        println!(
            "{} {}",
            PASS,
            Style::new().green().apply_to("All tests passed successfully!")
        );
    } else {
        println!(
            "{} {}",
            FAIL,
            Style::new()
                .red()
                .apply_to("Some tests failed. Please check the logs for details.")
        );
    }
    println!();
}
