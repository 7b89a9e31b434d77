use chrono::{Local, NaiveDate};
use colored::Colorize;

use super::OutputFormatter;
use crate::colors::CatppuccinExt;
use crate::tracking::StatusReport;

fn describe_expected_date(date: NaiveDate, today: NaiveDate) -> String {
    let days = (date - today).num_days();
    let when = match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        d if d > 1 => format!("in {} days", d),
        -1 => "1 day ago".to_string(),
        d => format!("{} days ago", -d),
    };
    format!("{} ({})", date.format("%d/%m/%Y"), when)
}

pub struct HumanFormatter {
    use_colors: bool,
    today: Option<NaiveDate>,
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            today: None,
        }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Pin the date expected dates are counted from (defaults to the local date)
    #[cfg(test)]
    fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn label(&self, text: &str) -> String {
        if self.use_colors {
            text.sky().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn value(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_white().to_string()
        } else {
            text.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn warning(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, text: &str) -> String {
        if self.use_colors {
            format!("\n{}\n{}", text.lavender().bold(), "─".repeat(text.len()).subtext0())
        } else {
            format!("\n{}\n{}", text, "-".repeat(text.len()))
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_report(&self, reference: &str, report: &StatusReport) -> String {
        let mut output = Vec::new();

        output.push(self.header(&format!("Passport application: {}", reference)));

        match report {
            StatusReport::Alert { status } => {
                output.push(format!("  {} {}", self.error("✗"), self.error(status)));
            }
            StatusReport::Tracked {
                expected_date,
                status,
            } => {
                let status = match status {
                    Some(status) => self.success(status),
                    None => self.warning("Unknown (status table not found)"),
                };
                output.push(format!("  {}: {}", self.label("Status"), status));

                let expected = match expected_date {
                    Some(date) => {
                        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
                        self.value(&describe_expected_date(*date, today))
                    }
                    None => self.value("Not available"),
                };
                output.push(format!("  {}: {}", self.label("Expected Date"), expected));
            }
        }

        output.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_describe_expected_date() {
        let today = date(2026, 10, 18);
        assert_eq!(
            describe_expected_date(date(2026, 11, 14), today),
            "14/11/2026 (in 27 days)"
        );
        assert_eq!(describe_expected_date(today, today), "18/10/2026 (today)");
        assert_eq!(
            describe_expected_date(date(2026, 10, 19), today),
            "19/10/2026 (tomorrow)"
        );
        assert_eq!(
            describe_expected_date(date(2026, 10, 15), today),
            "15/10/2026 (3 days ago)"
        );
    }

    #[test]
    fn test_tracked_report_plain() {
        let formatter = HumanFormatter::new()
            .without_colors()
            .with_today(date(2026, 10, 18));
        let report = StatusReport::Tracked {
            expected_date: Some(date(2026, 11, 14)),
            status: Some("In Progress: Awaiting documents".to_string()),
        };

        let text = formatter.format_report("ABC123", &report);
        assert!(text.contains("Passport application: ABC123"));
        assert!(text.contains("  Status: In Progress: Awaiting documents"));
        assert!(text.contains("  Expected Date: 14/11/2026 (in 27 days)"));
    }

    #[test]
    fn test_missing_values_plain() {
        let formatter = HumanFormatter::new().without_colors();
        let report = StatusReport::Tracked {
            expected_date: None,
            status: None,
        };

        let text = formatter.format_report("ABC123", &report);
        assert!(text.contains("Status: Unknown"));
        assert!(text.contains("Expected Date: Not available"));
    }

    #[test]
    fn test_alert_plain() {
        let formatter = HumanFormatter::new().without_colors();
        let report = StatusReport::Alert {
            status: "Foo".to_string(),
        };

        let text = formatter.format_report("ABC123", &report);
        assert!(text.ends_with("✗ Foo"));
        assert!(!text.contains("Expected Date"));
    }
}
