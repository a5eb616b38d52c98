//! Human-readable progress output.

use std::io::{self, Write};

/// ANSI color codes for terminal output.
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Writes run progress to a sink, one event per line.
pub struct Reporter<'a, W: Write> {
    out: &'a mut W,
    use_colors: bool,
}

impl<'a, W: Write> Reporter<'a, W> {
    pub fn new(out: &'a mut W, use_colors: bool) -> Self {
        Self { out, use_colors }
    }

    fn line(&mut self, color: &str, text: &str) -> io::Result<()> {
        if self.use_colors {
            writeln!(self.out, "{color}{text}{}", colors::RESET)
        } else {
            writeln!(self.out, "{text}")
        }
    }

    pub fn progress(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    pub fn success(&mut self, text: &str) -> io::Result<()> {
        self.line(colors::GREEN, text)
    }

    pub fn failure(&mut self, text: &str) -> io::Result<()> {
        self.line(colors::RED, text)
    }

    /// Prints `body` under `heading`, pretty-printed when it is JSON.
    pub fn echo(&mut self, heading: &str, body: &str) -> io::Result<()> {
        self.line(colors::CYAN, heading)?;
        let rendered = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or_else(|| body.to_string());
        self.line(colors::DIM, &rendered)
    }

    pub fn all_passed(&mut self) -> io::Result<()> {
        let text = "All smoke tests passed successfully!";
        if self.use_colors {
            writeln!(
                self.out,
                "{}{}{text}{}",
                colors::BOLD,
                colors::GREEN,
                colors::RESET
            )
        } else {
            writeln!(self.out, "{text}")
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(use_colors: bool, f: impl FnOnce(&mut Reporter<'_, Vec<u8>>)) -> String {
        let mut buf = Vec::new();
        let mut reporter = Reporter::new(&mut buf, use_colors);
        f(&mut reporter);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_plain_output_has_no_escape_codes() {
        let out = render(false, |r| {
            r.progress("Checking health status...").unwrap();
            r.success("Service is healthy.").unwrap();
            r.failure("Database check failed.").unwrap();
        });

        assert_eq!(
            out,
            "Checking health status...\nService is healthy.\nDatabase check failed.\n"
        );
    }

    #[test]
    fn test_colored_output_wraps_lines() {
        let out = render(true, |r| {
            r.success("Service is healthy.").unwrap();
            r.failure("Health check failed.").unwrap();
        });

        assert!(out.contains("\x1b[32mService is healthy.\x1b[0m"));
        assert!(out.contains("\x1b[31mHealth check failed.\x1b[0m"));
    }

    #[test]
    fn test_echo_pretty_prints_json() {
        let out = render(false, |r| {
            r.echo("Meal JSON (ID 4):", r#"{"status":"success","meal":{"id":4}}"#)
                .unwrap();
        });

        assert!(out.starts_with("Meal JSON (ID 4):\n{\n"));
        assert!(out.contains("  \"status\": \"success\""));
        assert!(out.contains("\"id\": 4"));
    }

    #[test]
    fn test_echo_keeps_non_json_body() {
        let out = render(false, |r| {
            r.echo("Battle JSON:", "Internal Server Error").unwrap();
        });

        assert_eq!(out, "Battle JSON:\nInternal Server Error\n");
    }
}
