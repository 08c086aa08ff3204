//! Output formatting for doctor results.
//!
//! Terminal output marks each check with ✓/✗/⚠, adds a platform-specific
//! fix for failing checks, and ends with a summary line. JSON output carries
//! the same data for scripts.

use serde::Serialize;
use std::fmt::Write;

use super::checker::{CHECK_CONFIG, CHECK_KEYBOARD, CHECK_PLAYER, CHECK_SOUNDS};
use crate::branding::APP_BINARY_NAME;
use crate::doctor::{DependencyStatus, ToolStatus};

/// Output format for doctor results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Terminal,
    /// Machine-readable JSON output
    Json,
}

/// Platform used to pick installation hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// macOS
    MacOs,
    /// Linux
    Linux,
    /// Windows
    Windows,
    /// Anything else
    Unknown,
}

impl Platform {
    /// Detects the current platform.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Unknown
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::Unknown => "Unknown",
        }
    }
}

/// JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// "ready", "missing_dependencies" or "warnings"
    pub status: String,
    /// Passing checks
    pub passed: usize,
    /// Failing checks
    pub failed: usize,
    /// Undecided checks
    pub unknown: usize,
    /// Individual results
    pub dependencies: Vec<JsonDependency>,
    /// Platform name
    pub platform: String,
}

/// JSON form of one check.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDependency {
    /// Check name
    pub name: String,
    /// Outcome
    pub status: ToolStatus,
    /// Version if detected
    pub version: Option<String>,
    /// Detail
    pub message: String,
    /// How to fix a failing check
    pub installation_hint: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    passed: usize,
    failed: usize,
    unknown: usize,
}

impl Counts {
    fn of(statuses: &[DependencyStatus]) -> Self {
        statuses.iter().fold(Self::default(), |mut counts, s| {
            match s.status {
                ToolStatus::Available => counts.passed += 1,
                ToolStatus::Missing => counts.failed += 1,
                ToolStatus::Unknown => counts.unknown += 1,
            }
            counts
        })
    }
}

/// Formats doctor results.
#[derive(Debug)]
pub struct DoctorFormatter {
    format: OutputFormat,
    platform: Platform,
}

impl DoctorFormatter {
    /// Terminal output for the current platform.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            format: OutputFormat::Terminal,
            platform: Platform::detect(),
        }
    }

    /// Given format for the current platform.
    #[must_use]
    pub const fn with_format(format: OutputFormat) -> Self {
        Self {
            format,
            platform: Platform::detect(),
        }
    }

    /// Terminal output for a given platform.
    #[must_use]
    pub const fn with_platform(platform: Platform) -> Self {
        Self {
            format: OutputFormat::Terminal,
            platform,
        }
    }

    /// Formats the results.
    pub fn format_results(&self, statuses: &[DependencyStatus]) -> String {
        match self.format {
            OutputFormat::Terminal => self.format_terminal(statuses),
            OutputFormat::Json => self.format_json(statuses),
        }
    }

    fn format_terminal(&self, statuses: &[DependencyStatus]) -> String {
        let mut output = String::new();
        output.push_str("KeyViz Environment Status\n");
        output.push_str("═════════════════════════\n\n");

        let counts = Counts::of(statuses);

        for status in statuses {
            let (symbol, status_text) = match status.status {
                ToolStatus::Available => ("✓", "OK"),
                ToolStatus::Missing => ("✗", "MISSING"),
                ToolStatus::Unknown => ("⚠", "UNKNOWN"),
            };

            let dots = ".".repeat(20_usize.saturating_sub(status.name.len()));
            let _ = write!(output, "{symbol} {}{dots} {status_text}", status.name);
            if let Some(version) = &status.version {
                let _ = write!(output, " (v{version})");
            }
            output.push('\n');

            for line in status.message.lines() {
                let _ = writeln!(output, "    {line}");
            }

            if status.status != ToolStatus::Available {
                if let Some(hint) = self.installation_hint(&status.name) {
                    let _ = writeln!(output, "    Fix: {hint}");
                }
            }
            output.push('\n');
        }

        output.push_str("─────────────────────────\n");
        let _ = write!(output, "Summary: {} passed", counts.passed);
        if counts.failed > 0 {
            let _ = write!(output, ", {} failed", counts.failed);
        }
        if counts.unknown > 0 {
            let _ = write!(output, ", {} unknown", counts.unknown);
        }
        output.push('\n');

        if counts.failed == 0 && counts.unknown == 0 {
            output.push_str("\n✓ Everything is ready.\n");
        } else if counts.failed > 0 {
            output.push_str("\n✗ Some checks failed\n");
            let _ = writeln!(
                output,
                "  Fix the issues above and run '{APP_BINARY_NAME} doctor' again."
            );
        } else {
            output.push_str("\n⚠ Some checks could not be completed\n");
        }

        output
    }

    fn format_json(&self, statuses: &[DependencyStatus]) -> String {
        let counts = Counts::of(statuses);
        let status = if counts.failed == 0 && counts.unknown == 0 {
            "ready"
        } else if counts.failed > 0 {
            "missing_dependencies"
        } else {
            "warnings"
        };

        let dependencies = statuses
            .iter()
            .map(|s| JsonDependency {
                name: s.name.clone(),
                status: s.status,
                version: s.version.clone(),
                message: s.message.clone(),
                installation_hint: if s.status == ToolStatus::Available {
                    None
                } else {
                    self.installation_hint(&s.name)
                },
            })
            .collect();

        let report = JsonOutput {
            status: status.to_string(),
            passed: counts.passed,
            failed: counts.failed,
            unknown: counts.unknown,
            dependencies,
            platform: self.platform.name().to_string(),
        };

        serde_json::to_string_pretty(&report).unwrap_or_else(|_| {
            r#"{"status":"error","message":"Failed to serialize JSON output"}"#.to_string()
        })
    }

    fn installation_hint(&self, name: &str) -> Option<String> {
        match name {
            CHECK_KEYBOARD => Some(match self.platform {
                Platform::Linux => {
                    "sudo usermod -aG input $USER  (then log out and back in)".to_string()
                }
                _ => "Run with --source terminal".to_string(),
            }),
            CHECK_PLAYER => Some(match self.platform {
                Platform::Linux => {
                    "sudo apt-get install pulseaudio-utils  (Debian/Ubuntu)\n         or: sudo pacman -S libpulse  (Arch)"
                        .to_string()
                }
                Platform::MacOs => "afplay ships with macOS; check your PATH".to_string(),
                Platform::Windows | Platform::Unknown => {
                    "Install ffmpeg (ffplay) or set sound.player in the config".to_string()
                }
            }),
            CHECK_SOUNDS => Some("Copy <key>.wav clips and a fallback a.wav into the sounds directory".to_string()),
            CHECK_CONFIG => Some(format!(
                "Fix the file by hand or reset it with '{APP_BINARY_NAME} config init --force'"
            )),
            _ => None,
        }
    }
}

impl Default for DoctorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doctor::checker::CHECK_LAYOUTS;

    fn sample_statuses() -> Vec<DependencyStatus> {
        vec![
            DependencyStatus::available(CHECK_CONFIG, "Valid"),
            DependencyStatus::missing(CHECK_KEYBOARD, "Permission denied"),
            DependencyStatus::available(CHECK_PLAYER, "Using paplay")
                .with_version(Some("16.1".to_string())),
            DependencyStatus::unknown(CHECK_SOUNDS, "no a.wav"),
            DependencyStatus::available(CHECK_LAYOUTS, "2 layout(s)"),
        ]
    }

    #[test]
    fn test_platform_names() {
        assert_eq!(Platform::MacOs.name(), "macOS");
        assert_eq!(Platform::Linux.name(), "Linux");
        assert_eq!(Platform::Unknown.name(), "Unknown");
    }

    #[test]
    fn test_format_terminal() {
        let formatter = DoctorFormatter::with_platform(Platform::Linux);
        let output = formatter.format_results(&sample_statuses());

        assert!(output.contains("KeyViz Environment Status"));
        assert!(output.contains("✓ Config"));
        assert!(output.contains("✗ Keyboard Access"));
        assert!(output.contains("⚠ Sound Clips"));
        assert!(output.contains("(v16.1)"));
        assert!(output.contains("usermod -aG input"));
        assert!(output.contains("Summary: 3 passed, 1 failed, 1 unknown"));
        assert!(output.contains("Some checks failed"));
    }

    #[test]
    fn test_format_terminal_all_passed() {
        let formatter = DoctorFormatter::new();
        let statuses = vec![
            DependencyStatus::available(CHECK_CONFIG, "Valid"),
            DependencyStatus::available(CHECK_PLAYER, "Using aplay"),
        ];
        let output = formatter.format_results(&statuses);
        assert!(output.contains("2 passed"));
        assert!(output.contains("Everything is ready"));
        assert!(!output.contains("Fix:"));
    }

    #[test]
    fn test_format_json() {
        let formatter = DoctorFormatter {
            format: OutputFormat::Json,
            platform: Platform::Linux,
        };
        let output = formatter.format_results(&sample_statuses());
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["status"], "missing_dependencies");
        assert_eq!(json["passed"], 3);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["unknown"], 1);
        assert_eq!(json["platform"], "Linux");
        assert_eq!(json["dependencies"][1]["status"], "missing");
        assert!(json["dependencies"][1]["installation_hint"].is_string());
        assert!(json["dependencies"][0]["installation_hint"].is_null());
        assert_eq!(json["dependencies"][2]["version"], "16.1");
    }

    #[test]
    fn test_format_json_warnings_only() {
        let formatter = DoctorFormatter::with_format(OutputFormat::Json);
        let output = formatter.format_results(&[DependencyStatus::unknown(CHECK_SOUNDS, "?")]);
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["status"], "warnings");
    }
}
