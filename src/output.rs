//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! The primary display for every entity (component, assignment, check) is
//! its name and positional index. Paths, reasons and counts follow on
//! indented context lines. The output reads as an inventory first and a log
//! second.
//!
//! # Output Format
//!
//! ## List / Validate
//!
//! ```text
//! Components
//! 001 header (4/5 variants)
//!     Professional casino header with navigation
//! 002 faqs (0/1 variants)
//!     No valid variants
//!
//! 2 components, 1 usable
//! ```
//!
//! ## Build
//!
//! ```text
//! Policy: smart (base theme: luxury)
//! 001 header → luxury
//! 002 hero → vip
//!     Fallback: jackpot missing, using vip
//!
//! Successfully imported: 2/2 components
//! Skipped: faqs
//! Website generated in: web-folder
//! ```
//!
//! ## Check
//!
//! ```text
//! PASS empty_links
//! FAIL meta_tags (1 issue)
//!     index.html: missing meta tags: author
//!
//! 1 issue found
//! ```
//!
//! # Architecture
//!
//! Each block has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::assemble::RunSummary;
use crate::catalog::CatalogReport;
use crate::country::CountryReport;
use crate::lint::LintReport;
use crate::selector::Selection;
use crate::theme::{Theme, Token};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Catalog
// ============================================================================

pub fn format_catalog_report(report: &CatalogReport) -> Vec<String> {
    let mut lines = vec!["Components".to_string()];

    for (i, status) in report.components.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}/{} variants)",
            format_index(i + 1),
            status.name,
            status.valid_variants,
            status.total_variants
        ));
        if !status.is_usable() {
            lines.push("    No valid variants".to_string());
        } else if !status.description.is_empty() {
            lines.push(format!("    {}", truncate_desc(&status.description, 60)));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{}, {} usable",
        plural(report.components.len(), "component", "components"),
        report.usable_count()
    ));
    lines
}

pub fn print_catalog_report(report: &CatalogReport) {
    print_lines(format_catalog_report(report));
}

/// Lines for `init`.
pub fn format_scaffold(root: &Path, created: &[String]) -> Vec<String> {
    if created.is_empty() {
        return vec![format!(
            "Catalog at {} already has sample descriptors",
            root.display()
        )];
    }
    let mut lines = vec![format!("Created catalog structure in {}", root.display())];
    lines.extend(created.iter().map(|name| format!("    {name}/component.json")));
    lines
}

pub fn print_scaffold(root: &Path, created: &[String]) {
    print_lines(format_scaffold(root, created));
}

// ============================================================================
// Theme
// ============================================================================

/// Theme name, mode and every token, one per line.
pub fn format_theme(theme: &Theme) -> Vec<String> {
    let mut lines = vec![
        format!("Theme: {}", theme.name),
        format!("    Mode: {}", theme.mode),
        format!("    Seed: {}", theme.seed),
    ];
    let tokens = theme.tokens();
    let width = tokens.keys().map(|k| k.len()).max().unwrap_or(0);
    for (key, token) in &tokens {
        let value = match token {
            Token::Color(c) => c.to_hex(),
            Token::Value(v) => v.clone(),
        };
        lines.push(format!("    {key:<width$}  {value}"));
    }
    lines
}

pub fn print_theme(theme: &Theme) {
    print_lines(format_theme(theme));
}

// ============================================================================
// Build
// ============================================================================

pub fn format_selection(selection: &Selection) -> Vec<String> {
    let mut lines = vec![match &selection.base_theme {
        Some(base) => format!("Policy: {} (base theme: {})", selection.policy, base),
        None => format!("Policy: {}", selection.policy),
    }];

    for (i, assignment) in selection.combination.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            assignment.component,
            assignment.variant
        ));
        for fallback in selection
            .fallbacks
            .iter()
            .filter(|f| f.component == assignment.component)
        {
            lines.push(format!(
                "    Fallback: {} missing, using {}",
                fallback.requested, fallback.substituted
            ));
        }
    }
    lines
}

pub fn print_selection(selection: &Selection) {
    print_lines(format_selection(selection));
}

pub fn format_run_summary(summary: &RunSummary, output_dir: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Successfully imported: {}/{} components",
        summary.imported.len(),
        summary.attempted()
    )];

    if !summary.failed.is_empty() {
        lines.push("Failed:".to_string());
        for failed in &summary.failed {
            lines.push(format!(
                "    {} ({}): {}",
                failed.component, failed.variant, failed.reason
            ));
        }
    }
    if !summary.skipped.is_empty() {
        lines.push(format!("Skipped: {}", summary.skipped.join(", ")));
    }
    if !summary.warnings.is_empty() {
        lines.push("Warnings:".to_string());
        lines.extend(summary.warnings.iter().map(|w| format!("    {w}")));
    }
    lines.push(format!("Website generated in: {}", output_dir.display()));
    lines
}

pub fn print_run_summary(summary: &RunSummary, output_dir: &Path) {
    print_lines(format_run_summary(summary, output_dir));
}

// ============================================================================
// Country
// ============================================================================

pub fn format_country_report(report: &CountryReport) -> Vec<String> {
    let mut lines = vec![format!("Country: {}", report.country)];
    for kind in &report.kinds {
        match kind.copied {
            Some(n) => lines.push(format!(
                "    {}: {} \u{2192} {}",
                kind.kind,
                plural(n, "file", "files"),
                kind.destination.display()
            )),
            None => lines.push(format!(
                "    {}: source {} does not exist",
                kind.kind,
                kind.source.display()
            )),
        }
    }
    lines
}

pub fn print_country_report(report: &CountryReport) {
    print_lines(format_country_report(report));
}

// ============================================================================
// Check
// ============================================================================

pub fn format_lint_report(report: &LintReport) -> Vec<String> {
    let mut lines = Vec::new();
    for check in &report.checks {
        if check.issues.is_empty() {
            lines.push(format!("{} {}", check.status().as_str(), check.name));
            continue;
        }
        lines.push(format!(
            "{} {} ({})",
            check.status().as_str(),
            check.name,
            plural(check.issues.len(), "issue", "issues")
        ));
        for issue in &check.issues {
            lines.push(format!("    {}: {}", issue.file, issue.message));
        }
    }

    lines.push(String::new());
    lines.push(match report.total_issues() {
        0 => "No issues found".to_string(),
        n => format!("{} found", plural(n, "issue", "issues")),
    });
    lines
}

pub fn print_lint_report(report: &LintReport) {
    print_lines(format_lint_report(report));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::FailedComponent;
    use crate::catalog::ComponentStatus;
    use crate::color::Color;
    use crate::country::{Country, KindResult};
    use crate::lint::{CheckResult, Issue};
    use crate::selector::{Assignment, Combination, Fallback, MixingPolicy};
    use crate::theme::{ThemeMode, generate_theme};
    use std::path::PathBuf;

    #[test]
    fn truncate_desc_is_char_safe() {
        assert_eq!(truncate_desc("Short", 40), "Short");
        assert_eq!(truncate_desc("ééééé", 3), "ééé...");
        assert_eq!(truncate_desc(&"a".repeat(5), 5), "aaaaa");
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn catalog_report_lines() {
        let report = CatalogReport {
            components: vec![
                ComponentStatus {
                    name: "header".into(),
                    description: "Casino header".into(),
                    valid_variants: 4,
                    total_variants: 5,
                },
                ComponentStatus {
                    name: "faqs".into(),
                    description: "FAQ".into(),
                    valid_variants: 0,
                    total_variants: 1,
                },
            ],
        };
        assert_eq!(
            format_catalog_report(&report),
            vec![
                "Components",
                "001 header (4/5 variants)",
                "    Casino header",
                "002 faqs (0/1 variants)",
                "    No valid variants",
                "",
                "2 components, 1 usable",
            ]
        );
    }

    #[test]
    fn selection_lines_include_fallbacks() {
        let combination: Combination = [("header", "modern"), ("hero", "vip")].into_iter().collect();
        let selection = Selection {
            policy: MixingPolicy::Smart,
            base_theme: Some("luxury".into()),
            combination,
            fallbacks: vec![Fallback {
                component: "header".into(),
                requested: "neon".into(),
                substituted: "modern".into(),
            }],
            dropped: vec![],
        };
        assert_eq!(
            format_selection(&selection),
            vec![
                "Policy: smart (base theme: luxury)",
                "001 header \u{2192} modern",
                "    Fallback: neon missing, using modern",
                "002 hero \u{2192} vip",
            ]
        );
    }

    #[test]
    fn run_summary_counts_failures() {
        let summary = RunSummary {
            imported: vec![Assignment {
                component: "header".into(),
                variant: "modern".into(),
            }],
            failed: vec![FailedComponent {
                component: "hero".into(),
                variant: "vip".into(),
                reason: "Required HTML file not found: hero/vip.html".into(),
            }],
            skipped: vec!["faqs".into(), "about".into()],
            fallbacks: vec![],
            warnings: vec![],
        };
        let lines = format_run_summary(&summary, Path::new("web-folder"));
        assert_eq!(lines[0], "Successfully imported: 1/2 components");
        assert_eq!(lines[1], "Failed:");
        assert!(lines[2].starts_with("    hero (vip): Required HTML"));
        assert_eq!(lines[3], "Skipped: faqs, about");
        assert_eq!(lines.last().unwrap(), "Website generated in: web-folder");
    }

    #[test]
    fn theme_lines_list_tokens() {
        let theme = generate_theme(Color::from_hex("#d4af37").unwrap(), ThemeMode::Dark);
        let lines = format_theme(&theme);
        assert_eq!(lines[0], "Theme: custom-dark");
        assert_eq!(lines[1], "    Mode: dark");
        assert!(
            lines
                .iter()
                .any(|l| l.trim_start().starts_with("colors.background") && l.ends_with("#0a0a0a"))
        );
        assert_eq!(lines.len(), 3 + theme.tokens().len());
    }

    #[test]
    fn country_lines() {
        let report = CountryReport {
            country: Country::UkIr,
            kinds: vec![
                KindResult {
                    kind: "footer".into(),
                    source: PathBuf::from("master/footer/UK-IR"),
                    destination: PathBuf::from("web-folder/static/footer"),
                    copied: Some(1),
                },
                KindResult {
                    kind: "offers".into(),
                    source: PathBuf::from("master/offers/UK-IR"),
                    destination: PathBuf::from("web-folder/static/offers"),
                    copied: None,
                },
            ],
        };
        let lines = format_country_report(&report);
        assert_eq!(lines[0], "Country: UK-IR");
        assert!(lines[1].starts_with("    footer: 1 file \u{2192}"));
        assert!(lines[2].contains("does not exist"));
    }

    #[test]
    fn lint_lines() {
        let report = LintReport {
            checks: vec![
                CheckResult {
                    name: "empty_links",
                    issues: vec![],
                },
                CheckResult {
                    name: "meta_tags",
                    issues: vec![Issue {
                        file: "index.html".into(),
                        message: "missing meta tags: author".into(),
                    }],
                },
            ],
        };
        assert_eq!(
            format_lint_report(&report),
            vec![
                "PASS empty_links",
                "FAIL meta_tags (1 issue)",
                "    index.html: missing meta tags: author",
                "",
                "1 issue found",
            ]
        );
    }

    #[test]
    fn scaffold_lines() {
        let root = Path::new("web-components-v2");
        assert_eq!(format_scaffold(root, &[]).len(), 1);
        assert_eq!(
            format_scaffold(root, &["header".to_string()]),
            vec![
                "Created catalog structure in web-components-v2",
                "    header/component.json",
            ]
        );
    }
}
