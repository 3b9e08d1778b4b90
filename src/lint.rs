//! Heuristic checks over a generated site.
//!
//! These are pattern matches and bracket counts, not parsers. A PASS means
//! none of the heuristics fired; it says nothing about validity.
//!
//! | Check | Files | Fires on |
//! |-------|-------|----------|
//! | `empty_links` | html | `href=""` or `href="#"` |
//! | `css_links` | html | linked local stylesheet that doesn't exist |
//! | `meta_tags` | html | missing charset, viewport, description or author |
//! | `logos_favicons` | html, root | no `favicon.ico`; page without logo markup |
//! | `html_syntax` | html | closing tag that skips an open element |
//! | `css_syntax` | css | unequal `{` / `}` counts |
//! | `js_syntax` | js | unequal `(` / `)` or `{` / `}` counts |
//! | `compliance` | html | no age notice, responsible-gambling or terms mention |
//! | `responsive` | css | no responsive indicator at all |
//!
//! Files are never modified.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid lint pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Output directory not found: {0}")]
    MissingOutput(PathBuf),
}

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const COMPLIANCE: &[(&str, &[&str])] = &[
    (
        "Age Verification",
        &[r"18\+", r"21\+", r"age.verification", r"must.be.*years"],
    ),
    (
        "Responsible Gambling",
        &[r"responsible.gambling", r"gamble.responsibly", r"gambling.problem"],
    ),
    (
        "Terms and Conditions",
        &[r"terms.*conditions", r"terms.*service", r"T&C"],
    ),
];

const RESPONSIVE_INDICATORS: &[&str] = &[
    "@media",
    "max-width",
    "min-width",
    "viewport",
    "mobile",
    "tablet",
    "desktop",
];

const FAVICON_PATHS: &[&str] = &[
    "favicon.ico",
    "static/images/favicon.ico",
    "static/images/icons/favicon.ico",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl CheckStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Path relative to the site root, `/`-separated.
    pub file: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: &'static str,
    pub issues: Vec<Issue>,
}

impl CheckResult {
    pub fn status(&self) -> CheckStatus {
        if self.issues.is_empty() {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintReport {
    pub checks: Vec<CheckResult>,
}

impl LintReport {
    pub fn total_issues(&self) -> usize {
        self.checks.iter().map(|c| c.issues.len()).sum()
    }

    pub fn passed(&self) -> bool {
        self.total_issues() == 0
    }

    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }
}

struct Patterns {
    href: Regex,
    css_link: Regex,
    meta: [(&'static str, Regex); 4],
    logo: [Regex; 3],
    comment: Regex,
    script: Regex,
    style: Regex,
    tag: Regex,
    compliance: Vec<(&'static str, Vec<Regex>)>,
}

impl Patterns {
    fn new() -> Result<Self, regex::Error> {
        let compliance = COMPLIANCE
            .iter()
            .map(|(name, patterns)| -> Result<_, regex::Error> {
                let compiled = patterns
                    .iter()
                    .map(|p| Regex::new(&format!("(?i){p}")))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((*name, compiled))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            href: Regex::new(r#"(?i)href\s*=\s*["']([^"']*)["']"#)?,
            css_link: Regex::new(r#"(?i)<link[^>]*href\s*=\s*["']([^"']*\.css)["'][^>]*>"#)?,
            meta: [
                ("charset", Regex::new(r"(?i)<meta[^>]*charset[^>]*>")?),
                (
                    "viewport",
                    Regex::new(r#"(?i)<meta[^>]*name\s*=\s*["']viewport["'][^>]*>"#)?,
                ),
                (
                    "description",
                    Regex::new(r#"(?i)<meta[^>]*name\s*=\s*["']description["'][^>]*>"#)?,
                ),
                (
                    "author",
                    Regex::new(r#"(?i)<meta[^>]*name\s*=\s*["']author["'][^>]*>"#)?,
                ),
            ],
            logo: [
                Regex::new(r#"(?i)class\s*=\s*["'][^"']*logo[^"']*["']"#)?,
                Regex::new(r#"(?i)<img[^>]*alt\s*=\s*["'][^"']*logo[^"']*["'][^>]*>"#)?,
                Regex::new(r#"(?i)<img[^>]*src\s*=\s*["'][^"']*logo[^"']*["'][^>]*>"#)?,
            ],
            comment: Regex::new(r"(?s)<!--.*?-->")?,
            script: Regex::new(r"(?is)(<script\b[^>]*>).*?(</script\s*>)")?,
            style: Regex::new(r"(?is)(<style\b[^>]*>).*?(</style\s*>)")?,
            tag: Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)\b[^>]*?(/?)>")?,
            compliance,
        })
    }
}

struct SiteFile {
    relative: String,
    content: String,
}

/// Run every check over the site rooted at `site_dir`.
pub fn check_site(site_dir: &Path) -> Result<LintReport, LintError> {
    if !site_dir.is_dir() {
        return Err(LintError::MissingOutput(site_dir.to_path_buf()));
    }
    let patterns = Patterns::new()?;

    let (html, unreadable_html) = collect(site_dir, "html")?;
    let (css, unreadable_css) = collect(site_dir, "css")?;
    let (js, unreadable_js) = collect(site_dir, "js")?;
    debug!(
        html = html.len(),
        css = css.len(),
        js = js.len(),
        "linting site files"
    );

    let checks = vec![
        check_empty_links(&patterns, &html),
        check_css_links(&patterns, site_dir, &html),
        check_meta_tags(&patterns, &html),
        check_logos_and_favicons(&patterns, site_dir, &html),
        with_issues(check_html_syntax(&patterns, &html), unreadable_html),
        with_issues(check_css_syntax(&css), unreadable_css),
        with_issues(check_js_syntax(&js), unreadable_js),
        check_compliance(&patterns, &html),
        check_responsive(&css),
    ];
    Ok(LintReport { checks })
}

/// Files with `extension` under `root`, plus one issue per file that could
/// not be read as UTF-8 text.
fn collect(root: &Path, extension: &str) -> Result<(Vec<SiteFile>, Vec<Issue>), LintError> {
    let mut files = Vec::new();
    let mut unreadable = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(extension)
        {
            continue;
        }
        let relative = path
            .strip_prefix(root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        match fs::read_to_string(path) {
            Ok(content) => files.push(SiteFile { relative, content }),
            Err(err) => {
                warn!(file = %relative, error = %err, "unreadable site file");
                unreadable.push(Issue {
                    file: relative,
                    message: format!("could not read file: {err}"),
                });
            }
        }
    }
    Ok((files, unreadable))
}

fn with_issues(mut result: CheckResult, extra: Vec<Issue>) -> CheckResult {
    result.issues.extend(extra);
    result
}

fn issue(file: &SiteFile, message: impl Into<String>) -> Issue {
    Issue {
        file: file.relative.clone(),
        message: message.into(),
    }
}

/// 1-based line of the first occurrence of `needle`, 0 when absent.
fn line_of(content: &str, needle: &str) -> usize {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map_or(0, |i| i + 1)
}

fn check_empty_links(patterns: &Patterns, html: &[SiteFile]) -> CheckResult {
    let mut issues = Vec::new();
    for file in html {
        for cap in patterns.href.captures_iter(&file.content) {
            let target = &cap[1];
            if target.is_empty() || target == "#" {
                let line = line_of(&file.content, &cap[0]);
                issues.push(issue(file, format!("line {line}: empty link href=\"{target}\"")));
            }
        }
    }
    CheckResult {
        name: "empty_links",
        issues,
    }
}

fn check_css_links(patterns: &Patterns, root: &Path, html: &[SiteFile]) -> CheckResult {
    let mut issues = Vec::new();
    for file in html {
        for cap in patterns.css_link.captures_iter(&file.content) {
            let href = &cap[1];
            if href.contains("://") || href.starts_with("//") {
                continue;
            }
            if !root.join(href.trim_start_matches('/')).is_file() {
                issues.push(issue(file, format!("missing stylesheet {href}")));
            }
        }
    }
    CheckResult {
        name: "css_links",
        issues,
    }
}

fn check_meta_tags(patterns: &Patterns, html: &[SiteFile]) -> CheckResult {
    let issues = html
        .iter()
        .filter_map(|file| {
            let missing: Vec<&str> = patterns
                .meta
                .iter()
                .filter(|(_, re)| !re.is_match(&file.content))
                .map(|(name, _)| *name)
                .collect();
            (!missing.is_empty())
                .then(|| issue(file, format!("missing meta tags: {}", missing.join(", "))))
        })
        .collect();
    CheckResult {
        name: "meta_tags",
        issues,
    }
}

fn check_logos_and_favicons(patterns: &Patterns, root: &Path, html: &[SiteFile]) -> CheckResult {
    let mut issues = Vec::new();
    if !FAVICON_PATHS.iter().any(|p| root.join(p).is_file()) {
        issues.push(Issue {
            file: ".".to_string(),
            message: "no favicon.ico found".to_string(),
        });
    }
    for file in html {
        if !patterns.logo.iter().any(|re| re.is_match(&file.content)) {
            issues.push(issue(file, "no logo elements found"));
        }
    }
    CheckResult {
        name: "logos_favicons",
        issues,
    }
}

/// Tag-stack scan. Comments and script/style bodies are blanked first;
/// void and self-closed elements never open. A closing tag that matches an
/// element deeper in the stack is reported and the stack is left alone.
fn html_tag_errors(patterns: &Patterns, content: &str) -> Vec<String> {
    let stripped = patterns.comment.replace_all(content, "");
    let stripped = patterns.script.replace_all(&stripped, "$1$2");
    let stripped = patterns.style.replace_all(&stripped, "$1$2");

    let mut stack: Vec<String> = Vec::new();
    let mut errors = Vec::new();
    for cap in patterns.tag.captures_iter(&stripped) {
        let closing = !cap[1].is_empty();
        let self_closed = !cap[3].is_empty();
        let name = cap[2].to_ascii_lowercase();

        if closing {
            if stack.last() == Some(&name) {
                stack.pop();
            } else if stack.contains(&name) {
                errors.push(format!("Mismatched closing tag: {name}"));
            }
        } else if !self_closed && !VOID_ELEMENTS.contains(&name.as_str()) {
            stack.push(name);
        }
    }
    errors
}

fn check_html_syntax(patterns: &Patterns, html: &[SiteFile]) -> CheckResult {
    let issues = html
        .iter()
        .flat_map(|file| {
            html_tag_errors(patterns, &file.content)
                .into_iter()
                .map(move |e| issue(file, e))
        })
        .collect();
    CheckResult {
        name: "html_syntax",
        issues,
    }
}

fn count_pair(content: &str, open: char, close: char) -> Option<(usize, usize)> {
    let opened = content.matches(open).count();
    let closed = content.matches(close).count();
    (opened != closed).then_some((opened, closed))
}

fn check_css_syntax(css: &[SiteFile]) -> CheckResult {
    let issues = css
        .iter()
        .filter_map(|file| {
            count_pair(&file.content, '{', '}').map(|(o, c)| {
                issue(file, format!("Unmatched braces: {o} open, {c} close"))
            })
        })
        .collect();
    CheckResult {
        name: "css_syntax",
        issues,
    }
}

fn check_js_syntax(js: &[SiteFile]) -> CheckResult {
    let mut issues = Vec::new();
    for file in js {
        if let Some((o, c)) = count_pair(&file.content, '(', ')') {
            issues.push(issue(file, format!("Unmatched parentheses: {o} open, {c} close")));
        }
        if let Some((o, c)) = count_pair(&file.content, '{', '}') {
            issues.push(issue(file, format!("Unmatched braces: {o} open, {c} close")));
        }
    }
    CheckResult {
        name: "js_syntax",
        issues,
    }
}

fn check_compliance(patterns: &Patterns, html: &[SiteFile]) -> CheckResult {
    let issues = html
        .iter()
        .filter_map(|file| {
            let missing: Vec<&str> = patterns
                .compliance
                .iter()
                .filter(|(_, res)| !res.iter().any(|re| re.is_match(&file.content)))
                .map(|(name, _)| *name)
                .collect();
            (!missing.is_empty())
                .then(|| issue(file, format!("missing compliance: {}", missing.join(", "))))
        })
        .collect();
    CheckResult {
        name: "compliance",
        issues,
    }
}

fn check_responsive(css: &[SiteFile]) -> CheckResult {
    let issues = css
        .iter()
        .filter(|file| {
            let lower = file.content.to_ascii_lowercase();
            !RESPONSIVE_INDICATORS.iter().any(|i| lower.contains(i))
        })
        .map(|file| issue(file, "no responsive design indicators found"))
        .collect();
    CheckResult {
        name: "responsive",
        issues,
    }
}
