//! Document assembly: turns a [`Combination`] and a [`Theme`] into the three
//! site outputs.
//!
//! ## Output Layout
//!
//! ```text
//! web-folder/
//! ├── index.html          # Skeleton + component fragments
//! ├── css/styles.css      # Theme variables, base styles, component styles
//! └── js/main.js          # Base runtime, component scripts
//! ```
//!
//! ## Processing
//!
//! Components are processed in canonical order (see
//! [`COMPONENT_ORDER`](crate::catalog::COMPONENT_ORDER)). For each one:
//!
//! 1. HTML is re-checked and read. If it is missing the component fails:
//!    it is recorded in the [`RunSummary`] and nothing of it is emitted,
//!    even when its CSS or JS exist.
//! 2. The fragment is placed in the [`PageDocument`] by component type.
//! 3. CSS and JS, when present, are appended to the shared buffers under a
//!    header comment. A read failure here is a warning; the HTML stays.
//!
//! Nothing here is random: the same combination and theme always produce
//! byte-identical output.

use crate::catalog::{AssetKind, Catalog, canonical_order};
use crate::document::{PageDocument, SiteMeta};
use crate::selector::{Assignment, Combination, Fallback, Selection};
use crate::theme::Theme;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const BASE_CSS: &str = include_str!("../static/base.css");
const BASE_JS: &str = include_str!("../static/main.js");

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("Required HTML file not found: {0}")]
    MissingAsset(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A component that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedComponent {
    pub component: String,
    pub variant: String,
    pub reason: String,
}

/// Per-run record of what happened to every requested component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub imported: Vec<Assignment>,
    pub failed: Vec<FailedComponent>,
    /// Dropped by the selector: no variant with HTML.
    pub skipped: Vec<String>,
    pub fallbacks: Vec<Fallback>,
    /// Soft CSS/JS problems for components that were still imported.
    pub warnings: Vec<String>,
}

impl RunSummary {
    /// Components that reached the assembler.
    pub fn attempted(&self) -> usize {
        self.imported.len() + self.failed.len()
    }

    /// Fold in what the selector already decided.
    pub fn record_selection(&mut self, selection: &Selection) {
        self.skipped.extend(selection.dropped.iter().cloned());
        self.fallbacks.extend(selection.fallbacks.iter().cloned());
    }
}

/// The assembled, not yet written, site.
#[derive(Debug, Clone)]
pub struct AssembledSite {
    pub meta: SiteMeta,
    pub document: PageDocument,
    pub css: String,
    pub js: String,
    pub summary: RunSummary,
}

/// Paths written by [`AssembledSite::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteFiles {
    pub html: PathBuf,
    pub css: PathBuf,
    pub js: PathBuf,
}

impl AssembledSite {
    pub fn html(&self) -> String {
        self.document.to_html(&self.meta)
    }

    /// Write `index.html`, `css/styles.css` and `js/main.js`, overwriting
    /// any previous run.
    pub fn write(&self, output_dir: &Path) -> Result<SiteFiles, AssembleError> {
        let files = SiteFiles {
            html: output_dir.join("index.html"),
            css: output_dir.join("css").join("styles.css"),
            js: output_dir.join("js").join("main.js"),
        };
        fs::create_dir_all(output_dir.join("css"))?;
        fs::create_dir_all(output_dir.join("js"))?;

        fs::write(&files.html, self.html())?;
        fs::write(&files.css, &self.css)?;
        fs::write(&files.js, &self.js)?;
        info!(output = %output_dir.display(), "site written");
        Ok(files)
    }
}

/// Base stylesheet: theme variables followed by the shared base styles.
pub fn base_css(theme: &Theme) -> String {
    format!("{}\n\n{}", theme.to_css().trim_end(), BASE_CSS)
}

pub fn base_js() -> String {
    BASE_JS.to_string()
}

pub fn assemble(
    catalog: &Catalog,
    theme: &Theme,
    meta: &SiteMeta,
    combination: &Combination,
) -> AssembledSite {
    let mut site = AssembledSite {
        meta: meta.clone(),
        document: PageDocument::new(),
        css: base_css(theme),
        js: base_js(),
        summary: RunSummary::default(),
    };

    let ordered = canonical_order(combination.iter().map(|a| a.component.as_str()));
    info!(count = ordered.len(), "importing components");

    for component in ordered {
        let Some(variant) = combination.get(component) else {
            continue;
        };
        match import_component(catalog, component, variant, &mut site) {
            Ok(()) => {
                debug!(component, variant, "imported");
                site.summary.imported.push(Assignment {
                    component: component.to_string(),
                    variant: variant.to_string(),
                });
            }
            Err(err) => {
                warn!(component, variant, error = %err, "component failed");
                site.summary.failed.push(FailedComponent {
                    component: component.to_string(),
                    variant: variant.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }

    site
}

fn import_component(
    catalog: &Catalog,
    component: &str,
    variant: &str,
    site: &mut AssembledSite,
) -> Result<(), AssembleError> {
    let html_path = catalog.asset_path(component, variant, AssetKind::Html);
    if !html_path.is_file() {
        return Err(AssembleError::MissingAsset(html_path));
    }
    let html = fs::read_to_string(&html_path)?;
    site.document.place(component, &html);

    if let Some(css) = read_optional(catalog, component, variant, AssetKind::Css, site) {
        site.css
            .push_str(&format!("\n\n/* Component Styles: {component} ({variant}) */\n{css}"));
    }
    if let Some(js) = read_optional(catalog, component, variant, AssetKind::Js, site) {
        site.js
            .push_str(&format!("\n\n// Component Script: {component} ({variant})\n{js}"));
    }
    Ok(())
}

/// Read an optional asset. Absence is silent; a read failure is recorded as
/// a warning.
fn read_optional(
    catalog: &Catalog,
    component: &str,
    variant: &str,
    kind: AssetKind,
    site: &mut AssembledSite,
) -> Option<String> {
    let path = catalog.asset_path(component, variant, kind);
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(content) => Some(content),
        Err(err) => {
            warn!(component, path = %path.display(), error = %err, "skipping asset");
            site.summary.warnings.push(format!(
                "{component} ({variant}): could not read {}: {err}",
                kind.extension()
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::document::LEGAL_NOTICE_MARKER;
    use crate::test_helpers::CatalogBuilder;
    use crate::theme::{ThemeMode, generate_theme};
    use tempfile::TempDir;

    fn theme() -> Theme {
        generate_theme(Color::from_hex("#d4af37").unwrap(), ThemeMode::Dark)
    }

    fn combo(pairs: &[(&str, &str)]) -> Combination {
        pairs.iter().copied().collect()
    }

    #[test]
    fn components_land_in_canonical_order() {
        let catalog = CatalogBuilder::new()
            .component("header", &[("modern", "modern")])
            .component("hero", &[("welcome", "modern")])
            .component("faqs", &[("accordion", "modern")])
            .component("footer", &[("minimal", "minimal")])
            .build();

        let site = assemble(
            &catalog,
            &theme(),
            &SiteMeta::default(),
            &combo(&[
                ("footer", "minimal"),
                ("faqs", "accordion"),
                ("hero", "welcome"),
                ("header", "modern"),
            ]),
        );

        assert_eq!(
            site.document.components(),
            vec!["header", "hero", "faqs", "footer"]
        );
        let imported: Vec<&str> = site
            .summary
            .imported
            .iter()
            .map(|a| a.component.as_str())
            .collect();
        assert_eq!(imported, vec!["header", "hero", "faqs", "footer"]);

        let header_css = site.css.find(".header-modern").unwrap();
        let footer_css = site.css.find(".footer-minimal").unwrap();
        assert!(header_css < footer_css);
        assert!(site.css.starts_with("/* Custom dark theme (#d4af37) */"));
        assert!(site.css.contains(".legal-notice"));
        assert!(site.js.contains("// Component Script: hero (welcome)\nconsole.log('hero welcome');"));
    }

    #[test]
    fn unlisted_component_sits_above_footer() {
        let catalog = CatalogBuilder::new()
            .component("header", &[("modern", "modern")])
            .component("promo", &[("banner", "modern")])
            .component("footer", &[("minimal", "minimal")])
            .build();

        let site = assemble(
            &catalog,
            &theme(),
            &SiteMeta::default(),
            &combo(&[("header", "modern"), ("promo", "banner"), ("footer", "minimal")]),
        );

        assert_eq!(site.document.components(), vec!["header", "promo", "footer"]);
        let html = site.html();
        let footer_end = html.find("<!-- Footer Component End -->").unwrap();
        let legal = html.find(LEGAL_NOTICE_MARKER).unwrap();
        assert!(!html[footer_end..legal].contains("Promo Component Start"));
    }

    #[test]
    fn missing_html_fails_component_even_with_css() {
        let catalog = CatalogBuilder::new()
            .component("header", &[("modern", "modern")])
            .component("hero", &[("jackpot", "neon")])
            .without_html("hero", "jackpot")
            .build();

        let site = assemble(
            &catalog,
            &theme(),
            &SiteMeta::default(),
            &combo(&[("header", "modern"), ("hero", "jackpot")]),
        );

        assert_eq!(site.summary.imported.len(), 1);
        assert_eq!(site.summary.failed.len(), 1);
        assert_eq!(site.summary.failed[0].component, "hero");
        assert!(site.summary.failed[0].reason.contains("jackpot.html"));
        assert!(!site.css.contains(".hero-jackpot"));
        assert!(!site.js.contains("hero jackpot"));
        assert!(!site.html().contains("Hero Component Start"));
    }

    #[test]
    fn absent_css_and_js_are_not_failures() {
        let catalog = CatalogBuilder::new()
            .component("offers", &[("grid", "modern")])
            .without_css("offers", "grid")
            .without_js("offers", "grid")
            .build();

        let site = assemble(
            &catalog,
            &theme(),
            &SiteMeta::default(),
            &combo(&[("offers", "grid")]),
        );

        assert_eq!(site.summary.imported.len(), 1);
        assert!(site.summary.warnings.is_empty());
        assert!(!site.css.contains("Component Styles"));
        assert!(site.html().contains("<!-- Offers Component Start -->"));
    }

    #[test]
    fn unreadable_css_is_a_warning_only() {
        let fixture = CatalogBuilder::new()
            .component("offers", &[("grid", "modern")])
            .without_css("offers", "grid");
        // A directory where the stylesheet should be cannot be read as text.
        fs::create_dir_all(fixture.path().join("offers").join("grid.css")).unwrap();
        let catalog = fixture.build();

        let site = assemble(
            &catalog,
            &theme(),
            &SiteMeta::default(),
            &combo(&[("offers", "grid")]),
        );

        assert_eq!(site.summary.imported.len(), 1);
        assert_eq!(site.summary.warnings.len(), 1);
        assert!(site.summary.warnings[0].starts_with("offers (grid)"));
        assert!(site.js.contains("offers grid"));
    }

    #[test]
    fn same_inputs_same_bytes() {
        let catalog = CatalogBuilder::new()
            .component("header", &[("modern", "modern")])
            .component("hero", &[("welcome", "modern")])
            .component("footer", &[("minimal", "minimal")])
            .build();
        let combination = combo(&[("header", "modern"), ("hero", "welcome"), ("footer", "minimal")]);

        let a = assemble(&catalog, &theme(), &SiteMeta::default(), &combination);
        let b = assemble(&catalog, &theme(), &SiteMeta::default(), &combination);

        assert_eq!(a.html(), b.html());
        assert_eq!(a.css, b.css);
        assert_eq!(a.js, b.js);
    }

    #[test]
    fn write_creates_layout_and_overwrites() {
        let catalog = CatalogBuilder::new()
            .component("header", &[("modern", "modern")])
            .build();
        let out = TempDir::new().unwrap();
        let site = assemble(
            &catalog,
            &theme(),
            &SiteMeta::default(),
            &combo(&[("header", "modern")]),
        );

        fs::create_dir_all(out.path().join("css")).unwrap();
        fs::write(out.path().join("css/styles.css"), "stale").unwrap();

        let files = site.write(out.path()).unwrap();
        assert_eq!(files.html, out.path().join("index.html"));
        assert_eq!(fs::read_to_string(&files.css).unwrap(), site.css);
        assert_eq!(fs::read_to_string(&files.js).unwrap(), site.js);
        assert!(
            fs::read_to_string(&files.html)
                .unwrap()
                .contains("<!-- Header Component Start -->")
        );
    }
}
