//! One generation run, end to end.
//!
//! ```text
//! ThemeSource ──► Theme ─────────────────┐
//!                                        ▼
//! Catalog ──► select() ──► Combination ──► assemble() ──► write()
//! ```
//!
//! Everything a run needs is carried explicitly in a [`BuildContext`] and a
//! [`BuildRequest`]; there is no process-wide state. Per-component problems
//! are recovered and show up in the [`RunSummary`]. Only a missing catalog,
//! an unreadable theme file, [`SelectError::NoValidComponents`] or an output
//! write failure abort the run.

use crate::assemble::{AssembleError, RunSummary, SiteFiles, assemble};
use crate::catalog::{Catalog, CatalogError, canonical_order};
use crate::color::Color;
use crate::document::SiteMeta;
use crate::random::Xorshift64;
use crate::selector::{MixingPolicy, SelectError, Selection, select};
use crate::theme::{Theme, ThemeError, ThemeMode, generate_theme};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Components requested by the `essential` keyword, when available.
pub const ESSENTIAL_COMPONENTS: &[&str] = &["header", "hero", "footer"];

/// Theme file written next to `index.html` on every build.
pub const THEME_FILENAME: &str = "theme.json";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

/// Where a run's theme comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeSource {
    Generate { seed: Color, mode: ThemeMode },
    /// A theme previously saved with [`Theme::save`].
    File(PathBuf),
}

impl ThemeSource {
    pub fn resolve(&self) -> Result<Theme, ThemeError> {
        match self {
            ThemeSource::Generate { seed, mode } => Ok(generate_theme(*seed, *mode)),
            ThemeSource::File(path) => Theme::load(path),
        }
    }
}

/// Per-run environment: where to read from, where to write, what to label.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub catalog: Catalog,
    pub output_dir: PathBuf,
    pub meta: SiteMeta,
}

impl BuildContext {
    /// Fails if the catalog root doesn't exist.
    pub fn new(
        catalog_root: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        meta: SiteMeta,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            catalog: Catalog::open(catalog_root)?,
            output_dir: output_dir.into(),
            meta,
        })
    }
}

#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Component names, or the single keyword `all` / `essential`.
    pub components: Vec<String>,
    pub policy: MixingPolicy,
    pub theme: ThemeSource,
    /// Fixed seed for variant picks; clock-seeded when `None`.
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub theme: Theme,
    pub selection: Selection,
    pub summary: RunSummary,
    pub files: SiteFiles,
    pub theme_file: PathBuf,
}

/// Expand the `all` and `essential` keywords against the catalog. `all`
/// comes back in canonical order.
pub fn resolve_components(
    catalog: &Catalog,
    requested: &[String],
) -> Result<Vec<String>, CatalogError> {
    match requested {
        [keyword] if keyword.eq_ignore_ascii_case("all") => {
            Ok(canonical_order(catalog.list_components()?))
        }
        [keyword] if keyword.eq_ignore_ascii_case("essential") => {
            let available = catalog.list_components()?;
            Ok(ESSENTIAL_COMPONENTS
                .iter()
                .filter(|c| available.iter().any(|a| a == **c))
                .map(|c| c.to_string())
                .collect())
        }
        names => Ok(names.to_vec()),
    }
}

pub fn run_build(ctx: &BuildContext, request: &BuildRequest) -> Result<BuildOutcome, BuildError> {
    let theme = request.theme.resolve()?;
    info!(theme = %theme.name, mode = %theme.mode, "theme ready");

    let components = resolve_components(&ctx.catalog, &request.components)?;
    let mut rng = match request.rng_seed {
        Some(seed) => Xorshift64::new(seed),
        None => Xorshift64::from_clock(),
    };
    let selection = select(&ctx.catalog, &components, request.policy, &mut rng)?;
    info!(
        policy = %selection.policy,
        selected = selection.combination.len(),
        dropped = selection.dropped.len(),
        "combination selected"
    );

    let mut site = assemble(&ctx.catalog, &theme, &ctx.meta, &selection.combination);
    site.summary.record_selection(&selection);

    let files = site.write(&ctx.output_dir)?;
    let theme_file = theme_path(&ctx.output_dir);
    theme.save(&theme_file)?;

    Ok(BuildOutcome {
        theme,
        selection,
        summary: site.summary,
        files,
        theme_file,
    })
}

pub fn theme_path(output_dir: &Path) -> PathBuf {
    output_dir.join(THEME_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::CatalogBuilder;
    use std::fs;
    use tempfile::TempDir;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn gold_dark() -> ThemeSource {
        ThemeSource::Generate {
            seed: Color::from_hex("#d4af37").unwrap(),
            mode: ThemeMode::Dark,
        }
    }

    #[test]
    fn keywords_expand_against_catalog() {
        let catalog = CatalogBuilder::new()
            .component("header", &[("modern", "modern")])
            .component("footer", &[("minimal", "minimal")])
            .component("faqs", &[("accordion", "modern")])
            .build();

        assert_eq!(
            resolve_components(&catalog, &names(&["essential"])).unwrap(),
            vec!["header", "footer"]
        );
        assert_eq!(
            resolve_components(&catalog, &names(&["ALL"])).unwrap(),
            vec!["header", "faqs", "footer"]
        );
        assert_eq!(
            resolve_components(&catalog, &names(&["hero", "all"])).unwrap(),
            vec!["hero", "all"]
        );
    }

    #[test]
    fn full_run_writes_site_and_theme() {
        let catalog = CatalogBuilder::new()
            .component("header", &[("modern", "modern"), ("luxury", "luxury")])
            .component("hero", &[("welcome", "modern")])
            .component("footer", &[("minimal", "minimal")])
            .without_html("header", "luxury")
            .build();
        let out = TempDir::new().unwrap();
        let ctx = BuildContext {
            catalog: (*catalog).clone(),
            output_dir: out.path().to_path_buf(),
            meta: SiteMeta::default(),
        };

        let outcome = run_build(
            &ctx,
            &BuildRequest {
                components: names(&["header", "hero", "footer"]),
                policy: MixingPolicy::Single,
                theme: gold_dark(),
                rng_seed: Some(1),
            },
        )
        .unwrap();

        assert_eq!(outcome.summary.imported.len(), 3);
        assert_eq!(outcome.selection.combination.get("header"), Some("modern"));
        assert!(outcome.files.html.is_file());
        assert_eq!(Theme::load(&outcome.theme_file).unwrap(), outcome.theme);

        let css = fs::read_to_string(&outcome.files.css).unwrap();
        assert!(css.contains("--color-background: #0a0a0a;"));
    }

    #[test]
    fn saved_theme_is_reused() {
        let catalog = CatalogBuilder::new()
            .component("hero", &[("welcome", "modern")])
            .build();
        let out = TempDir::new().unwrap();
        let saved = out.path().join("saved.json");
        let theme = generate_theme(Color::from_hex("#3366cc").unwrap(), ThemeMode::Light);
        theme.save(&saved).unwrap();

        let ctx = BuildContext {
            catalog: (*catalog).clone(),
            output_dir: out.path().join("site"),
            meta: SiteMeta::default(),
        };
        let outcome = run_build(
            &ctx,
            &BuildRequest {
                components: names(&["hero"]),
                policy: MixingPolicy::Wild,
                theme: ThemeSource::File(saved),
                rng_seed: Some(9),
            },
        )
        .unwrap();

        assert_eq!(outcome.theme, theme);
    }

    #[test]
    fn nothing_valid_aborts_without_writing() {
        let catalog = CatalogBuilder::new()
            .component("header", &[("modern", "modern")])
            .without_html("header", "modern")
            .build();
        let out = TempDir::new().unwrap();
        let ctx = BuildContext {
            catalog: (*catalog).clone(),
            output_dir: out.path().join("site"),
            meta: SiteMeta::default(),
        };

        let err = run_build(
            &ctx,
            &BuildRequest {
                components: names(&["header"]),
                policy: MixingPolicy::Smart,
                theme: gold_dark(),
                rng_seed: Some(4),
            },
        )
        .unwrap_err();

        assert!(matches!(
            err,
            BuildError::Select(SelectError::NoValidComponents(_))
        ));
        assert!(!out.path().join("site").exists());
    }

    #[test]
    fn fixture_catalog_builds_under_every_policy() {
        let tmp = crate::test_helpers::setup_fixtures();
        let ctx = BuildContext::new(
            tmp.path().join("components"),
            tmp.path().join("site"),
            SiteMeta::default(),
        )
        .unwrap();

        for policy in [MixingPolicy::Single, MixingPolicy::Smart, MixingPolicy::Wild] {
            let outcome = run_build(
                &ctx,
                &BuildRequest {
                    components: names(&["all"]),
                    policy,
                    theme: gold_dark(),
                    rng_seed: Some(21),
                },
            )
            .unwrap();

            // offers has no variant with HTML; header's only valid one is modern.
            assert_eq!(outcome.summary.skipped, vec!["offers"]);
            assert_eq!(outcome.selection.combination.get("header"), Some("modern"));
            assert_eq!(outcome.summary.imported.len(), 3);
            assert!(outcome.summary.failed.is_empty());
        }
    }

    #[test]
    fn missing_catalog_root() {
        let tmp = TempDir::new().unwrap();
        let err = BuildContext::new(tmp.path().join("nope"), tmp.path(), SiteMeta::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::RootNotFound(_)));
    }

    #[test]
    fn dropped_components_reach_the_summary() {
        let catalog = CatalogBuilder::new()
            .component("header", &[("modern", "modern")])
            .component("hero", &[("welcome", "modern")])
            .without_html("header", "modern")
            .build();
        let out = TempDir::new().unwrap();
        let ctx = BuildContext {
            catalog: (*catalog).clone(),
            output_dir: out.path().to_path_buf(),
            meta: SiteMeta::default(),
        };

        let outcome = run_build(
            &ctx,
            &BuildRequest {
                components: names(&["header", "hero"]),
                policy: MixingPolicy::Wild,
                theme: gold_dark(),
                rng_seed: Some(2),
            },
        )
        .unwrap();

        assert_eq!(outcome.summary.skipped, vec!["header"]);
        let html = fs::read_to_string(&outcome.files.html).unwrap();
        assert!(!html.contains("Header Component Start"));
        assert!(html.contains("<!-- Hero Component Start -->"));
    }
}
