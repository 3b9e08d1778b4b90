//! Shared test utilities for the site-forge test suite.
//!
//! Provides a throwaway component catalog builder and fixture setup that work
//! with catalog-level data structures (`Catalog`, `ComponentDescriptor`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let catalog = CatalogBuilder::new()
//!     .component("header", &[("modern", "modern"), ("luxury", "luxury")])
//!     .without_html("header", "luxury")
//!     .build();
//!
//! assert_eq!(catalog.valid_variants("header").len(), 1);
//! ```

use std::fs;
use std::ops::Deref;
use std::path::Path;
use tempfile::TempDir;

use crate::catalog::{AssetKind, Catalog, DESCRIPTOR_FILENAME};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/` to a temp directory and return it.
///
/// The copy contains `components/` (a small catalog) and `master/` (country
/// legal content), so tests can mutate it freely.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Catalog builder
// =========================================================================

/// Writes descriptors and variant assets into a fresh temp directory.
///
/// Every variant added with [`CatalogBuilder::component`] gets an HTML, CSS
/// and JS file whose content names the component and variant, e.g.
/// `<section class="hero-welcome">hero welcome</section>`.
pub struct CatalogBuilder {
    tmp: TempDir,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            tmp: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.tmp.path()
    }

    /// Add a component with `(variant, theme)` pairs and all three assets.
    pub fn component(self, name: &str, variants: &[(&str, &str)]) -> Self {
        let entries: Vec<String> = variants
            .iter()
            .map(|(variant, theme)| {
                format!(
                    r#"{{"name": "{variant}", "description": "{name} {variant}", "theme": "{theme}"}}"#
                )
            })
            .collect();
        self.write_descriptor(
            name,
            &format!(
                r#"{{"description": "{name} component", "category": "content", "variants": [{}]}}"#,
                entries.join(", ")
            ),
        );

        for (variant, _) in variants {
            self.write_asset(
                name,
                variant,
                AssetKind::Html,
                &format!(r#"<section class="{name}-{variant}">{name} {variant}</section>"#),
            );
            self.write_asset(
                name,
                variant,
                AssetKind::Css,
                &format!(".{name}-{variant} {{ color: var(--color-text); }}"),
            );
            self.write_asset(
                name,
                variant,
                AssetKind::Js,
                &format!("console.log('{name} {variant}');"),
            );
        }
        self
    }

    /// A directory with no descriptor.
    pub fn raw_dir(self, name: &str) -> Self {
        fs::create_dir_all(self.tmp.path().join(name)).unwrap();
        self
    }

    pub fn without_html(self, component: &str, variant: &str) -> Self {
        self.remove(component, variant, AssetKind::Html)
    }

    pub fn without_css(self, component: &str, variant: &str) -> Self {
        self.remove(component, variant, AssetKind::Css)
    }

    pub fn without_js(self, component: &str, variant: &str) -> Self {
        self.remove(component, variant, AssetKind::Js)
    }

    /// Write `component.json` verbatim, creating the directory.
    pub fn write_descriptor(&self, name: &str, json: &str) {
        let dir = self.tmp.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DESCRIPTOR_FILENAME), json).unwrap();
    }

    pub fn write_asset(&self, component: &str, variant: &str, kind: AssetKind, content: &str) {
        let dir = self.tmp.path().join(component);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{variant}.{}", kind.extension())), content).unwrap();
    }

    fn remove(self, component: &str, variant: &str, kind: AssetKind) -> Self {
        let path = self
            .tmp
            .path()
            .join(component)
            .join(format!("{variant}.{}", kind.extension()));
        fs::remove_file(path).unwrap();
        self
    }

    pub fn build(self) -> TestCatalog {
        let catalog = Catalog::new(self.tmp.path());
        TestCatalog {
            _tmp: self.tmp,
            catalog,
        }
    }
}

/// A [`Catalog`] that owns its temp directory.
pub struct TestCatalog {
    _tmp: TempDir,
    catalog: Catalog,
}

impl Deref for TestCatalog {
    type Target = Catalog;

    fn deref(&self) -> &Catalog {
        &self.catalog
    }
}
