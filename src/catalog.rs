//! Component catalog: per-component descriptors and their variant assets.
//!
//! ## Directory Structure
//!
//! ```text
//! web-components-v2/               # Catalog root
//! ├── header/
//! │   ├── component.json           # Descriptor (required to be listed)
//! │   ├── modern.html              # Variant "modern" (HTML required)
//! │   ├── modern.css               # optional
//! │   ├── modern.js                # optional
//! │   └── luxury.html
//! ├── hero/
//! │   └── ...
//! └── drafts/                      # No component.json: not a component
//! ```
//!
//! ## Descriptor Format
//!
//! ```json
//! {
//!   "name": "header",
//!   "description": "Professional casino header with navigation",
//!   "category": "navigation",
//!   "variants": [
//!     { "name": "modern", "description": "Gradient header", "theme": "modern" },
//!     { "name": "luxury", "description": "Gold header", "theme": "luxury" }
//!   ]
//! }
//! ```
//!
//! Every key is optional. A variant without `theme` belongs to `"modern"`;
//! a descriptor without `variants` has none. Unknown keys (`version`,
//! `dependencies`, per-variant `html`/`css`/`js` filenames, …) are ignored:
//! asset filenames are always `{variant}.html|css|js`.
//!
//! ## Validity
//!
//! A variant is *valid* only while its HTML file exists. Files can be
//! partially present, so validity is re-checked wherever it matters
//! (listing, selection, insertion) rather than cached at load time.
//!
//! ## Degradation
//!
//! A malformed descriptor never aborts catalog loading. [`Catalog::load_descriptor`]
//! logs the parse error and returns a placeholder with no variants, which the
//! selector then drops like any other component without valid variants.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Filename of the per-component descriptor.
pub const DESCRIPTOR_FILENAME: &str = "component.json";

/// Theme-affinity tag assumed for variants that don't declare one.
pub const DEFAULT_VARIANT_THEME: &str = "modern";

/// Canonical processing and insertion order. Components outside this list
/// follow in discovery order.
pub const COMPONENT_ORDER: &[&str] = &[
    "header",
    "hero",
    "offers",
    "details_comparison",
    "why_us",
    "about",
    "history",
    "guide",
    "faqs",
    "footer",
];

const PLACEHOLDER_DESCRIPTION: &str = "Component information unavailable";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid descriptor for component '{component}': {source}")]
    DescriptorParse {
        component: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Component catalog not found: {0}")]
    RootNotFound(PathBuf),
}

/// Parsed `component.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Directory name. Filled from the directory, not trusted from the file.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl ComponentDescriptor {
    fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            category: String::new(),
            variants: Vec::new(),
        }
    }

    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Theme-affinity tag used by smart mixing.
    #[serde(default = "default_variant_theme")]
    pub theme: String,
}

fn default_variant_theme() -> String {
    DEFAULT_VARIANT_THEME.to_string()
}

/// One of the three files backing a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Html,
    Css,
    Js,
}

impl AssetKind {
    pub fn extension(self) -> &'static str {
        match self {
            AssetKind::Html => "html",
            AssetKind::Css => "css",
            AssetKind::Js => "js",
        }
    }
}

/// A component catalog rooted at a directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Like [`Catalog::new`], but fails if the root directory is absent.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CatalogError::RootNotFound(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `{component}/{variant}.{ext}`.
    pub fn asset_path(&self, component: &str, variant: &str, kind: AssetKind) -> PathBuf {
        self.root
            .join(component)
            .join(format!("{variant}.{}", kind.extension()))
    }

    /// Whether the variant's required HTML file currently exists.
    pub fn has_html(&self, component: &str, variant: &str) -> bool {
        self.asset_path(component, variant, AssetKind::Html).is_file()
    }

    /// Component directories that contain a descriptor file, sorted by name.
    ///
    /// Hidden directories and directories without `component.json` are
    /// skipped. A missing root yields an empty list.
    pub fn list_components(&self) -> Result<Vec<String>, CatalogError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir() && p.join(DESCRIPTOR_FILENAME).is_file())
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .filter(|name| !name.starts_with('.'))
            .collect();

        names.sort();
        Ok(names)
    }

    /// Parse a component's descriptor, surfacing parse failures.
    pub fn try_load_descriptor(&self, name: &str) -> Result<ComponentDescriptor, CatalogError> {
        let path = self.root.join(name).join(DESCRIPTOR_FILENAME);
        let content = fs::read_to_string(&path)?;
        let mut descriptor: ComponentDescriptor =
            serde_json::from_str(&content).map_err(|source| CatalogError::DescriptorParse {
                component: name.to_string(),
                source,
            })?;
        descriptor.name = name.to_string();
        Ok(descriptor)
    }

    /// Parse a component's descriptor, degrading to an empty placeholder on
    /// any failure.
    pub fn load_descriptor(&self, name: &str) -> ComponentDescriptor {
        match self.try_load_descriptor(name) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                warn!(component = name, error = %err, "using placeholder descriptor");
                ComponentDescriptor::placeholder(name)
            }
        }
    }

    /// Descriptor variants whose HTML file exists, in descriptor order.
    pub fn valid_variants(&self, name: &str) -> Vec<Variant> {
        self.valid_variants_in(&self.load_descriptor(name))
    }

    /// [`valid_variants`](Self::valid_variants) for an already loaded
    /// descriptor. Checks the disk on every call.
    pub fn valid_variants_in(&self, descriptor: &ComponentDescriptor) -> Vec<Variant> {
        let name = descriptor.name.as_str();
        let (valid, missing): (Vec<Variant>, Vec<Variant>) = descriptor
            .variants
            .iter()
            .cloned()
            .partition(|v| self.has_html(name, &v.name));
        if !missing.is_empty() {
            debug!(
                component = name,
                missing = ?missing.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
                "variants without HTML"
            );
        }
        valid
    }

    /// Per-component valid/total variant counts for every listed component.
    pub fn validate(&self) -> Result<CatalogReport, CatalogError> {
        if !self.root.is_dir() {
            return Err(CatalogError::RootNotFound(self.root.clone()));
        }

        let names = canonical_order(self.list_components()?);
        let components = names
            .into_iter()
            .map(|name| {
                let descriptor = self.load_descriptor(&name);
                let total_variants = descriptor.variants.len();
                let valid_variants = self.valid_variants_in(&descriptor).len();
                if valid_variants == 0 {
                    warn!(component = %name, "no valid variants");
                }
                ComponentStatus {
                    name,
                    description: descriptor.description,
                    valid_variants,
                    total_variants,
                }
            })
            .collect();

        Ok(CatalogReport { components })
    }

    /// Create the catalog root with sample descriptors for `header`, `hero`
    /// and `footer`. Existing descriptors are left untouched; no variant
    /// assets are written.
    ///
    /// Returns the names of the components whose descriptors were created.
    pub fn scaffold(root: &Path) -> Result<Vec<String>, CatalogError> {
        fs::create_dir_all(root)?;
        let mut created = Vec::new();

        for descriptor in sample_descriptors() {
            let dir = root.join(&descriptor.name);
            let path = dir.join(DESCRIPTOR_FILENAME);
            if path.exists() {
                debug!(component = %descriptor.name, "descriptor exists, skipping");
                continue;
            }
            fs::create_dir_all(&dir)?;
            let json = serde_json::to_string_pretty(&descriptor).map_err(|source| {
                CatalogError::DescriptorParse {
                    component: descriptor.name.clone(),
                    source,
                }
            })?;
            fs::write(&path, json)?;
            created.push(descriptor.name);
        }

        Ok(created)
    }
}

/// Result of [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogReport {
    pub components: Vec<ComponentStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStatus {
    pub name: String,
    pub description: String,
    pub valid_variants: usize,
    pub total_variants: usize,
}

impl ComponentStatus {
    pub fn is_usable(&self) -> bool {
        self.valid_variants > 0
    }
}

impl CatalogReport {
    pub fn usable_count(&self) -> usize {
        self.components.iter().filter(|c| c.is_usable()).count()
    }

    /// Fail when no component has a single valid variant.
    pub fn ensure_usable(&self) -> Result<(), crate::selector::SelectError> {
        if self.usable_count() == 0 {
            return Err(crate::selector::SelectError::NoValidComponents(
                self.components.iter().map(|c| c.name.clone()).collect(),
            ));
        }
        Ok(())
    }
}

/// Sort component names into [`COMPONENT_ORDER`], unknown names last in
/// their original order.
pub fn canonical_order<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Vec<S> {
    let mut keyed: Vec<(usize, usize, S)> = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let rank = COMPONENT_ORDER
                .iter()
                .position(|known| *known == name.as_ref())
                .unwrap_or(COMPONENT_ORDER.len());
            (rank, i, name)
        })
        .collect();
    keyed.sort_by_key(|(rank, i, _)| (*rank, *i));
    keyed.into_iter().map(|(_, _, name)| name).collect()
}

fn sample_descriptors() -> Vec<ComponentDescriptor> {
    fn variants(items: &[(&str, &str, &str)]) -> Vec<Variant> {
        items
            .iter()
            .map(|(name, theme, description)| Variant {
                name: name.to_string(),
                description: description.to_string(),
                theme: theme.to_string(),
            })
            .collect()
    }

    vec![
        ComponentDescriptor {
            name: "header".to_string(),
            description: "Professional casino header with navigation".to_string(),
            category: "navigation".to_string(),
            variants: variants(&[
                ("modern", "modern", "Modern gradient header with smooth animations"),
                ("luxury", "luxury", "Luxury gold header with premium styling"),
                ("neon", "neon", "Vibrant neon gaming header with glow effects"),
                ("minimal", "minimal", "Clean minimalist header with subtle elegance"),
                ("vintage", "vintage", "Classic vintage casino header with retro charm"),
            ]),
        },
        ComponentDescriptor {
            name: "hero".to_string(),
            description: "Engaging hero section".to_string(),
            category: "content".to_string(),
            variants: variants(&[
                ("jackpot", "neon", "High-energy jackpot showcase with animated counters"),
                ("welcome", "modern", "Welcoming hero with bonus offers and registration CTA"),
                ("vip", "luxury", "Exclusive VIP membership hero with luxury styling"),
                ("tournament", "modern", "Dynamic tournament hero with live leaderboards"),
                ("live", "minimal", "Live casino hero with real-time dealer streams"),
            ]),
        },
        ComponentDescriptor {
            name: "footer".to_string(),
            description: "Professional footer with legal compliance".to_string(),
            category: "navigation".to_string(),
            variants: variants(&[
                ("comprehensive", "modern", "Full footer with all sections and social links"),
                ("minimal", "minimal", "Clean minimal footer with essential links only"),
                ("premium", "luxury", "Premium footer with VIP support and awards"),
                ("gaming", "neon", "Gaming-focused footer with game categories"),
                ("corporate", "vintage", "Corporate footer with company information"),
            ]),
        },
    ]
}
