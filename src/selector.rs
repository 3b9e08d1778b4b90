//! Combination selection: one variant per requested component.
//!
//! ## Mixing Policies
//!
//! | Policy | Candidates | Existence check |
//! |--------|------------|-----------------|
//! | `single` | every descriptor variant | only in the validation pass |
//! | `smart` | variants tagged with a theme compatible with a random base theme, HTML present; otherwise any variant with HTML | at pick time |
//! | `wild` | variants with HTML present | at pick time |
//!
//! ## Validation Pass
//!
//! Whatever the policy, each pick is re-checked afterwards. A pick whose HTML
//! file is missing is replaced by the first variant, in descriptor order,
//! that has one. A component with no such variant is dropped, never
//! defaulted. If nothing survives, selection fails with
//! [`SelectError::NoValidComponents`].
//!
//! Selection reads the filesystem but never writes it; given the same
//! catalog and the same random source it produces the same [`Selection`].

use crate::catalog::{Catalog, ComponentDescriptor, Variant};
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("No valid components: none of {0:?} has a variant with an HTML file")]
    NoValidComponents(Vec<String>),
}

/// Parsed from its name or from the menu number `1`/`2`/`3`, both on the
/// command line and in `site-forge.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MixingPolicy {
    /// One random variant per component from its full variant list.
    #[default]
    Single,
    /// Random variants restricted to a compatible theme family.
    Smart,
    /// Random variants among those with files present.
    Wild,
}

impl MixingPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            MixingPolicy::Single => "single",
            MixingPolicy::Smart => "smart",
            MixingPolicy::Wild => "wild",
        }
    }
}

impl fmt::Display for MixingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MixingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "1" => Ok(MixingPolicy::Single),
            "smart" | "2" => Ok(MixingPolicy::Smart),
            "wild" | "3" => Ok(MixingPolicy::Wild),
            other => Err(format!(
                "unknown mixing policy {other:?} (expected single, smart or wild)"
            )),
        }
    }
}

impl TryFrom<String> for MixingPolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Base theme → theme tags considered compatible with it.
///
/// Deliberately not symmetric: `neon` accepts `modern`, but `modern` does
/// not accept `neon`.
pub const THEME_COMPATIBILITY: &[(&str, &[&str])] = &[
    ("modern", &["modern", "minimal", "luxury"]),
    ("luxury", &["luxury", "vintage", "modern"]),
    ("neon", &["neon", "modern", "minimal"]),
    ("minimal", &["minimal", "modern", "neon"]),
    ("vintage", &["vintage", "luxury", "minimal"]),
];

/// Theme tags compatible with `base`, or `None` for an unknown base.
pub fn compatible_themes(base: &str) -> Option<&'static [&'static str]> {
    THEME_COMPATIBILITY
        .iter()
        .find(|(name, _)| *name == base)
        .map(|(_, compatible)| *compatible)
}

/// A resolved component → variant assignment, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    entries: Vec<Assignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub component: String,
    pub variant: String,
}

impl Combination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `variant` to `component`, replacing an earlier assignment.
    pub fn insert(&mut self, component: impl Into<String>, variant: impl Into<String>) {
        let component = component.into();
        let variant = variant.into();
        match self.entries.iter_mut().find(|a| a.component == component) {
            Some(existing) => existing.variant = variant,
            None => self.entries.push(Assignment { component, variant }),
        }
    }

    pub fn get(&self, component: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|a| a.component == component)
            .map(|a| a.variant.as_str())
    }

    pub fn contains(&self, component: &str) -> bool {
        self.get(component).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C: Into<String>, V: Into<String>> FromIterator<(C, V)> for Combination {
    fn from_iter<T: IntoIterator<Item = (C, V)>>(iter: T) -> Self {
        let mut combination = Combination::new();
        for (c, v) in iter {
            combination.insert(c, v);
        }
        combination
    }
}

/// A pick that failed validation and was replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub component: String,
    pub requested: String,
    pub substituted: String,
}

/// Outcome of [`select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub policy: MixingPolicy,
    /// Base theme drawn by smart mixing.
    pub base_theme: Option<String>,
    pub combination: Combination,
    pub fallbacks: Vec<Fallback>,
    /// Requested components that ended up with no usable variant.
    pub dropped: Vec<String>,
}

/// Choose one variant per component under `policy`, then validate.
pub fn select(
    catalog: &Catalog,
    components: &[String],
    policy: MixingPolicy,
    rng: &mut impl RandomSource,
) -> Result<Selection, SelectError> {
    let descriptors: Vec<ComponentDescriptor> = components
        .iter()
        .map(|name| catalog.load_descriptor(name))
        .collect();

    let mut base_theme = None;
    let picks: Vec<(String, Option<String>)> = match policy {
        MixingPolicy::Single => descriptors
            .iter()
            .map(|d| (d.name.clone(), pick_any(&d.variants, rng)))
            .collect(),
        MixingPolicy::Smart => {
            let (base, _) = THEME_COMPATIBILITY[rng.index(THEME_COMPATIBILITY.len())];
            info!(base_theme = base, "smart mix");
            base_theme = Some(base.to_string());
            descriptors
                .iter()
                .map(|d| (d.name.clone(), pick_smart(catalog, d, base, rng)))
                .collect()
        }
        MixingPolicy::Wild => descriptors
            .iter()
            .map(|d| {
                let valid = catalog.valid_variants_in(d);
                (d.name.clone(), pick_any(&valid, rng))
            })
            .collect(),
    };

    let mut combination = Combination::new();
    let mut fallbacks = Vec::new();
    let mut dropped = Vec::new();

    for ((component, pick), descriptor) in picks.into_iter().zip(&descriptors) {
        if let Some(variant) = &pick
            && catalog.has_html(&component, variant)
        {
            combination.insert(component, variant.clone());
            continue;
        }

        match catalog.valid_variants_in(descriptor).into_iter().next() {
            Some(first_valid) => {
                if let Some(requested) = pick {
                    warn!(
                        component = %component,
                        requested = %requested,
                        substituted = %first_valid.name,
                        "variant HTML missing, using fallback"
                    );
                    fallbacks.push(Fallback {
                        component: component.clone(),
                        requested,
                        substituted: first_valid.name.clone(),
                    });
                }
                combination.insert(component, first_valid.name.clone());
            }
            None => {
                warn!(component = %component, "no valid variants, dropping");
                dropped.push(component);
            }
        }
    }

    if combination.is_empty() {
        return Err(SelectError::NoValidComponents(components.to_vec()));
    }

    Ok(Selection {
        policy,
        base_theme,
        combination,
        fallbacks,
        dropped,
    })
}

fn pick_any(variants: &[Variant], rng: &mut impl RandomSource) -> Option<String> {
    rng.choose(variants).map(|v| v.name.clone())
}

/// Smart-mode candidate set for one component: compatible variants with
/// HTML present, else any variant with HTML present.
pub fn smart_candidates(
    catalog: &Catalog,
    descriptor: &ComponentDescriptor,
    base_theme: &str,
) -> Vec<Variant> {
    let compatible = compatible_themes(base_theme).unwrap_or(&[]);
    let valid = catalog.valid_variants_in(descriptor);
    let matching: Vec<Variant> = valid
        .iter()
        .filter(|v| compatible.contains(&v.theme.as_str()))
        .cloned()
        .collect();

    if matching.is_empty() {
        debug!(
            component = %descriptor.name,
            base_theme,
            "no compatible variant, falling back to any valid variant"
        );
        valid
    } else {
        matching
    }
}

fn pick_smart(
    catalog: &Catalog,
    descriptor: &ComponentDescriptor,
    base_theme: &str,
    rng: &mut impl RandomSource,
) -> Option<String> {
    pick_any(&smart_candidates(catalog, descriptor, base_theme), rng)
}
