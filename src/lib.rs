//! # Site Forge
//!
//! Assembles a themed marketing site from a catalog of HTML/CSS/JS component
//! variants, a color theme derived from a single seed color, and optional
//! country-specific legal content.
//!
//! # Architecture: One-Way Pipeline
//!
//! ```text
//! seed color + mode ──► theme ───────────────────────────┐
//!                                                        ▼
//! catalog/ ──► selector (single|smart|wild) ──► assembler ──► web-folder/
//! ```
//!
//! Data flows in one direction. The selector never writes, the theme is
//! immutable once generated, and the assembler is the only stage that
//! touches the output directory.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`color`] | Hex/RGB/HSL conversions, lightness and saturation adjustment, WCAG contrast |
//! | [`theme`] | Seed color + mode → complete token set; CSS variables; JSON theme files |
//! | [`catalog`] | Component descriptors, variant validity, canonical ordering, scaffolding |
//! | [`random`] | Injectable, seedable random source |
//! | [`selector`] | Mixing policies and the theme-compatibility graph |
//! | [`document`] | Structured page model with anchor-based insertion, rendered with Maud |
//! | [`assemble`] | Places fragments, appends CSS/JS, records the run summary, writes the site |
//! | [`build`] | Per-run context and the end-to-end pipeline |
//! | [`config`] | `site-forge.toml` loading, merging and validation |
//! | [`country`] | Stages country footer/offers content into the output |
//! | [`lint`] | Heuristic checks over a generated site |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Validity Is Re-Checked, Never Cached
//!
//! A variant counts only while its HTML file exists. The selector checks at
//! pick time (smart, wild) and again in its validation pass; the assembler
//! checks once more before reading. Catalogs are edited by hand and are often
//! half-populated.
//!
//! ## Drop, Don't Default
//!
//! A component with no valid variant is dropped from the combination and
//! reported. The run only fails when nothing at all is left.
//!
//! ## Structured Document, Marker-Comment Output
//!
//! Fragments are placed through [`document::PageDocument`] anchors instead of
//! string replacement, but the rendered page keeps the
//! `<!-- Name Component Start -->` / `<!-- Name Component End -->` markers so
//! the output stays easy to diff and grep.
//!
//! ## Reproducible Runs
//!
//! Selection takes a [`random::RandomSource`]. With `--rng-seed` (or
//! `selection.rng_seed`) a build is repeatable byte for byte.

pub mod assemble;
pub mod build;
pub mod catalog;
pub mod color;
pub mod config;
pub mod country;
pub mod document;
pub mod lint;
pub mod output;
pub mod random;
pub mod selector;
pub mod theme;

#[cfg(test)]
pub(crate) mod test_helpers;
