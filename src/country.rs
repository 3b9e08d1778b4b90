//! Country-specific legal content.
//!
//! Footer and offer copy differ per market. The master tree keeps one
//! directory per country and content kind:
//!
//! ```text
//! master/
//! ├── footer/
//! │   ├── Denmark/
//! │   ├── France/
//! │   ├── Portugal/
//! │   └── UK-IR/
//! └── offers/
//!     └── ...
//! ```
//!
//! [`apply_country`] replaces `<output>/static/footer/` and
//! `<output>/static/offers/` with the selected country's copies. A kind
//! whose source directory is missing is reported and left untouched.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Content kinds staged per country, in processing order.
pub const CONTENT_KINDS: &[&str] = &["footer", "offers"];

#[derive(Error, Debug)]
pub enum CountryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unknown country {0:?} (expected Denmark, France, Portugal or UK-IR)")]
    UnknownCountry(String),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    Denmark,
    France,
    Portugal,
    UkIr,
}

impl Country {
    pub const ALL: [Country; 4] = [
        Country::Denmark,
        Country::France,
        Country::Portugal,
        Country::UkIr,
    ];

    /// Directory name under `master/<kind>/`.
    pub fn dir_name(self) -> &'static str {
        match self {
            Country::Denmark => "Denmark",
            Country::France => "France",
            Country::Portugal => "Portugal",
            Country::UkIr => "UK-IR",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Country {
    type Err = CountryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::ALL
            .into_iter()
            .find(|c| c.dir_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CountryError::UnknownCountry(s.to_string()))
    }
}

/// What happened to one content kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindResult {
    pub kind: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Files copied; `None` when the source directory was missing.
    pub copied: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryReport {
    pub country: Country,
    pub kinds: Vec<KindResult>,
}

impl CountryReport {
    pub fn missing(&self) -> Vec<&str> {
        self.kinds
            .iter()
            .filter(|k| k.copied.is_none())
            .map(|k| k.kind.as_str())
            .collect()
    }

    pub fn files_copied(&self) -> usize {
        self.kinds.iter().filter_map(|k| k.copied).sum()
    }
}

/// Stage `country`'s footer and offers content into `output_dir/static/`.
pub fn apply_country(
    master_root: &Path,
    country: Country,
    output_dir: &Path,
) -> Result<CountryReport, CountryError> {
    let mut kinds = Vec::with_capacity(CONTENT_KINDS.len());

    for kind in CONTENT_KINDS {
        let source = master_root.join(kind).join(country.dir_name());
        let destination = output_dir.join("static").join(kind);
        fs::create_dir_all(&destination)?;

        let copied = if source.is_dir() {
            clear_dir(&destination)?;
            let count = copy_tree(&source, &destination)?;
            info!(kind, %country, files = count, "country content staged");
            Some(count)
        } else {
            warn!(kind, source = %source.display(), "country source missing");
            None
        };

        kinds.push(KindResult {
            kind: kind.to_string(),
            source,
            destination,
            copied,
        });
    }

    Ok(CountryReport { country, kinds })
}

fn clear_dir(dir: &Path) -> Result<(), CountryError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Recursively copy `src` into `dst`, returning the number of files.
fn copy_tree(src: &Path, dst: &Path) -> Result<usize, CountryError> {
    let mut files = 0;
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }
    Ok(files)
}
