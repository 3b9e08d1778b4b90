//! Theme generation from a single seed color.
//!
//! A [`Theme`] is the complete token set the assembler turns into CSS custom
//! properties: brand colors derived from the seed, mode-specific neutrals,
//! interactive states, status colors, casino metallics, and the opaque
//! typography/spacing/border/shadow/transition values.
//!
//! ## Derivation
//!
//! ```text
//! seed ──triadic──▶ secondary (+1/3), accent (+2/3)
//!      ──lightness × mode factor──▶ primary / secondary / accent
//! mode ──▶ neutrals (background, surface, text, …), status colors, shadows
//! text, text-secondary ──ensure_contrast vs background──▶ final text colors
//! primary ──×1.1 L / ×0.9 L / ×1.2 S──▶ hover / active / focus
//! ```
//!
//! Light mode darkens the brand colors and dark mode lightens them, so they
//! stay legible against the mode's background. The seed is a parsed
//! [`Color`]; malformed hex never reaches this module.
//!
//! ## Theme Files
//!
//! Themes serialize to JSON with kebab-case token names, so a generated theme
//! can be saved once and reused for later builds:
//!
//! ```json
//! {
//!   "name": "custom-dark",
//!   "mode": "dark",
//!   "colors": { "primary": "#dfc069", "primary-rgb": "223, 192, 105", ... },
//!   "typography": { "font-primary": "Inter, system-ui, sans-serif", ... },
//!   ...
//! }
//! ```

use crate::color::{self, Color, WCAG_AA};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Theme file error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme mode {other:?} (expected light or dark)")),
        }
    }
}

/// A generated, self-consistent token set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Theme {
    pub name: String,
    pub description: String,
    pub mode: ThemeMode,
    /// The user-supplied seed, before mode adjustment.
    pub seed: Color,
    pub colors: ThemeColors,
    pub typography: Typography,
    pub spacing: Spacing,
    pub borders: Borders,
    pub shadows: Shadows,
    pub transitions: Transitions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ThemeColors {
    pub primary: Color,
    /// `"r, g, b"` of `primary`, for `rgba()` overlays.
    pub primary_rgb: String,
    pub secondary: Color,
    pub accent: Color,
    pub background: Color,
    pub surface: Color,
    pub surface_elevated: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub border: Color,
    pub hover: Color,
    pub active: Color,
    pub focus: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub gold: Color,
    pub silver: Color,
    pub bronze: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Typography {
    pub font_primary: String,
    pub font_display: String,
    pub scale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Spacing {
    pub base: String,
    pub scale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Borders {
    pub radius: String,
    pub width: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Shadows {
    pub small: String,
    pub medium: String,
    pub large: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transitions {
    pub default: String,
    pub fast: String,
    pub slow: String,
}

/// A single entry of [`Theme::tokens`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Color(Color),
    Value(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Color(c) => write!(f, "{c}"),
            Token::Value(v) => f.write_str(v),
        }
    }
}

// =============================================================================
// Mode constants
// =============================================================================

/// Literal neutrals and status colors per mode. Not derived from the seed.
struct ModePalette {
    background: Color,
    surface: Color,
    surface_elevated: Color,
    text: Color,
    text_secondary: Color,
    border: Color,
    success: Color,
    warning: Color,
    error: Color,
    /// Lightness factors for primary, secondary, accent.
    brand_factors: [f64; 3],
    /// Lightness factors for gold, silver, bronze.
    metal_factors: [f64; 3],
    shadows: [&'static str; 3],
}

const LIGHT: ModePalette = ModePalette {
    background: Color::rgb(0xff, 0xff, 0xff),
    surface: Color::rgb(0xf8, 0xf9, 0xfa),
    surface_elevated: Color::rgb(0xff, 0xff, 0xff),
    text: Color::rgb(0x1a, 0x1a, 0x1a),
    text_secondary: Color::rgb(0x6c, 0x75, 0x7d),
    border: Color::rgb(0xde, 0xe2, 0xe6),
    success: Color::rgb(0x28, 0xa7, 0x45),
    warning: Color::rgb(0xff, 0xc1, 0x07),
    error: Color::rgb(0xdc, 0x35, 0x45),
    brand_factors: [0.8, 0.9, 0.8],
    metal_factors: [0.9, 0.8, 0.8],
    shadows: [
        "0 1px 3px rgba(0, 0, 0, 0.12), 0 1px 2px rgba(0, 0, 0, 0.24)",
        "0 3px 6px rgba(0, 0, 0, 0.16), 0 3px 6px rgba(0, 0, 0, 0.23)",
        "0 10px 20px rgba(0, 0, 0, 0.19), 0 6px 6px rgba(0, 0, 0, 0.23)",
    ],
};

const DARK: ModePalette = ModePalette {
    background: Color::rgb(0x0a, 0x0a, 0x0a),
    surface: Color::rgb(0x1a, 0x1a, 0x1a),
    surface_elevated: Color::rgb(0x2d, 0x2d, 0x2d),
    text: Color::rgb(0xff, 0xff, 0xff),
    text_secondary: Color::rgb(0xa0, 0xa0, 0xa0),
    border: Color::rgb(0x33, 0x33, 0x33),
    success: Color::rgb(0x4c, 0xaf, 0x50),
    warning: Color::rgb(0xff, 0x98, 0x00),
    error: Color::rgb(0xf4, 0x43, 0x36),
    brand_factors: [1.2, 1.1, 1.1],
    metal_factors: [1.1, 1.1, 1.1],
    shadows: [
        "0 1px 3px rgba(0, 0, 0, 0.5), 0 1px 2px rgba(0, 0, 0, 0.3)",
        "0 3px 6px rgba(0, 0, 0, 0.6), 0 3px 6px rgba(0, 0, 0, 0.4)",
        "0 10px 20px rgba(0, 0, 0, 0.7), 0 6px 6px rgba(0, 0, 0, 0.5)",
    ],
};

const GOLD: Color = Color::rgb(0xff, 0xd7, 0x00);
const SILVER: Color = Color::rgb(0xc0, 0xc0, 0xc0);
const BRONZE: Color = Color::rgb(0xcd, 0x7f, 0x32);

// =============================================================================
// Generation
// =============================================================================

/// Generate a complete theme from a seed color and mode. Deterministic.
pub fn generate_theme(seed: Color, mode: ThemeMode) -> Theme {
    let palette = match mode {
        ThemeMode::Light => &LIGHT,
        ThemeMode::Dark => &DARK,
    };

    let [secondary, accent] = color::triadic(seed);
    let [pf, sf, af] = palette.brand_factors;
    let primary = color::adjust_lightness(seed, pf);
    let secondary = color::adjust_lightness(secondary, sf);
    let accent = color::adjust_lightness(accent, af);

    let text = color::ensure_contrast(palette.text, palette.background, WCAG_AA);
    let text_secondary =
        color::ensure_contrast(palette.text_secondary, palette.background, WCAG_AA);

    let [gf, sif, bf] = palette.metal_factors;

    let colors = ThemeColors {
        primary,
        primary_rgb: primary.rgb_triplet(),
        secondary,
        accent,
        background: palette.background,
        surface: palette.surface,
        surface_elevated: palette.surface_elevated,
        text,
        text_secondary,
        border: palette.border,
        hover: color::adjust_lightness(primary, 1.1),
        active: color::adjust_lightness(primary, 0.9),
        focus: color::adjust_saturation(primary, 1.2),
        success: palette.success,
        warning: palette.warning,
        error: palette.error,
        gold: color::adjust_lightness(GOLD, gf),
        silver: color::adjust_lightness(SILVER, sif),
        bronze: color::adjust_lightness(BRONZE, bf),
    };

    Theme {
        name: format!("custom-{mode}"),
        description: format!("Custom {mode} theme with {seed} primary color"),
        mode,
        seed,
        colors,
        typography: Typography {
            font_primary: "Inter, system-ui, sans-serif".to_string(),
            font_display: "Poppins, sans-serif".to_string(),
            scale: "1.2".to_string(),
        },
        spacing: Spacing {
            base: "1rem".to_string(),
            scale: "1.5".to_string(),
        },
        borders: Borders {
            radius: "8px".to_string(),
            width: "1px".to_string(),
        },
        shadows: Shadows {
            small: palette.shadows[0].to_string(),
            medium: palette.shadows[1].to_string(),
            large: palette.shadows[2].to_string(),
        },
        transitions: Transitions {
            default: "all 0.3s ease".to_string(),
            fast: "all 0.15s ease".to_string(),
            slow: "all 0.5s ease".to_string(),
        },
    }
}

impl Theme {
    /// Flat `group.token → value` view, e.g. `"colors.primary"`.
    pub fn tokens(&self) -> BTreeMap<String, Token> {
        let c = &self.colors;
        let colors = [
            ("primary", c.primary),
            ("secondary", c.secondary),
            ("accent", c.accent),
            ("background", c.background),
            ("surface", c.surface),
            ("surface-elevated", c.surface_elevated),
            ("text", c.text),
            ("text-secondary", c.text_secondary),
            ("border", c.border),
            ("hover", c.hover),
            ("active", c.active),
            ("focus", c.focus),
            ("success", c.success),
            ("warning", c.warning),
            ("error", c.error),
            ("gold", c.gold),
            ("silver", c.silver),
            ("bronze", c.bronze),
        ];
        let values = [
            ("colors.primary-rgb", &c.primary_rgb),
            ("typography.font-primary", &self.typography.font_primary),
            ("typography.font-display", &self.typography.font_display),
            ("typography.scale", &self.typography.scale),
            ("spacing.base", &self.spacing.base),
            ("spacing.scale", &self.spacing.scale),
            ("borders.radius", &self.borders.radius),
            ("borders.width", &self.borders.width),
            ("shadows.small", &self.shadows.small),
            ("shadows.medium", &self.shadows.medium),
            ("shadows.large", &self.shadows.large),
            ("transitions.default", &self.transitions.default),
            ("transitions.fast", &self.transitions.fast),
            ("transitions.slow", &self.transitions.slow),
        ];

        colors
            .into_iter()
            .map(|(k, v)| (format!("colors.{k}"), Token::Color(v)))
            .chain(
                values
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), Token::Value(v.clone()))),
            )
            .collect()
    }

    /// Render the theme as a `:root` block of CSS custom properties.
    pub fn to_css(&self) -> String {
        let c = &self.colors;
        format!(
            r#"/* Custom {mode} theme ({seed}) */
:root {{
    /* Brand */
    --color-primary: {primary};
    --color-primary-rgb: {primary_rgb};
    --color-secondary: {secondary};
    --color-accent: {accent};

    /* Surfaces */
    --color-background: {background};
    --color-surface: {surface};
    --color-surface-elevated: {surface_elevated};

    /* Text */
    --color-text: {text};
    --color-text-secondary: {text_secondary};

    /* Borders & interaction */
    --color-border: {border};
    --color-hover: {hover};
    --color-active: {active};
    --color-focus: {focus};

    /* Status */
    --color-success: {success};
    --color-warning: {warning};
    --color-error: {error};

    /* Casino */
    --color-gold: {gold};
    --color-silver: {silver};
    --color-bronze: {bronze};

    /* Typography */
    --font-primary: {font_primary};
    --font-display: {font_display};
    --font-scale: {font_scale};

    /* Spacing & layout */
    --spacing-base: {spacing_base};
    --spacing-scale: {spacing_scale};
    --border-radius: {radius};
    --border-width: {width};

    /* Shadows */
    --shadow-small: {shadow_small};
    --shadow-medium: {shadow_medium};
    --shadow-large: {shadow_large};

    /* Transitions */
    --transition: {transition};
    --transition-fast: {transition_fast};
    --transition-slow: {transition_slow};
}}"#,
            mode = self.mode,
            seed = self.seed,
            primary = c.primary,
            primary_rgb = c.primary_rgb,
            secondary = c.secondary,
            accent = c.accent,
            background = c.background,
            surface = c.surface,
            surface_elevated = c.surface_elevated,
            text = c.text,
            text_secondary = c.text_secondary,
            border = c.border,
            hover = c.hover,
            active = c.active,
            focus = c.focus,
            success = c.success,
            warning = c.warning,
            error = c.error,
            gold = c.gold,
            silver = c.silver,
            bronze = c.bronze,
            font_primary = self.typography.font_primary,
            font_display = self.typography.font_display,
            font_scale = self.typography.scale,
            spacing_base = self.spacing.base,
            spacing_scale = self.spacing.scale,
            radius = self.borders.radius,
            width = self.borders.width,
            shadow_small = self.shadows.small,
            shadow_medium = self.shadows.medium,
            shadow_large = self.shadows.large,
            transition = self.transitions.default,
            transition_fast = self.transitions.fast,
            transition_slow = self.transitions.slow,
        )
    }

    pub fn save(&self, path: &Path) -> Result<(), ThemeError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
