//! Structured page document for the generated site.
//!
//! The page body is an ordered list of nodes: component fragments and a
//! single legal notice that is always present. Components are placed with
//! three anchors instead of text search-and-replace:
//!
//! | Anchor | Used for |
//! |--------|----------|
//! | after body open | `header` |
//! | after another component | `hero` (after `header`, else after body open) |
//! | before the legal notice | `footer` and every other component |
//!
//! Rendering wraps each fragment in marker comments so the output stays
//! greppable and matches the layout existing tooling expects:
//!
//! ```html
//! <!-- Details_Comparison Component Start -->
//! <section>...</section>
//! <!-- Details_Comparison Component End -->
//! ```

use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::{Deserialize, Serialize};

/// Comment preceding the legal notice block.
pub const LEGAL_NOTICE_MARKER: &str = "<!-- Legal Notice -->";

/// Page-level metadata rendered into `<head>` and the legal notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
    pub author: String,
    pub lang: String,
    pub legal_notice: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Professional Casino Website".to_string(),
            description: "Experience the best online casino games".to_string(),
            author: "site-forge".to_string(),
            lang: "en".to_string(),
            legal_notice: "18+ Only. Please gamble responsibly. BeGambleAware.org".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BodyNode {
    Fragment { component: String, html: String },
    LegalNotice,
}

/// The page under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDocument {
    body: Vec<BodyNode>,
}

impl Default for PageDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PageDocument {
    /// An empty skeleton: body open, legal notice, body close.
    pub fn new() -> Self {
        Self {
            body: vec![BodyNode::LegalNotice],
        }
    }

    pub fn insert_after_body_open(&mut self, component: &str, html: &str) {
        self.body.insert(0, fragment(component, html));
    }

    pub fn insert_before_legal_notice(&mut self, component: &str, html: &str) {
        let at = self
            .body
            .iter()
            .position(|n| matches!(n, BodyNode::LegalNotice))
            .unwrap_or(self.body.len());
        self.body.insert(at, fragment(component, html));
    }

    /// Insert right after `anchor`'s fragment, or after body open when
    /// `anchor` isn't in the document.
    pub fn insert_after_component(&mut self, anchor: &str, component: &str, html: &str) {
        match self.position_of(anchor) {
            Some(i) => self.body.insert(i + 1, fragment(component, html)),
            None => self.insert_after_body_open(component, html),
        }
    }

    /// Insert right before `anchor`'s fragment, or before the legal notice
    /// when `anchor` isn't in the document.
    pub fn insert_before_component(&mut self, anchor: &str, component: &str, html: &str) {
        match self.position_of(anchor) {
            Some(i) => self.body.insert(i, fragment(component, html)),
            None => self.insert_before_legal_notice(component, html),
        }
    }

    /// Place a component according to its type. The footer always stays
    /// directly above the legal notice.
    pub fn place(&mut self, component: &str, html: &str) {
        match component {
            "header" => self.insert_after_body_open(component, html),
            "hero" => self.insert_after_component("header", component, html),
            "footer" => self.insert_before_legal_notice(component, html),
            _ => self.insert_before_component("footer", component, html),
        }
    }

    pub fn contains(&self, component: &str) -> bool {
        self.position_of(component).is_some()
    }

    /// Component names in body order.
    pub fn components(&self) -> Vec<&str> {
        self.body
            .iter()
            .filter_map(|n| match n {
                BodyNode::Fragment { component, .. } => Some(component.as_str()),
                BodyNode::LegalNotice => None,
            })
            .collect()
    }

    fn position_of(&self, component: &str) -> Option<usize> {
        self.body.iter().position(|n| match n {
            BodyNode::Fragment { component: c, .. } => c == component,
            BodyNode::LegalNotice => false,
        })
    }

    pub fn render(&self, meta: &SiteMeta) -> Markup {
        html! {
            (DOCTYPE)
            html lang=(meta.lang) {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    meta name="description" content=(meta.description);
                    meta name="author" content=(meta.author);
                    title { (meta.title) }
                    link rel="stylesheet" href="css/styles.css";
                    link rel="preconnect" href="https://fonts.googleapis.com";
                    link rel="preconnect" href="https://fonts.gstatic.com" crossorigin="anonymous";
                    link rel="stylesheet" href="https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&family=Poppins:wght@300;400;500;600;700&display=swap";
                }
                body {
                    @for node in &self.body {
                        (render_node(node, meta))
                    }
                    script src="js/main.js" {}
                }
            }
        }
    }

    /// Render to the final HTML string.
    pub fn to_html(&self, meta: &SiteMeta) -> String {
        self.render(meta).into_string()
    }
}

fn fragment(component: &str, html: &str) -> BodyNode {
    BodyNode::Fragment {
        component: component.to_string(),
        html: html.trim().to_string(),
    }
}

fn render_node(node: &BodyNode, meta: &SiteMeta) -> Markup {
    match node {
        BodyNode::Fragment { component, html } => {
            let (start, end) = marker_comments(component);
            html! {
                (PreEscaped(format!("\n{start}\n{html}\n{end}\n")))
            }
        }
        BodyNode::LegalNotice => html! {
            (PreEscaped(format!("\n{LEGAL_NOTICE_MARKER}\n")))
            div.legal-notice { (meta.legal_notice) }
            (PreEscaped("\n"))
        },
    }
}

/// Start and end marker comments for `component`.
pub fn marker_comments(component: &str) -> (String, String) {
    let label = title_case(component);
    (
        format!("<!-- {label} Component Start -->"),
        format!("<!-- {label} Component End -->"),
    )
}

/// Capitalize the first letter of every alphabetic run, lowercase the rest:
/// `details_comparison` → `Details_Comparison`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
