//! Structural extraction of authored announcement rows.
//!
//! A block is a grid of rows, each row carrying four slots in fixed
//! position:
//!
//! 1. numeric identifier (text content of the first cell)
//! 2. image fragment (opaque markup)
//! 3. heading plus description fragments
//! 4. up to two paragraphs describing call-to-action buttons
//!
//! Extraction runs once per page load and the resulting records are
//! never mutated. Missing slots degrade to absent/empty fields; a
//! malformed row never aborts extraction of its neighbors.

use crate::markup::{self, Element, parse_fragment};
use serde::Serialize;

/// Marker separating a button's title from its URL template in the
/// template-text authoring variant.
const TEMPLATE_MARKER: &str = "templateLink:";

/// One authored announcement, in row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnouncementRecord {
    /// Author-assigned identifier from the first slot. `None` when the
    /// slot is missing or non-numeric; such records can never match a
    /// configuration entry.
    pub id: Option<i64>,

    /// Opaque image markup from the second slot.
    pub image_html: String,

    /// Heading text from the third slot.
    pub title: String,

    /// Ordered opaque description fragments from the third slot.
    pub description_html: Vec<String>,

    pub primary_button: Option<ButtonSpec>,
    pub secondary_button: Option<ButtonSpec>,
}

/// A call-to-action button: display title plus either a literal URL or
/// a `{placeholder}` template (resolved at render time).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonSpec {
    pub title: String,
    pub url_template: String,
}

/// Extract one record per row of the block, preserving row order.
pub fn extract_announcements(block: &Element) -> Vec<AnnouncementRecord> {
    block.child_elements().map(extract_row).collect()
}

/// Parse a fragment and extract from its first element.
///
/// Convenience entry point for callers holding raw markup; an input
/// with no element yields no records.
pub fn extract_from_markup(html: &str) -> Vec<AnnouncementRecord> {
    let nodes = parse_fragment(html);
    nodes
        .iter()
        .find_map(|n| n.as_element())
        .map(extract_announcements)
        .unwrap_or_default()
}

fn extract_row(row: &Element) -> AnnouncementRecord {
    let slots = row_slots(row);

    let id = slots
        .first()
        .and_then(|cell| cell.text().trim().parse::<i64>().ok());

    let image_html = slots.get(1).map(|cell| cell.inner_html()).unwrap_or_default();

    let (title, description_html) = match slots.get(2) {
        Some(cell) => extract_content(cell),
        None => (String::new(), Vec::new()),
    };

    // Buttons live in the fourth/last slot; a three-slot row has none
    let (primary_button, secondary_button) = match slots.get(3..).and_then(|s| s.last()) {
        Some(cell) => {
            let mut buttons = cell.child_elements().filter(|el| el.tag == "p");
            (
                buttons.next().map(extract_button),
                buttons.next().map(extract_button),
            )
        }
        None => (None, None),
    };

    AnnouncementRecord {
        id,
        image_html,
        title,
        description_html,
        primary_button,
        secondary_button,
    }
}

/// The positional cells of a row. Authoring tools sometimes wrap the
/// cells in a single container div; descend through it when present.
fn row_slots(row: &Element) -> Vec<&Element> {
    let direct: Vec<&Element> = row.child_elements().collect();
    if direct.len() == 1 && direct[0].child_elements().count() > 1 {
        direct[0].child_elements().collect()
    } else {
        direct
    }
}

/// Title and ordered description fragments from the content slot.
///
/// The title comes from the first `h3` descendant; other heading
/// levels are accepted only when no `h3` exists, so a kicker heading
/// above the real title does not win.
fn extract_content(cell: &Element) -> (String, Vec<String>) {
    let title = cell
        .find_descendant(&|el| el.tag == "h3")
        .or_else(|| cell.find_descendant(&|el| markup::is_heading(&el.tag)))
        .map(|h| h.text().trim().to_string())
        .unwrap_or_default();

    let description = cell
        .child_elements()
        .filter(|el| !markup::is_heading(&el.tag))
        .map(|el| el.outer_html())
        .collect();

    (title, description)
}

/// Extract a button from one paragraph node.
///
/// Two authored variants exist: a link container wrapping an anchor,
/// and plain text carrying a `templateLink:` marker. Anything else
/// falls back to raw text with an empty URL.
fn extract_button(node: &Element) -> ButtonSpec {
    if let Some(anchor) = link_container_anchor(node) {
        return ButtonSpec {
            title: anchor.text().trim().to_string(),
            url_template: anchor.attr("href").unwrap_or_default().to_string(),
        };
    }

    let text = node.text();
    if let Some(marker) = text.find(TEMPLATE_MARKER) {
        return ButtonSpec {
            title: text[..marker].replacen('(', "", 1).trim().to_string(),
            url_template: strip_trailing_paren(text[marker + TEMPLATE_MARKER.len()..].trim()),
        };
    }

    ButtonSpec {
        title: text.trim().to_string(),
        url_template: String::new(),
    }
}

/// The anchor of a link-container button: either the node carries the
/// `button-container` class, or its only child element is an anchor.
fn link_container_anchor(node: &Element) -> Option<&Element> {
    if node.has_class("button-container") {
        return node.find_tag("a");
    }
    let mut children = node.child_elements();
    match (children.next(), children.next()) {
        (Some(only), None) if only.tag == "a" => Some(only),
        _ => None,
    }
}

fn strip_trailing_paren(s: &str) -> String {
    s.strip_suffix(')').unwrap_or(s).trim().to_string()
}
