//! Permissive HTML fragment parser.
//!
//! Byte-scanning with best-effort recovery: comments and declarations
//! are skipped, stray close tags are ignored, mismatched close tags
//! close the nearest matching open ancestor, and anything left open at
//! the end of input is closed implicitly. Malformed input produces a
//! partial tree, never an error.

use super::{Element, Node};
use memchr::memchr;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Whether a tag never takes children.
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Parse a markup fragment into a list of top-level nodes.
pub fn parse_fragment(input: &str) -> Vec<Node> {
    let mut roots: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(off) = memchr(b'<', &bytes[pos..]) else {
            push_text(&input[pos..], &mut stack, &mut roots);
            break;
        };
        if off > 0 {
            push_text(&input[pos..pos + off], &mut stack, &mut roots);
            pos += off;
        }

        let rest = &input[pos..];
        if rest.starts_with("<!--") {
            // Comment: skip to the terminator, or to end of input
            pos = match rest.find("-->") {
                Some(end) => pos + end + 3,
                None => bytes.len(),
            };
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            // Doctype / processing instruction: skip to '>'
            pos = match memchr(b'>', &bytes[pos..]) {
                Some(end) => pos + end + 1,
                None => bytes.len(),
            };
        } else if rest.starts_with("</") {
            let Some(end) = memchr(b'>', &bytes[pos..]) else {
                break;
            };
            let name = input[pos + 2..pos + end].trim().to_ascii_lowercase();
            close_element(&name, &mut stack, &mut roots);
            pos = pos + end + 1;
        } else if bytes.len() > pos + 1 && bytes[pos + 1].is_ascii_alphabetic() {
            let Some(end) = scan_tag_end(bytes, pos) else {
                // Unterminated tag: treat the remainder as text
                push_text(rest, &mut stack, &mut roots);
                break;
            };
            open_element(&input[pos + 1..end], &mut stack, &mut roots);
            pos = end + 1;
        } else {
            // Lone '<' that starts nothing recognizable
            push_text("<", &mut stack, &mut roots);
            pos += 1;
        }
    }

    // Implicitly close anything still open
    while let Some(el) = stack.pop() {
        attach(Node::Element(el), &mut stack, &mut roots);
    }

    roots
}

/// Find the closing '>' of a tag starting at `start`, skipping quoted
/// attribute values.
fn scan_tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes[start..].iter().enumerate() {
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(start + i),
                _ => {}
            },
        }
    }
    None
}

/// Parse the inside of an open tag (`div class="row" /`) and push or
/// attach the resulting element.
fn open_element(tag_content: &str, stack: &mut Vec<Element>, roots: &mut Vec<Node>) {
    let tag_content = tag_content.trim();
    let self_closing = tag_content.ends_with('/');
    let tag_content = tag_content.trim_end_matches('/').trim_end();

    let name_end = tag_content
        .find(|c: char| c.is_whitespace())
        .unwrap_or(tag_content.len());
    let tag = tag_content[..name_end].to_ascii_lowercase();
    if tag.is_empty() {
        return;
    }

    let element = Element {
        attrs: parse_attrs(&tag_content[name_end..]),
        children: Vec::new(),
        tag,
    };

    if self_closing || is_void(&element.tag) {
        attach(Node::Element(element), stack, roots);
    } else {
        stack.push(element);
    }
}

/// Parse the attribute list of a tag.
fn parse_attrs(mut s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();

    loop {
        s = s.trim_start();
        if s.is_empty() {
            break;
        }

        let name_end = s
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(s.len());
        let name = s[..name_end].to_ascii_lowercase();
        s = s[name_end..].trim_start();

        if name.is_empty() {
            // Stray '=' or similar; skip one char to make progress
            s = &s[s.char_indices().nth(1).map_or(s.len(), |(i, _)| i)..];
            continue;
        }

        if let Some(rest) = s.strip_prefix('=') {
            let rest = rest.trim_start();
            let (value, remaining) = match rest.as_bytes().first() {
                Some(&q @ (b'"' | b'\'')) => {
                    let inner = &rest[1..];
                    match memchr(q, inner.as_bytes()) {
                        Some(end) => (&inner[..end], &inner[end + 1..]),
                        None => (inner, ""),
                    }
                }
                _ => {
                    let end = rest
                        .find(|c: char| c.is_whitespace())
                        .unwrap_or(rest.len());
                    (&rest[..end], &rest[end..])
                }
            };
            attrs.push((name, decode_entities(value)));
            s = remaining;
        } else {
            // Valueless attribute (e.g. `hidden`)
            attrs.push((name, String::new()));
        }
    }

    attrs
}

/// Close the nearest open element with the given tag; elements opened
/// after it are closed implicitly. Stray close tags are ignored.
fn close_element(name: &str, stack: &mut Vec<Element>, roots: &mut Vec<Node>) {
    let Some(idx) = stack.iter().rposition(|el| el.tag == name) else {
        return;
    };
    while stack.len() > idx {
        let el = stack.pop().unwrap_or_default();
        attach(Node::Element(el), stack, roots);
    }
}

fn push_text(raw: &str, stack: &mut Vec<Element>, roots: &mut Vec<Node>) {
    if raw.is_empty() {
        return;
    }
    attach(Node::Text(decode_entities(raw)), stack, roots);
}

fn attach(node: Node, stack: &mut Vec<Element>, roots: &mut Vec<Node>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Decode the handful of entities authored content actually uses.
fn decode_entities(s: &str) -> String {
    if memchr(b'&', s.as_bytes()).is_none() {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let replaced = [
            ("&amp;", "&"),
            ("&lt;", "<"),
            ("&gt;", ">"),
            ("&quot;", "\""),
            ("&#39;", "'"),
            ("&apos;", "'"),
            ("&nbsp;", "\u{a0}"),
        ]
        .iter()
        .find(|(entity, _)| rest.starts_with(entity));
        match replaced {
            Some((entity, text)) => {
                out.push_str(text);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(nodes: &[Node]) -> &Element {
        nodes
            .iter()
            .find_map(Node::as_element)
            .expect("fragment should contain an element")
    }

    #[test]
    fn test_parse_nested_divs() {
        let nodes = parse_fragment("<div class=\"row\"><div>1</div><div><h3>Hi</h3></div></div>");
        let row = first_element(&nodes);
        assert_eq!(row.tag, "div");
        assert!(row.has_class("row"));

        let cells: Vec<_> = row.child_elements().collect();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].text(), "1");
        assert_eq!(cells[1].find_tag("h3").unwrap().text(), "Hi");
    }

    #[test]
    fn test_anchor_attributes() {
        let nodes = parse_fragment("<p class='button-container'><a href=\"/go?a=1&amp;b=2\">Go</a></p>");
        let p = first_element(&nodes);
        let a = p.find_tag("a").unwrap();
        assert_eq!(a.attr("href"), Some("/go?a=1&b=2"));
        assert_eq!(a.text(), "Go");
    }

    #[test]
    fn test_void_and_self_closing_elements() {
        let nodes = parse_fragment("<div><img src=\"pic.png\"><br/>text</div>");
        let div = first_element(&nodes);
        let children: Vec<_> = div.child_elements().collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].tag, "img");
        assert_eq!(children[0].attr("src"), Some("pic.png"));
        assert_eq!(div.text(), "text");
    }

    #[test]
    fn test_comments_and_doctype_skipped() {
        let nodes = parse_fragment("<!doctype html><!-- note --><div>x</div>");
        assert_eq!(nodes.len(), 1);
        assert_eq!(first_element(&nodes).text(), "x");
    }

    #[test]
    fn test_unclosed_elements_close_implicitly() {
        let nodes = parse_fragment("<div><p>one<p>two");
        let div = first_element(&nodes);
        // Without implied-close-on-open, the second <p> nests; both texts survive
        assert_eq!(div.text(), "onetwo");
    }

    #[test]
    fn test_stray_close_tag_ignored() {
        let nodes = parse_fragment("</span><div>ok</div>");
        assert_eq!(first_element(&nodes).text(), "ok");
    }

    #[test]
    fn test_mismatched_close_recovers() {
        let nodes = parse_fragment("<div><span>a</div>b");
        let div = first_element(&nodes);
        assert_eq!(div.text(), "a");
        assert!(matches!(nodes.last(), Some(Node::Text(t)) if t == "b"));
    }

    #[test]
    fn test_outer_html_round_trip() {
        let src = "<div class=\"cell\"><img src=\"a.png\" alt=\"A &amp; B\"><p>hi</p></div>";
        let nodes = parse_fragment(src);
        assert_eq!(first_element(&nodes).outer_html(), src);
    }

    #[test]
    fn test_quoted_gt_inside_attribute() {
        let nodes = parse_fragment("<a href=\"/x?q=a>b\">link</a>");
        let a = first_element(&nodes);
        assert_eq!(a.attr("href"), Some("/x?q=a>b"));
        assert_eq!(a.text(), "link");
    }
}
