//! HTML rendering of the filtered announcement set.
//!
//! Rendering is a full rebuild: the returned markup replaces whatever
//! the block showed before, so re-rendering with the same inputs is
//! idempotent and overlapping runs simply race to last-write-wins.
//! Class names on the container, content, and action anchors are the
//! styling hooks the hosting page targets.

use crate::dismiss::DismissalStore;
use crate::extract::{AnnouncementRecord, ButtonSpec};
use crate::markup::{escape_attr, escape_text};
use crate::template::TemplateResolver;
use placard_types::RuntimeContext;

pub const CONTAINER_CLASS: &str = "announcements-container";
pub const CONTENT_CLASS: &str = "announcement-content";
pub const ACTIONS_CLASS: &str = "announcement-actions";
pub const DISMISS_CLASS: &str = "announcement-dismiss";

/// Render the replacement markup for a block.
///
/// `dismissals` is the optional dismissal capability: when present,
/// already-dismissed records are skipped and each rendered record gets
/// a labeled dismiss control.
pub fn render_block(
    records: &[AnnouncementRecord],
    ctx: &RuntimeContext,
    resolver: &TemplateResolver,
    dismissals: Option<&dyn DismissalStore>,
) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"");
    out.push_str(CONTAINER_CLASS);
    out.push_str("\">");

    for record in records {
        let dismissed = record
            .id
            .zip(dismissals)
            .is_some_and(|(id, store)| store.is_dismissed(id));
        if dismissed {
            continue;
        }
        write_record(&mut out, record, ctx, resolver, dismissals.is_some());
    }

    out.push_str("</div>");
    out
}

fn write_record(
    out: &mut String,
    record: &AnnouncementRecord,
    ctx: &RuntimeContext,
    resolver: &TemplateResolver,
    dismissible: bool,
) {
    out.push_str("<div class=\"");
    out.push_str(CONTENT_CLASS);
    out.push('"');
    if let Some(id) = record.id {
        out.push_str(&format!(" data-announcement-id=\"{id}\""));
    }
    out.push('>');

    if dismissible && record.id.is_some() {
        out.push_str("<button class=\"");
        out.push_str(DISMISS_CLASS);
        out.push_str("\" aria-label=\"Dismiss\">&#215;</button>");
    }

    // Image and description fragments are opaque authored markup and
    // pass through unescaped
    out.push_str(&record.image_html);

    out.push_str("<h3>");
    out.push_str(&escape_text(&record.title));
    out.push_str("</h3>");

    out.push_str("<div class=\"announcement-description\">");
    for fragment in &record.description_html {
        out.push_str(fragment);
    }
    out.push_str("</div>");

    let buttons: Vec<(&ButtonSpec, &str)> = [
        (record.primary_button.as_ref(), "button primary"),
        (record.secondary_button.as_ref(), "button secondary"),
    ]
    .into_iter()
    .filter_map(|(button, class)| button.map(|b| (b, class)))
    .collect();

    if !buttons.is_empty() {
        out.push_str("<div class=\"");
        out.push_str(ACTIONS_CLASS);
        out.push_str("\">");
        for (button, class) in buttons {
            write_button(out, button, class, ctx, resolver);
        }
        out.push_str("</div>");
    }

    out.push_str("</div>");
}

fn write_button(
    out: &mut String,
    button: &ButtonSpec,
    class: &str,
    ctx: &RuntimeContext,
    resolver: &TemplateResolver,
) {
    // Literal URLs bypass the resolver entirely
    let href = if button.url_template.contains('{') {
        resolver.resolve(&button.url_template, ctx)
    } else {
        button.url_template.clone()
    };

    out.push_str("<a class=\"");
    out.push_str(class);
    out.push_str("\" href=\"");
    out.push_str(&escape_attr(&href));
    out.push_str("\" target=\"_blank\" rel=\"noopener\">");
    out.push_str(&escape_text(&button.title));
    out.push_str("</a>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dismiss::MemoryDismissalStore;

    fn record(id: Option<i64>, title: &str) -> AnnouncementRecord {
        AnnouncementRecord {
            id,
            image_html: "<img src=\"x.png\">".to_string(),
            title: title.to_string(),
            description_html: vec!["<p>Body</p>".to_string()],
            primary_button: None,
            secondary_button: None,
        }
    }

    fn button(title: &str, url: &str) -> ButtonSpec {
        ButtonSpec {
            title: title.to_string(),
            url_template: url.to_string(),
        }
    }

    #[test]
    fn test_container_and_content_structure() {
        let html = render_block(
            &[record(Some(1), "Hello")],
            &RuntimeContext::new(),
            &TemplateResolver::new(),
            None,
        );

        assert!(html.starts_with("<div class=\"announcements-container\">"));
        assert!(html.contains("<div class=\"announcement-content\" data-announcement-id=\"1\">"));
        assert!(html.contains("<img src=\"x.png\">"));
        assert!(html.contains("<h3>Hello</h3>"));
        assert!(html.contains("<p>Body</p>"));
        // No buttons, no actions area, no dismiss control
        assert!(!html.contains(ACTIONS_CLASS));
        assert!(!html.contains(DISMISS_CLASS));
    }

    #[test]
    fn test_template_url_resolved_literal_url_passed_through() {
        let mut rec = record(Some(1), "A");
        rec.primary_button = Some(button("Go", "{experienceLink}/x"));
        rec.secondary_button = Some(button("Docs", "https://docs.example.com"));
        let ctx: RuntimeContext = [("experienceLink", "https://host")].into_iter().collect();

        let html = render_block(&[rec], &ctx, &TemplateResolver::new(), None);

        assert!(html.contains(
            "<a class=\"button primary\" href=\"https://host/x\" target=\"_blank\" rel=\"noopener\">Go</a>"
        ));
        assert!(html.contains(
            "<a class=\"button secondary\" href=\"https://docs.example.com\""
        ));
    }

    #[test]
    fn test_unresolvable_template_renders_empty_href() {
        let mut rec = record(Some(1), "A");
        rec.primary_button = Some(button("Go", "{unknownToken}/x"));

        let html = render_block(
            &[rec],
            &RuntimeContext::new(),
            &TemplateResolver::new(),
            None,
        );
        assert!(html.contains("href=\"\""));
    }

    #[test]
    fn test_title_is_escaped_fragments_are_not() {
        let mut rec = record(Some(1), "Tips & <tricks>");
        rec.description_html = vec!["<p><em>raw</em></p>".to_string()];

        let html = render_block(
            &[rec],
            &RuntimeContext::new(),
            &TemplateResolver::new(),
            None,
        );
        assert!(html.contains("<h3>Tips &amp; &lt;tricks&gt;</h3>"));
        assert!(html.contains("<p><em>raw</em></p>"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let records = vec![record(Some(1), "A"), record(Some(2), "B")];
        let ctx = RuntimeContext::new();
        let resolver = TemplateResolver::new();

        let first = render_block(&records, &ctx, &resolver, None);
        let second = render_block(&records, &ctx, &resolver, None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_dismissed_records_are_skipped() {
        let mut store = MemoryDismissalStore::new();
        store.dismiss(1);
        let records = vec![record(Some(1), "Gone"), record(Some(2), "Kept")];

        let html = render_block(
            &records,
            &RuntimeContext::new(),
            &TemplateResolver::new(),
            Some(&store),
        );

        assert!(!html.contains("Gone"));
        assert!(html.contains("Kept"));
        // Remaining records carry the labeled dismiss control
        assert!(html.contains("aria-label=\"Dismiss\""));
    }

    #[test]
    fn test_record_without_id_renders_without_dismiss_control() {
        let store = MemoryDismissalStore::new();
        let html = render_block(
            &[record(None, "No id")],
            &RuntimeContext::new(),
            &TemplateResolver::new(),
            Some(&store),
        );

        assert!(html.contains("No id"));
        assert!(!html.contains(DISMISS_CLASS));
    }
}
