/// Template renderer for the studio.
///
/// A single HTML shell (`studio/assets/diagnose.html`) is loaded at compile
/// time; pages fill `{{TOKEN}}` placeholders through a closure and any token
/// left over is blanked before the page is sent.

const TEMPLATE: &str = include_str!("assets/diagnose.html");

/// Which page is active — sets the nav highlight and the document title.
#[derive(Clone, Copy)]
pub enum Page {
    Diagnose,
    Disease,
}

impl Page {
    fn title(self) -> &'static str {
        match self {
            Page::Diagnose => "Diagnose",
            Page::Disease  => "Diagnosis result",
        }
    }
}

/// Renders the full page.
///
/// # Arguments
/// - `page`      — active page
/// - `in_flight` — whether a prediction request is outstanding
/// - `fill`      — closure that fills page-specific placeholders
pub fn render_page<F>(page: Page, in_flight: bool, fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    let mut html = TEMPLATE.to_owned();

    html = html.replace("{{TITLE}}", page.title());
    html = html.replace("{{IN_FLIGHT}}", if in_flight { "true" } else { "false" });
    html = html.replace("{{NAV_DIAGNOSE}}", if matches!(page, Page::Diagnose) { "active" } else { "" });

    html = fill(html);

    blank_remaining(html)
}

/// Replaces any `{{TOKEN}}` the page did not fill with an empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        match html[start..].find("}}") {
            Some(end) => html.replace_range(start..start + end + 2, ""),
            None      => break,
        }
    }
    html
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
     .replace('<', "&lt;")
     .replace('>', "&gt;")
     .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfilled_tokens_are_blanked() {
        assert_eq!(blank_remaining("a{{X}}b{{Y_Z}}c".to_owned()), "abc");
        assert_eq!(blank_remaining("open {{ only".to_owned()), "open {{ only");
    }

    #[test]
    fn page_has_no_raw_tokens() {
        let html = render_page(Page::Diagnose, true, |t| t.replace("{{BODY}}", "<p>x</p>"));
        assert!(!html.contains("{{"));
        assert!(html.contains("<p>x</p>"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(html_escape(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
