// File: ./src/format.rs
// Turns raw model text into something a transcript can show.

/// How a reply should be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayContent {
    /// Source text for a markdown renderer, unchanged.
    Markdown(String),
    /// Pre-rendered HTML fragment.
    Html(String),
}

impl DisplayContent {
    pub fn as_str(&self) -> &str {
        match self {
            DisplayContent::Markdown(s) | DisplayContent::Html(s) => s,
        }
    }
}

pub fn format_reply(raw: &str) -> DisplayContent {
    DisplayContent::Markdown(raw.to_string())
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `**x**` pairs become `<strong>x</strong>`; an unmatched `**` is left as is.
fn bold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("**") {
        let after = &rest[open + 2..];
        let Some(close) = after.find("**") else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str("<strong>");
        out.push_str(&after[..close]);
        out.push_str("</strong>");
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

/// Minimal HTML rendering for hosts without a markdown renderer.
pub fn to_legacy_html(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(|p| p.trim_matches('\n'))
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("<p>{}</p>", bold(&escape_html(p)).replace('\n', "<br>")))
        .collect::<Vec<_>>()
        .join("")
}

pub fn format_legacy(raw: &str) -> DisplayContent {
    DisplayContent::Html(to_legacy_html(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_pairs_only() {
        assert_eq!(bold("a **b** c **d"), "a <strong>b</strong> c **d");
    }
}
