use scholar::format::{DisplayContent, format_legacy, format_reply, to_legacy_html};

#[test]
fn test_markdown_is_passed_through() {
    let raw = "# Plan\n\n- read **chapter 3**\n- `code`";
    assert_eq!(format_reply(raw), DisplayContent::Markdown(raw.to_string()));
    assert_eq!(format_reply(raw).as_str(), raw);
}

#[test]
fn test_legacy_html_paragraphs_and_bold() {
    let html = to_legacy_html("Hello **world**\nline two\n\nSecond <b>para</b> & more");
    assert_eq!(
        html,
        "<p>Hello <strong>world</strong><br>line two</p><p>Second &lt;b&gt;para&lt;/b&gt; &amp; more</p>"
    );
}

#[test]
fn test_legacy_html_skips_blank_paragraphs() {
    assert_eq!(to_legacy_html("one\r\n\r\n\n\ntwo\n"), "<p>one</p><p>two</p>");
    assert_eq!(to_legacy_html(""), "");
    assert!(matches!(format_legacy("x"), DisplayContent::Html(ref s) if s == "<p>x</p>"));
}
