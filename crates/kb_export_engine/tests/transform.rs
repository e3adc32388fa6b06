use kb_export_engine::{transform, Converter, Html2MdConverter, MarkdownTransformer};
use pretty_assertions::assert_eq;

/// Hands back the input untouched, so post-processing can be tested exactly.
struct Passthrough;

impl Converter for Passthrough {
    fn to_markdown(&self, html: &str) -> String {
        html.to_string()
    }
}

fn passthrough() -> MarkdownTransformer {
    MarkdownTransformer::new(Box::new(Passthrough))
}

#[test]
fn duplicate_title_paragraph_is_stripped() {
    let body = transform("<p>Leave Policy</p><p>Text</p>", "Leave Policy");
    assert_eq!(body, "Text");
}

#[test]
fn duplicate_title_heading_is_stripped() {
    let md = "\n\n# Leave Policy\n\nLeave Policy\n\nBody line\n";
    assert_eq!(passthrough().transform(md, "Leave Policy"), "Body line");
}

#[test]
fn heading_with_title_prefix_is_stripped() {
    let md = "# Leave Policy (2024)\nBody";
    assert_eq!(passthrough().transform(md, "Leave Policy"), "Body");
}

#[test]
fn title_later_in_body_is_kept() {
    let md = "Intro\n\nLeave Policy\n\n# Leave Policy";
    assert_eq!(
        passthrough().transform(md, "Leave Policy"),
        "Intro\n\nLeave Policy\n\n# Leave Policy"
    );
}

#[test]
fn blank_line_runs_collapse_to_one() {
    let md = "a\n\n\n\nb\n \n\t\nc";
    assert_eq!(passthrough().transform(md, "T"), "a\n\nb\n \nc");
}

#[test]
fn never_two_blank_lines_in_a_row() {
    let inputs = [
        "<p>one</p><br><br><br><p>two</p>",
        "<h2>x</h2>\n\n\n<ul><li>a</li><li>b</li></ul>\n\n\n\n<p>y</p>",
        "<table><tr><th>h</th></tr><tr><td>v</td></tr></table><p></p><p></p><p>z</p>",
    ];
    for html in inputs {
        let body = transform(html, "Unrelated");
        let lines: Vec<&str> = body.split('\n').collect();
        for pair in lines.windows(2) {
            assert!(
                !(pair[0].trim().is_empty() && pair[1].trim().is_empty()),
                "double blank in {body:?}"
            );
        }
    }
}

#[test]
fn links_and_emphasis_survive_conversion() {
    let md = Html2MdConverter.to_markdown(
        r#"<p>See <a href="https://example.com/doc">the doc</a> <em>now</em></p>"#,
    );
    assert!(md.contains("[the doc](https://example.com/doc)"), "{md}");
    assert!(md.contains("*now*") || md.contains("_now_"), "{md}");
}

#[test]
fn images_and_tables_survive_conversion() {
    let md = Html2MdConverter.to_markdown(r#"<p><img src="a.png" alt="x"></p>"#);
    assert!(md.contains("![x](a.png)"), "{md}");

    let md = Html2MdConverter.to_markdown(
        "<table><tr><th>Days</th><th>Type</th></tr><tr><td>20</td><td>Annual</td></tr></table>",
    );
    let rows: Vec<&str> = md.lines().filter(|l| l.trim_start().starts_with('|')).collect();
    assert!(rows.len() >= 2, "{md}");
    assert!(rows.iter().any(|r| r.contains("Days") && r.contains("Type")), "{md}");
    assert!(rows.iter().any(|r| r.contains("20") && r.contains("Annual")), "{md}");
}

#[test]
fn duplicate_title_with_markdown_characters_is_stripped() {
    let body = transform(
        "<p>Leave_Policy *v2*</p><p>Body</p>",
        "Leave_Policy *v2*",
    );
    assert_eq!(body, "Body");
}

#[test]
fn escaped_title_heading_is_stripped() {
    let md = "# Leave\\_Policy v2\n\nBody";
    assert_eq!(passthrough().transform(md, "Leave_Policy v2"), "Body");
}

#[test]
fn empty_body_yields_empty_markdown() {
    assert_eq!(transform("", "Anything"), "");
    assert_eq!(transform("<p>Anything</p>", "Anything"), "");
}
