use std::borrow::Cow;

/// Raw HTML to Markdown conversion primitive.
pub trait Converter: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;
}

/// `html2md` keeps emphasis, links, images and tables, and never wraps lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl Converter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        html2md::parse_html(html)
    }
}

/// Turns an article's HTML body into the Markdown body of its document.
pub struct MarkdownTransformer {
    converter: Box<dyn Converter>,
}

impl Default for MarkdownTransformer {
    fn default() -> Self {
        Self::new(Box::new(Html2MdConverter))
    }
}

impl MarkdownTransformer {
    pub fn new(converter: Box<dyn Converter>) -> Self {
        Self { converter }
    }

    /// Converts `html_body`, drops a leading copy of `title`, and collapses
    /// blank-line runs. The result has no enforced trailing newline.
    pub fn transform(&self, html_body: &str, title: &str) -> String {
        let markdown = self.converter.to_markdown(html_body);
        let lines = strip_leading_title(markdown.trim(), title);
        collapse_blank_lines(lines).join("\n")
    }
}

/// [`MarkdownTransformer::transform`] with the default converter.
pub fn transform(html_body: &str, title: &str) -> String {
    MarkdownTransformer::default().transform(html_body, title)
}

fn strip_leading_title<'a>(markdown: &'a str, title: &str) -> Vec<&'a str> {
    let heading = format!("# {title}");
    markdown
        .split('\n')
        .skip_while(|line| {
            let line = unescape_markdown(line.trim());
            line.is_empty() || line == title || line.starts_with(&heading)
        })
        .collect()
}

/// Drops the backslash in front of escaped ASCII punctuation (`\_`, `\*`).
fn unescape_markdown(line: &str) -> Cow<'_, str> {
    if !line.contains('\\') {
        return Cow::Borrowed(line);
    }
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if c == '\\' && next.is_ascii_punctuation() => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn collapse_blank_lines(lines: Vec<&str>) -> Vec<&str> {
    let mut cleaned = Vec::with_capacity(lines.len());
    let mut prev_blank = false;
    for line in lines {
        let is_blank = line.trim().is_empty();
        if !(is_blank && prev_blank) {
            cleaned.push(line);
        }
        prev_blank = is_blank;
    }
    cleaned
}
