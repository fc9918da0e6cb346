//! HTML rendering of validator output
//!
//! The validator is run with `--format json` when an HTML report is wanted;
//! its JSON is turned into a standalone page here.

use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "report.html";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
body { font-family: sans-serif; margin: 2em; color: #222; }
h1 { font-size: 1.5em; }
.summary span { margin-right: 1.5em; font-weight: bold; }
.error { color: #b00020; }
.warning { color: #a66300; }
.info { color: #0b5394; }
section { margin-top: 2em; }
ol { padding-left: 1.5em; }
li { margin-bottom: 1em; }
.location { color: #666; font-size: 0.9em; }
pre, code { background: #f5f5f5; padding: 0.2em 0.4em; white-space: pre-wrap; }
</style>
</head>
<body>
<h1>{{ title }}</h1>
<p class="location">Generated {{ generated_at }}</p>
{% if verbatim %}
<pre>{{ raw }}</pre>
{% else %}
<p class="summary">
<span class="error">Errors: {{ errors }}</span>
<span class="warning">Warnings: {{ warnings }}</span>
<span class="info">Info: {{ infos }}</span>
</p>
{% for document in documents %}
<section>
<h2>{{ document.url }}</h2>
<ol>
{% for message in document.messages %}
<li class="{{ message.severity }}">
<strong>{{ message.severity }}</strong>: {{ message.message }}
{% if message.location %}<div class="location">{{ message.location }}</div>{% endif %}
{% if message.extract %}<pre>{{ message.extract }}</pre>{% endif %}
</li>
{% endfor %}
</ol>
</section>
{% endfor %}
{% endif %}
</body>
</html>
"#;

/// One message from the validator's JSON output
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VnuMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub sub_type: Option<String>,
    pub url: Option<String>,
    pub first_line: Option<u64>,
    pub last_line: Option<u64>,
    pub first_column: Option<u64>,
    pub last_column: Option<u64>,
    #[serde(default)]
    pub message: String,
    pub extract: Option<String>,
}

/// Top-level shape of `--format json` output
#[derive(Debug, Clone, Deserialize)]
pub struct VnuReport {
    #[serde(default)]
    pub messages: Vec<VnuMessage>,
}

/// How a message is counted and styled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl VnuMessage {
    pub fn severity(&self) -> Severity {
        match (self.kind.as_str(), self.sub_type.as_deref()) {
            ("error" | "non-document-error", _) => Severity::Error,
            ("info", Some("warning")) => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// `line 3, column 5` style position, if the validator reported one
    fn location(&self) -> Option<String> {
        let line = self.last_line.or(self.first_line)?;
        let mut location = format!("line {}", line);
        if let Some(column) = self.first_column.or(self.last_column) {
            location.push_str(&format!(", column {}", column));
        }
        Some(location)
    }
}

#[derive(Debug, Serialize)]
struct MessageView<'a> {
    severity: Severity,
    message: &'a str,
    location: Option<String>,
    extract: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DocumentView<'a> {
    url: &'a str,
    messages: Vec<MessageView<'a>>,
}

/// Group messages by document, keeping first-seen order
fn group_by_document(messages: &[VnuMessage]) -> Vec<DocumentView<'_>> {
    let mut documents: Vec<DocumentView<'_>> = Vec::new();

    for message in messages {
        let url = message.url.as_deref().unwrap_or("(no document)");
        let view = MessageView {
            severity: message.severity(),
            message: &message.message,
            location: message.location(),
            extract: message.extract.as_deref(),
        };

        match documents.iter_mut().find(|d| d.url == url) {
            Some(document) => document.messages.push(view),
            None => documents.push(DocumentView {
                url,
                messages: vec![view],
            }),
        }
    }

    documents
}

/// Render validator output as an HTML report.
///
/// Output that is not validator JSON is shown verbatim (escaped) instead.
pub fn render_html(raw: &str) -> String {
    let mut context = Context::new();
    context.insert("title", "HTML validation report");
    context.insert(
        "generated_at",
        &chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    );

    match serde_json::from_str::<VnuReport>(raw) {
        Ok(report) => {
            let count = |severity| {
                report
                    .messages
                    .iter()
                    .filter(|m| m.severity() == severity)
                    .count()
            };
            context.insert("errors", &count(Severity::Error));
            context.insert("warnings", &count(Severity::Warning));
            context.insert("infos", &count(Severity::Info));
            context.insert("documents", &group_by_document(&report.messages));
            context.insert("verbatim", &false);
        }
        Err(e) => {
            log::debug!("Validator output is not JSON ({}), rendering verbatim", e);
            context.insert("verbatim", &true);
            context.insert("raw", raw);
        }
    }

    let mut tera = Tera::default();
    tera.set_escape_fn(escape_html);
    let rendered = tera
        .add_raw_template(TEMPLATE_NAME, TEMPLATE)
        .and_then(|()| tera.render(TEMPLATE_NAME, &context));

    match rendered {
        Ok(html) => html,
        Err(e) => {
            log::warn!("Failed to render HTML report: {}", e);
            format!("<!DOCTYPE html>\n<pre>{}</pre>\n", escape_html(raw))
        }
    }
}

/// Escape text for HTML content and quoted attribute values. Unlike tera's
/// default, `/` is left alone so URLs stay readable.
fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"messages":[
        {"type":"error","url":"file:/site/index.html","lastLine":12,"firstColumn":5,"lastColumn":9,
         "message":"Stray end tag <div>.","extract":"</p></div>"},
        {"type":"info","subType":"warning","url":"file:/site/index.html","lastLine":3,
         "message":"Consider adding a lang attribute."},
        {"type":"info","url":"file:/site/about.html","message":"Checking document."},
        {"type":"non-document-error","subType":"io","message":"HTTP resource not retrievable."}
    ]}"#;

    #[test]
    fn test_severity_classification() {
        let report: VnuReport = serde_json::from_str(SAMPLE).unwrap();
        let severities: Vec<_> = report.messages.iter().map(|m| m.severity()).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Error,
                Severity::Warning,
                Severity::Info,
                Severity::Error
            ]
        );
    }

    #[test]
    fn test_render_counts_and_groups() {
        let html = render_html(SAMPLE);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Errors: 2"));
        assert!(html.contains("Warnings: 1"));
        assert!(html.contains("Info: 1"));
        assert!(html.contains("file:/site/index.html"));
        assert!(html.contains("file:/site/about.html"));
        assert!(html.contains("line 12, column 5"));

        let index = html.find("file:/site/index.html").unwrap();
        let about = html.find("file:/site/about.html").unwrap();
        assert!(index < about);
    }

    #[test]
    fn test_render_escapes_message_text() {
        let html = render_html(SAMPLE);
        assert!(html.contains("Stray end tag &lt;div&gt;."));
        assert!(!html.contains("<div>."));
    }

    #[test]
    fn test_render_non_json_verbatim() {
        let html = render_html("Error: Unable to access jarfile <vnu.jar>");
        assert!(html.contains("<pre>Error: Unable to access jarfile &lt;vnu.jar&gt;</pre>"));
    }

    #[test]
    fn test_render_keeps_urls_readable() {
        let html = render_html(
            r#"{"messages":[{"type":"error","url":"https://example.com/a/b.html","message":"Bad value \"x\" for 'id'."}]}"#,
        );
        assert!(html.contains("https://example.com/a/b.html"));
        assert!(!html.contains("&#x2F;"));
        assert!(html.contains("Bad value &quot;x&quot; for "));
        assert!(!html.contains("'id'"));
    }

    #[test]
    fn test_render_empty_messages() {
        let html = render_html(r#"{"messages":[]}"#);
        assert!(html.contains("Errors: 0"));
        assert!(html.contains("Warnings: 0"));
    }
}
