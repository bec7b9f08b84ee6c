//! WebVTT document generation from bracket-tag subtitle text

use crate::registry::ResourceRegistry;
use crate::resource::{Blob, Handle, VTT_MIME};

/// Header every generated document starts with
pub const WEBVTT_HEADER: &str = "WEBVTT FILE\r\n\r\n";

/// Appended after the rewritten body
const TRAILER: &str = "\r\n\r\n";

// helper.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

/// Rewrite `{\X}`, `{\X1}`, `{X}` and `{/X}` markers (X in i, b, u) into
/// WebVTT tags. The rules run in that order; other braces are left alone.
pub fn rewrite_tags(text: &str) -> String {
    let rules: [(&regex::Regex, &str); 4] = [
        (regex!(r"\{\\([ibu])\}"), "</${1}>"),
        (regex!(r"\{\\([ibu])1\}"), "<${1}>"),
        (regex!(r"\{([ibu])\}"), "<${1}>"),
        (regex!(r"\{/([ibu])\}"), "</${1}>"),
    ];

    let mut out = text.to_owned();
    for (re, replacement) in rules {
        out = re.replace_all(&out, replacement).into_owned();
    }
    out
}

/// Turn `HH:MM:SS,mmm` into `HH:MM:SS.mmm`. Only the separator changes.
pub fn normalize_timestamps(text: &str) -> String {
    regex!(r"([0-9]{2}:[0-9]{2}:[0-9]{2}),([0-9]{3})")
        .replace_all(text, "${1}.${2}")
        .into_owned()
}

/// Rewritten cue text followed by a blank line
pub fn to_vtt_body(text: &str) -> String {
    let mut body = normalize_timestamps(&rewrite_tags(text));
    body.push_str(TRAILER);
    body
}

/// Complete WebVTT document for the given subtitle text
pub fn build_document(text: &str) -> String {
    let body = to_vtt_body(text);
    let mut document = String::with_capacity(WEBVTT_HEADER.len() + body.len());
    document.push_str(WEBVTT_HEADER);
    document.push_str(&body);
    document
}

/// Wrap a document as a `text/vtt` blob
pub fn package_as_resource(document: String) -> Blob {
    Blob::new(document, VTT_MIME)
}

/// Register a blob so it can be resolved by handle
pub fn create_handle<G>(registry: &G, resource: Blob) -> Handle
where
    G: ResourceRegistry + ?Sized,
{
    registry.register(resource)
}
