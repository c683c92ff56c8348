mod reader;
mod writer;

use thiserror::Error;

pub use self::reader::{Scope, XmlReader};
pub use self::writer::XmlWriter;

/// Binds a short prefix to a namespace URI.
///
/// For the reader, `uri` is a pattern where `*` matches any run of characters, so several
/// concrete URIs (e.g. both SOAP envelope versions) can share one prefix. For the writer it is
/// declared verbatim on the root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: &'static str,
    pub uri: &'static str,
}

impl Namespace {
    pub const fn new(prefix: &'static str, uri: &'static str) -> Self {
        Self { prefix, uri }
    }
}

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("Error parsing XML: {0}")]
    Syntax(#[from] quick_xml::Error),
    #[error("Error writing XML: {0}")]
    Write(#[from] std::io::Error),
    #[error("Invalid UTF-8 in XML: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("Undeclared namespace prefix `{0}`")]
    UnknownPrefix(Box<str>),
    #[error("Document has no root element")]
    EmptyDocument,
    #[error("Unexpected end of document inside `{0}`")]
    UnclosedElement(Box<str>),
    #[error("{path}: invalid numerical value")]
    InvalidNumber { path: Box<str> },
    #[error("Cannot leave the root element")]
    LeaveRoot,
}

/// Matches `value` against `pattern`, where `*` matches any (possibly empty) run of characters.
fn wildcard_match(pattern: &str, value: &str) -> bool {
    let Some((head, tail)) = pattern.split_once('*') else {
        return pattern == value;
    };

    let Some(rest) = value.strip_prefix(head) else {
        return false;
    };

    // try every split point, shortest first
    rest.char_indices()
        .map(|(index, _)| index)
        .chain(std::iter::once(rest.len()))
        .any(|index| wildcard_match(tail, &rest[index..]))
}

/// Finds the prefix a document namespace URI is rewritten to.
///
/// A single trailing `/` on the URI is ignored, vendors are inconsistent about it.
fn normalize_namespace<'n>(namespaces: &'n [Namespace], uri: &str) -> Option<&'n str> {
    let trimmed = uri.strip_suffix('/').unwrap_or(uri);

    namespaces
        .iter()
        .find(|namespace| {
            wildcard_match(namespace.uri, uri) || wildcard_match(namespace.uri, trimmed)
        })
        .map(|namespace| namespace.prefix)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::constants::WSD_NAMESPACES_READ;
    use crate::xml::{normalize_namespace, wildcard_match};

    #[test]
    fn wildcard_matches_scheme_variants() {
        assert!(wildcard_match("http*://example.org", "http://example.org"));
        assert!(wildcard_match("http*://example.org", "https://example.org"));
        assert!(!wildcard_match("http*://example.org", "ftp://example.org"));
        assert!(!wildcard_match("http*://example.org", "http://example.org/x"));
    }

    #[test]
    fn wildcard_without_star_is_exact() {
        assert!(wildcard_match("urn:a", "urn:a"));
        assert!(!wildcard_match("urn:a", "urn:ab"));
    }

    #[test]
    fn wildcard_trailing_star() {
        assert!(wildcard_match("urn:*", "urn:"));
        assert!(wildcard_match("urn:*", "urn:anything"));
    }

    #[test]
    fn both_soap_versions_share_a_prefix() {
        assert_eq!(
            normalize_namespace(
                WSD_NAMESPACES_READ,
                "http://schemas.xmlsoap.org/soap/envelope/"
            ),
            Some("s")
        );
        assert_eq!(
            normalize_namespace(
                WSD_NAMESPACES_READ,
                "http://www.w3.org/2003/05/soap-envelope"
            ),
            Some("s")
        );
    }

    #[test]
    fn unknown_namespace_is_not_normalized() {
        assert_eq!(
            normalize_namespace(WSD_NAMESPACES_READ, "urn:vendor:extension"),
            None
        );
    }
}
