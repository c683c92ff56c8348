use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace as XmlNamespace, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::{Level, event};

use crate::constants::STRING_DEFAULT_CAPACITY;
use crate::xml::{Namespace, XmlError, normalize_namespace};

#[derive(Debug)]
struct Node {
    /// `/`-separated path from the root, with namespace prefixes normalized
    path: String,
    depth: usize,
    value: String,
}

/// Cursor over the elements of a parsed document, in document order.
///
/// Every element is addressed by its path from the root (`s:Envelope/s:Body/...`), where
/// the prefixes are taken from the namespace table passed to [`XmlReader::begin`] rather
/// than from the document. The root element has depth 0.
#[derive(Debug)]
pub struct XmlReader {
    nodes: Box<[Node]>,
    current: usize,
    /// The cursor left the subtree it was bounded to by [`XmlReader::deep_next`].
    /// `current` then points at the next node in document order.
    exhausted: bool,
}

impl XmlReader {
    /// Parses `xml`, positioning the cursor at the root element.
    pub fn begin(xml: &[u8], namespaces: &[Namespace]) -> Result<Self, XmlError> {
        let mut reader = NsReader::from_reader(xml);

        let mut nodes: Vec<Node> = Vec::new();
        // indices into `nodes` of the elements that are currently open
        let mut open: Vec<usize> = Vec::new();

        loop {
            let (resolved, xml_event) = reader.read_resolved_event()?;

            match xml_event {
                Event::Start(start) => {
                    let name = qualified_name(resolved, &start, namespaces)?;
                    let index = push_node(&mut nodes, &open, &name);

                    open.push(index);
                },
                Event::Empty(start) => {
                    let name = qualified_name(resolved, &start, namespaces)?;

                    push_node(&mut nodes, &open, &name);
                },
                Event::End(_) => {
                    open.pop();
                },
                Event::Text(text) => {
                    if let Some(&index) = open.last() {
                        nodes[index].value.push_str(&text.unescape()?);
                    }
                },
                Event::CData(cdata) => {
                    if let Some(&index) = open.last() {
                        nodes[index].value.push_str(std::str::from_utf8(&cdata)?);
                    }
                },
                Event::Eof => {
                    break;
                },
                _ => {
                    // comments, declarations, processing instructions and doctypes carry nothing we use
                },
            }
        }

        if let Some(&index) = open.last() {
            return Err(XmlError::UnclosedElement(
                std::mem::take(&mut nodes[index].path).into_boxed_str(),
            ));
        }

        if nodes.is_empty() {
            return Err(XmlError::EmptyDocument);
        }

        for node in &mut nodes {
            let trimmed = node.value.trim();

            if trimmed.len() != node.value.len() {
                node.value = trimmed.to_owned();
            }
        }

        event!(Level::TRACE, nodes = nodes.len(), "parsed XML document");

        Ok(Self {
            nodes: nodes.into_boxed_slice(),
            current: 0,
            exhausted: false,
        })
    }

    fn node(&self) -> Option<&Node> {
        if self.exhausted {
            None
        } else {
            self.nodes.get(self.current)
        }
    }

    /// `true` at the end of the document, or past the end of the subtree the cursor was bounded to.
    pub fn end(&self) -> bool {
        self.node().is_none()
    }

    /// Depth of the current node, the root being 0.
    pub fn depth(&self) -> usize {
        self.node().map_or(0, |node| node.depth)
    }

    /// Normalized path of the current node, empty at the end.
    pub fn node_path(&self) -> &str {
        self.node().map_or("", |node| &node.path)
    }

    /// Normalized name of the current node, empty at the end.
    pub fn node_name(&self) -> &str {
        let path = self.node_path();

        path.rsplit_once('/').map_or(path, |(_, name)| name)
    }

    /// Trimmed text content of the current node.
    pub fn node_value(&self) -> &str {
        self.node().map_or("", |node| &node.value)
    }

    pub fn node_value_uint(&self) -> Result<u32, XmlError> {
        self.node_value()
            .parse::<u32>()
            .map_err(|_| XmlError::InvalidNumber {
                path: Box::from(self.node_path()),
            })
    }

    /// Moves to the next node in document order, descending into children first.
    pub fn next(&mut self) {
        if self.exhausted {
            // `current` already is the next node
            self.exhausted = false;
        } else if self.current < self.nodes.len() {
            self.current += 1;
        }
    }

    /// Moves to the next node in document order, as long as it is still a descendant of the
    /// subtree whose root sits at `level`.
    ///
    /// Once the subtree is exhausted, [`XmlReader::end`] reports `true` until an enclosing
    /// loop calls `deep_next` with a smaller `level`, which resumes at the first node following
    /// the exhausted subtree.
    pub fn deep_next(&mut self, level: usize) {
        if !self.exhausted && self.current < self.nodes.len() {
            self.current += 1;
        }

        self.exhausted = self
            .nodes
            .get(self.current)
            .is_some_and(|node| node.depth <= level);
    }

    /// Captures the current node as the root of a subtree walk.
    pub fn scope(&self) -> Scope {
        Scope {
            depth: self.depth(),
            prefix_len: self.node_path().len(),
        }
    }
}

/// Root of a subtree walk, see [`XmlReader::scope`].
///
/// ```ignore
/// let scope = xml.scope();
///
/// while !xml.end() {
///     match scope.relative_path(&xml) {
///         "/scan:Child" => { /* ... */ },
///         _ => {},
///     }
///
///     scope.advance(&mut xml);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    depth: usize,
    prefix_len: usize,
}

impl Scope {
    /// Path of the current node relative to the scope's root; `""` for the root itself.
    pub fn relative_path(self, xml: &XmlReader) -> &str {
        xml.node_path().get(self.prefix_len..).unwrap_or("")
    }

    /// Moves to the next node inside the scope.
    pub fn advance(self, xml: &mut XmlReader) {
        xml.deep_next(self.depth);
    }
}

fn push_node(nodes: &mut Vec<Node>, open: &[usize], name: &str) -> usize {
    let (path, depth) = match open.last() {
        Some(&parent) => {
            let parent = &nodes[parent];

            let mut path = String::with_capacity(parent.path.len() + 1 + name.len());
            path.push_str(&parent.path);
            path.push('/');
            path.push_str(name);

            (path, parent.depth + 1)
        },
        None => (name.to_owned(), 0),
    };

    nodes.push(Node {
        path,
        depth,
        value: String::with_capacity(STRING_DEFAULT_CAPACITY),
    });

    nodes.len() - 1
}

fn qualified_name(
    resolved: ResolveResult<'_>,
    start: &BytesStart<'_>,
    namespaces: &[Namespace],
) -> Result<String, XmlError> {
    let local_name = std::str::from_utf8(start.local_name().into_inner())?;

    let prefix = match resolved {
        ResolveResult::Bound(XmlNamespace(uri)) => {
            let uri = std::str::from_utf8(uri)?;

            match normalize_namespace(namespaces, uri) {
                Some(prefix) => Some(prefix),
                None => start
                    .name()
                    .prefix()
                    .map(|prefix| std::str::from_utf8(prefix.into_inner()))
                    .transpose()?,
            }
        },
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(XmlError::UnknownPrefix(
                String::from_utf8_lossy(&prefix).into(),
            ));
        },
    };

    Ok(match prefix {
        Some(prefix) => format!("{}:{}", prefix, local_name),
        None => local_name.to_owned(),
    })
}
