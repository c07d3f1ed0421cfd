/*!
 * Path-addressed traversal over a streaming XML tokenizer.
 *
 * The XML-based subtitle readers issue several unrelated queries against
 * the same document (format-version check, head-metadata scan, frame
 * iteration). The tokenizer has no random access, so [`XmlDocument`]
 * buffers the whole document once and replays a fresh tokenizer from the
 * start of the buffer for every top-level query. Subtitle documents are
 * small text payloads; full buffering is cheaper than any index.
 *
 * Element text and attribute values are decoded with the engine's own
 * lenient [`unescape_xml_text`], never the tokenizer's strict entity
 * decoder, so HTML-ish entities in wild subtitle sources cannot fail the
 * parse.
 */

use std::io::Read;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::errors::ConversionError;
use crate::xml_text::unescape_xml_text;

/// A subtitle document held in memory, queryable by element path.
pub struct XmlDocument {
    data: Vec<u8>,
}

impl XmlDocument {
    /// Buffer a whole document from a byte source.
    pub fn from_reader<R: Read>(mut source: R) -> Result<Self, ConversionError> {
        let mut data = Vec::with_capacity(64 * 1024);
        source.read_to_end(&mut data)?;
        Ok(Self { data })
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Walk `path` from the document root and position a selection on the
    /// first matching element. Returns `None` when the path doesn't match.
    ///
    /// Every call replays the tokenizer from the start of the document, so
    /// queries are independent of each other.
    pub fn select_single_node(&self, path: &[&str]) -> Result<Option<XmlSelection<'_>>, ConversionError> {
        if path.is_empty() {
            return Ok(None);
        }

        let mut walker = Walker::new(&self.data);
        for (i, segment) in path.iter().enumerate() {
            if !walker.advance_to(segment, i + 1)? {
                return Ok(None);
            }
        }

        let node_name = walker.current().name.clone();
        let node_depth = walker.current().depth;
        Ok(Some(XmlSelection {
            walker,
            node_name,
            node_depth,
            yielded_first: false,
            exhausted: false,
        }))
    }

    /// Like [`select_single_node`](Self::select_single_node), but meant to
    /// be iterated: the selection yields every successive element of the
    /// same name at the same depth until the enclosing scope closes.
    pub fn select_nodes(&self, path: &[&str]) -> Result<Option<XmlSelection<'_>>, ConversionError> {
        self.select_single_node(path)
    }
}

/// A positioned query result; yields [`XmlNode`] handles one at a time.
///
/// The iteration is lazy and forward-only. Nodes borrow the selection and
/// must be dropped (or consumed by a text accessor) before the next call.
pub struct XmlSelection<'d> {
    walker: Walker<'d>,
    node_name: String,
    node_depth: usize,
    yielded_first: bool,
    exhausted: bool,
}

impl<'d> XmlSelection<'d> {
    /// The element the selection is currently positioned on.
    pub fn node(&mut self) -> XmlNode<'_, 'd> {
        XmlNode {
            walker: &mut self.walker,
        }
    }

    /// Advance to the next sibling-equivalent element, or `None` when the
    /// enclosing scope closes.
    pub fn next_node(&mut self) -> Result<Option<XmlNode<'_, 'd>>, ConversionError> {
        if self.exhausted {
            return Ok(None);
        }

        if !self.yielded_first {
            self.yielded_first = true;
            return Ok(Some(self.node()));
        }

        let name = self.node_name.clone();
        if self.walker.advance_to(&name, self.node_depth)? {
            Ok(Some(self.node()))
        } else {
            self.exhausted = true;
            Ok(None)
        }
    }
}

/// Handle on one element; attribute reads are cheap, text reads consume
/// the handle and advance the shared tokenizer to the element's end.
pub struct XmlNode<'w, 'd> {
    walker: &'w mut Walker<'d>,
}

impl XmlNode<'_, '_> {
    /// Attribute value by local name, entity references decoded.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.walker
            .current()
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Namespace URI the element resolved to, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.walker.current().namespace.as_deref()
    }

    /// Immediate text content of the element, or `None` when the element
    /// closes before any text.
    ///
    /// Fails with `MalformedDocument` if the document ends while the
    /// element is still open.
    pub fn text(self) -> Result<Option<String>, ConversionError> {
        let deep = self.walker.current().depth;

        loop {
            match self.walker.next_event()? {
                WalkEvent::Text(content) => {
                    if self.walker.depth != deep {
                        continue;
                    }
                    return Ok(Some(content));
                }
                WalkEvent::End => {
                    if self.walker.depth < deep {
                        return Ok(None);
                    }
                }
                WalkEvent::Start => {
                    if self.walker.depth < deep {
                        return Err(premature_end());
                    }
                }
                WalkEvent::Eof => return Err(premature_end()),
            }
        }
    }

    /// Fully-flattened text content of the element and its descendants.
    ///
    /// Returns `None` for a childless (self-closed) element; readers
    /// treat that as a blank auto-generated line. Fails with
    /// `MalformedDocument` if the document ends while the element is
    /// still open.
    pub fn inner_text(self) -> Result<Option<String>, ConversionError> {
        if self.walker.current().empty {
            return Ok(None);
        }

        let deep = self.walker.current().depth;
        let mut buffer = String::new();

        loop {
            match self.walker.next_event()? {
                WalkEvent::Text(content) => buffer.push_str(&content),
                WalkEvent::End => {
                    if self.walker.depth < deep {
                        return Ok(Some(buffer));
                    }
                }
                WalkEvent::Start => {
                    if self.walker.depth < deep {
                        return Err(premature_end());
                    }
                }
                WalkEvent::Eof => return Err(premature_end()),
            }
        }
    }
}

fn premature_end() -> ConversionError {
    ConversionError::MalformedDocument("document ended inside an open element".to_string())
}

// Info captured when the tokenizer enters an element.
struct ElementInfo {
    name: String,
    depth: usize,
    empty: bool,
    namespace: Option<String>,
    attrs: Vec<(String, String)>,
}

enum WalkEvent {
    Start,
    End,
    Text(String),
    Eof,
}

// Streaming walk state: the tokenizer plus the current element depth.
// Self-closed elements are surfaced as a Start with a synthetic End so
// traversal logic sees one uniform shape.
struct Walker<'d> {
    reader: NsReader<&'d [u8]>,
    depth: usize,
    pending_end: bool,
    current: Option<ElementInfo>,
}

impl<'d> Walker<'d> {
    fn new(data: &'d [u8]) -> Self {
        Self {
            reader: NsReader::from_reader(data),
            depth: 0,
            pending_end: false,
            current: None,
        }
    }

    fn current(&self) -> &ElementInfo {
        self.current
            .as_ref()
            .expect("walker positioned on an element")
    }

    fn next_event(&mut self) -> Result<WalkEvent, ConversionError> {
        if self.pending_end {
            self.pending_end = false;
            self.depth = self.depth.saturating_sub(1);
            return Ok(WalkEvent::End);
        }

        loop {
            let (resolve, event) = self.reader.read_resolved_event()?;
            match event {
                Event::Start(element) => {
                    self.depth += 1;
                    self.current = Some(capture_element(resolve, &element, self.depth, false)?);
                    return Ok(WalkEvent::Start);
                }
                Event::Empty(element) => {
                    self.depth += 1;
                    self.pending_end = true;
                    self.current = Some(capture_element(resolve, &element, self.depth, true)?);
                    return Ok(WalkEvent::Start);
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    return Ok(WalkEvent::End);
                }
                Event::Text(text) => {
                    let raw = String::from_utf8_lossy(&text.into_inner()).into_owned();
                    return Ok(WalkEvent::Text(unescape_xml_text(&raw)));
                }
                Event::CData(cdata) => {
                    let raw = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    return Ok(WalkEvent::Text(raw));
                }
                Event::Eof => return Ok(WalkEvent::Eof),
                // declarations, comments, processing instructions
                _ => continue,
            }
        }
    }

    // Scan forward for the next element named `name` at exactly
    // `target_depth`, skipping over intervening subtrees. False when the
    // enclosing scope closes or the document ends.
    fn advance_to(&mut self, name: &str, target_depth: usize) -> Result<bool, ConversionError> {
        let mut cursor = 0usize;

        loop {
            match self.next_event()? {
                WalkEvent::Start => {
                    let depth = self.depth;
                    if depth < target_depth {
                        return Ok(false);
                    }
                    if depth == target_depth && cursor == 0 && self.current().name == name {
                        return Ok(true);
                    }
                    cursor += 1;
                }
                WalkEvent::End => {
                    if cursor > 0 {
                        cursor -= 1;
                    }
                }
                WalkEvent::Text(_) => {}
                WalkEvent::Eof => return Ok(false),
            }
        }
    }
}

// Snapshot an element's name, namespace and decoded attributes. A free
// function so the tokenizer borrow held by `resolve` doesn't pin the
// whole walker.
fn capture_element(
    resolve: ResolveResult,
    element: &BytesStart,
    depth: usize,
    empty: bool,
) -> Result<ElementInfo, ConversionError> {
    let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();

    let namespace = match resolve {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.into_inner()).into_owned()),
        _ => None,
    };

    let mut attrs = Vec::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| ConversionError::MalformedDocument(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value).into_owned();
        attrs.push((key, unescape_xml_text(&raw)));
    }

    Ok(ElementInfo {
        name,
        depth,
        empty,
        namespace,
        attrs,
    })
}
