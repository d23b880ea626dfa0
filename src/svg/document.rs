//! Structured SVG document model.
//!
//! The tracer and the post-processor exchange SVG as text, but every
//! rewrite here goes through a parsed element tree instead of string
//! substitution: color reassignment and attribute renaming become total
//! functions over (tag, attrs, children) triples, with escaping handled by
//! the XML layer in exactly one place.
//!
//! The serializer intentionally drops XML prologs, doctypes and comments —
//! output is an embeddable bare `<svg>` fragment.

use std::fmt;
use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Element tags that carry a paintable `fill`.
pub const DRAWABLE_TAGS: &[&str] = &["path", "rect", "circle", "polygon", "ellipse"];

/// Error type for SVG parsing and serialization.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    Parse(String),

    #[error("SVG serialize error: {0}")]
    Serialize(String),

    #[error("missing <svg> root element")]
    MissingRoot,
}

/// The `viewBox` coordinate-system declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    /// Parse a `viewBox` attribute value (four numbers, whitespace or
    /// comma separated). Returns `None` for malformed values.
    pub fn parse(value: &str) -> Option<Self> {
        let mut numbers = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>());
        let min_x = numbers.next()?.ok()?;
        let min_y = numbers.next()?.ok()?;
        let width = numbers.next()?.ok()?;
        let height = numbers.next()?.ok()?;
        if numbers.next().is_some() {
            return None;
        }
        Some(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Trim trailing zeros the way hand-written SVG does.
        let n = |v: f64| {
            if v.fract() == 0.0 {
                format!("{}", v as i64)
            } else {
                format!("{}", v)
            }
        };
        write!(
            f,
            "{} {} {} {}",
            n(self.min_x),
            n(self.min_y),
            n(self.width),
            n(self.height)
        )
    }
}

/// A node in the element tree: a child element or character data.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
}

/// One SVG element: tag, ordered attributes, children.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgElement {
    pub tag: String,
    /// Attributes in document order. Order is preserved across rewrites so
    /// diffs against the tracer output stay readable.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
}

impl SvgElement {
    /// Create an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing in place or appending.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(index).1)
    }

    /// Whether this element is a paintable shape.
    pub fn is_drawable(&self) -> bool {
        DRAWABLE_TAGS.contains(&self.tag.as_str())
    }
}

/// A parsed SVG document rooted at an `<svg>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    pub root: SvgElement,
}

impl SvgDocument {
    /// Parse SVG markup into an element tree.
    ///
    /// XML declarations, doctypes, processing instructions and comments
    /// are dropped; blank whitespace between elements is not retained.
    ///
    /// # Errors
    ///
    /// Returns [`SvgError::Parse`] on malformed XML and
    /// [`SvgError::MissingRoot`] when the top-level element is not `<svg>`.
    pub fn parse(input: &str) -> Result<Self, SvgError> {
        let mut reader = Reader::from_str(input);
        let mut stack: Vec<SvgElement> = Vec::new();
        let mut root: Option<SvgElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    stack.push(element_from(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    let element = element_from(&e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(SvgNode::Element(element)),
                        None => {
                            if root.is_none() {
                                root = Some(element);
                            }
                        }
                    }
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| SvgError::Parse("unbalanced closing tag".to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(SvgNode::Element(element)),
                        None => {
                            if root.is_none() {
                                root = Some(element);
                            }
                        }
                    }
                }
                Ok(Event::Text(t)) => {
                    let decoded = t.decode().map_err(|e| SvgError::Parse(e.to_string()))?;
                    let text = quick_xml::escape::unescape(&decoded)
                        .map_err(|e| SvgError::Parse(e.to_string()))?
                        .into_owned();
                    if !text.trim().is_empty() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(SvgNode::Text(text));
                        }
                    }
                }
                Ok(Event::CData(t)) => {
                    let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(SvgNode::Text(text));
                    }
                }
                Ok(Event::Eof) => {
                    if !stack.is_empty() {
                        return Err(SvgError::Parse("unclosed element at end of input".to_string()));
                    }
                    break;
                }
                // Decl, DocType, PI, Comment: dropped from the model.
                Ok(_) => {}
                Err(e) => {
                    return Err(SvgError::Parse(format!(
                        "at byte {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
            }
        }

        let root = root.ok_or(SvgError::MissingRoot)?;
        if root.tag != "svg" {
            return Err(SvgError::MissingRoot);
        }
        Ok(Self { root })
    }

    /// Serialize back to markup.
    pub fn to_svg_string(&self) -> Result<String, SvgError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        write_element(&mut writer, &self.root)?;
        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| SvgError::Serialize(e.to_string()))
    }

    /// The root `viewBox`, if present and well-formed.
    pub fn view_box(&self) -> Option<ViewBox> {
        self.root.attr("viewBox").and_then(ViewBox::parse)
    }

    /// Set the root `viewBox`.
    pub fn set_view_box(&mut self, view_box: ViewBox) {
        self.root.set_attr("viewBox", view_box.to_string());
    }

    /// Apply `f` to every drawable element, in document order.
    pub fn for_each_drawable(&mut self, mut f: impl FnMut(&mut SvgElement)) {
        visit_drawables(&mut self.root, &mut f);
    }

    /// The `fill` values of drawable elements, in document order.
    pub fn drawable_fills(&self) -> Vec<String> {
        fn collect(element: &SvgElement, out: &mut Vec<String>) {
            if element.is_drawable() {
                if let Some(fill) = element.attr("fill") {
                    out.push(fill.to_string());
                }
            }
            for child in &element.children {
                if let SvgNode::Element(e) = child {
                    collect(e, out);
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.root, &mut out);
        out
    }

    /// Apply `f` to every element (drawable or not), in document order.
    pub fn for_each_element(&mut self, mut f: impl FnMut(&mut SvgElement)) {
        visit_elements(&mut self.root, &mut f);
    }
}

fn element_from(e: &BytesStart<'_>) -> Result<SvgElement, SvgError> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| SvgError::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| SvgError::Parse(e.to_string()))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(SvgElement {
        tag,
        attrs,
        children: Vec::new(),
    })
}

fn write_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    element: &SvgElement,
) -> Result<(), SvgError> {
    let serialize = |e: &dyn fmt::Display| SvgError::Serialize(e.to_string());

    let mut start = BytesStart::new(element.tag.as_str());
    for (key, value) in &element.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| serialize(&e))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| serialize(&e))?;
    for child in &element.children {
        match child {
            SvgNode::Element(e) => write_element(writer, e)?,
            SvgNode::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| serialize(&e))?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.tag.as_str())))
        .map_err(|e| serialize(&e))?;
    Ok(())
}

fn visit_drawables(element: &mut SvgElement, f: &mut impl FnMut(&mut SvgElement)) {
    if element.is_drawable() {
        f(element);
    }
    for child in &mut element.children {
        if let SvgNode::Element(e) = child {
            visit_drawables(e, f);
        }
    }
}

fn visit_elements(element: &mut SvgElement, f: &mut impl FnMut(&mut SvgElement)) {
    f(element);
    for child in &mut element.children {
        if let SvgNode::Element(e) = child {
            visit_elements(e, f);
        }
    }
}
