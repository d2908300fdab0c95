//! Owned XML element tree
//!
//! L5X files are small enough to hold in memory, and the merge needs to
//! detach a subtree from one document and graft it into another. This module
//! reads a document into an owned tree with `quick-xml`, and writes it back
//! keeping element order, attribute order, CDATA sections and comments.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt;
use std::path::Path;

use shared::{LogixError, Result};

fn xml_error(err: impl fmt::Display) -> LogixError {
    LogixError::Xml(err.to_string())
}

/// A child of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Unescaped character data
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
}

/// An element with its attributes and children, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder: append a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing its value in place if already present
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn push_node(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Direct child elements, skipping text and comments
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First element named `tag` in document order, this element included
    pub fn find_first(&self, tag: &str) -> Option<&Element> {
        if self.name == tag {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find_first(tag))
    }

    pub fn find_first_mut(&mut self, tag: &str) -> Option<&mut Element> {
        if self.name == tag {
            return Some(self);
        }
        for node in &mut self.children {
            if let Node::Element(child) = node {
                if let Some(found) = child.find_first_mut(tag) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Every element named `tag` in document order, this element included
    pub fn find_all<'a>(&'a self, tag: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_named(tag, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, tag: &str, found: &mut Vec<&'a Element>) {
        if self.name == tag {
            found.push(self);
        }
        for child in self.child_elements() {
            child.collect_named(tag, found);
        }
    }

    /// Detach the first descendant matching `predicate`, in document order.
    ///
    /// Only one element is removed; later matches are left in place.
    pub fn remove_first(&mut self, predicate: &dyn Fn(&Element) -> bool) -> Option<Element> {
        for index in 0..self.children.len() {
            let matched = match &self.children[index] {
                Node::Element(child) => predicate(child),
                _ => false,
            };

            if matched {
                return match self.children.remove(index) {
                    Node::Element(element) => Some(element),
                    _ => None,
                };
            }

            if let Node::Element(child) = &mut self.children[index] {
                if let Some(found) = child.remove_first(predicate) {
                    return Some(found);
                }
            }
        }
        None
    }
}

/// The `<?xml ...?>` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Declaration {
    fn from_event(decl: &BytesDecl<'_>) -> Result<Self> {
        let version = String::from_utf8_lossy(&decl.version().map_err(xml_error)?).into_owned();
        let encoding = match decl.encoding() {
            Some(value) => Some(String::from_utf8_lossy(&value.map_err(xml_error)?).into_owned()),
            None => None,
        };
        let standalone = match decl.standalone() {
            Some(value) => Some(String::from_utf8_lossy(&value.map_err(xml_error)?).into_owned()),
            None => None,
        };

        Ok(Self {
            version,
            encoding,
            standalone,
        })
    }
}

/// A parsed XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    declaration: Option<Declaration>,
    /// Comments and processing instructions ahead of the root element
    prolog: Vec<Node>,
    root: Element,
}

impl XmlDocument {
    pub fn new(root: Element) -> Self {
        Self {
            declaration: Some(Declaration {
                version: "1.0".to_string(),
                encoding: Some("UTF-8".to_string()),
                standalone: Some("yes".to_string()),
            }),
            prolog: Vec::new(),
            root,
        }
    }

    /// Read and parse a file
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content).map_err(|e| match e {
            LogixError::Xml(message) => LogixError::Xml(format!("{}: {}", path.display(), message)),
            other => other,
        })
    }

    pub fn parse_str(source: &str) -> Result<Self> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let mut reader = Reader::from_str(source);

        let mut declaration = None;
        let mut prolog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Decl(decl) => declaration = Some(Declaration::from_event(&decl)?),
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| LogixError::Xml("unexpected end tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    // Whitespace around the root element is not kept.
                    if let Some(parent) = stack.last_mut() {
                        let text = text.unescape().map_err(xml_error)?.into_owned();
                        parent.push_node(Node::Text(text));
                    }
                }
                Event::CData(data) => {
                    let parent = stack
                        .last_mut()
                        .ok_or_else(|| LogixError::Xml("CDATA outside root element".to_string()))?;
                    let data = String::from_utf8_lossy(&data).into_owned();
                    parent.push_node(Node::CData(data));
                }
                Event::Comment(comment) => {
                    let node = Node::Comment(String::from_utf8_lossy(&comment).into_owned());
                    match stack.last_mut() {
                        Some(parent) => parent.push_node(node),
                        None if root.is_none() => prolog.push(node),
                        None => {}
                    }
                }
                Event::PI(pi) => {
                    let node = Node::ProcessingInstruction(String::from_utf8_lossy(&pi).into_owned());
                    match stack.last_mut() {
                        Some(parent) => parent.push_node(node),
                        None if root.is_none() => prolog.push(node),
                        None => {}
                    }
                }
                Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(LogixError::Xml(format!("unclosed element '{}'", open.name())));
        }

        let root = root.ok_or_else(|| LogixError::Xml("document has no root element".to_string()))?;
        Ok(Self {
            declaration,
            prolog,
            root,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    /// Serialize the whole document
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());

        if let Some(decl) = &self.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new(
                    &decl.version,
                    decl.encoding.as_deref(),
                    decl.standalone.as_deref(),
                )))
                .map_err(xml_error)?;
            writer.get_mut().push(b'\n');
        }

        for node in &self.prolog {
            write_node(&mut writer, node)?;
            writer.get_mut().push(b'\n');
        }

        write_element(&mut writer, &self.root)?;
        Ok(writer.into_inner())
    }

    /// Serialize to a file, replacing it if it exists
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(xml_error)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(LogixError::Xml(format!(
                "second root element '{}'",
                element.name()
            )))
        }
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let start = BytesStart::new(element.name.as_str()).with_attributes(
        element
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())),
    );

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(xml_error)?;
        return Ok(());
    }

    writer.write_event(Event::Start(start)).map_err(xml_error)?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(xml_error)?;
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    let event = match node {
        Node::Element(element) => return write_element(writer, element),
        Node::Text(text) => Event::Text(BytesText::new(text.as_str())),
        Node::CData(data) => Event::CData(BytesCData::new(data.as_str())),
        Node::Comment(comment) => Event::Comment(BytesText::from_escaped(comment.as_str())),
        Node::ProcessingInstruction(pi) => Event::PI(BytesPI::new(pi.as_str())),
    };
    writer.write_event(event).map_err(xml_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTINE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<!-- exported -->
<Routine Name="Logic" Type="ST">
  <STContent>
    <Line Number="0"><![CDATA[IF a < b THEN]]></Line>
    <Line Number="1"><![CDATA[END_IF;]]></Line>
  </STContent>
  <Description>Motor &amp; pump</Description>
  <Empty/>
</Routine>"#;

    #[test]
    fn test_parse_preserves_structure() {
        let doc = XmlDocument::parse_str(ROUTINE).unwrap();
        let root = doc.root();

        assert_eq!(root.name(), "Routine");
        assert_eq!(root.attribute("Name"), Some("Logic"));
        assert_eq!(root.attribute("Missing"), None);

        let names: Vec<&str> = root.child_elements().map(|e| e.name()).collect();
        assert_eq!(names, vec!["STContent", "Description", "Empty"]);

        let lines = root.find_all("Line");
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].children(),
            &[Node::CData("IF a < b THEN".to_string())]
        );

        let description = root.find_first("Description").unwrap();
        assert_eq!(description.children(), &[Node::Text("Motor & pump".to_string())]);
    }

    #[test]
    fn test_serialize_then_reparse_is_identical() {
        let doc = XmlDocument::parse_str(ROUTINE).unwrap();
        let bytes = doc.to_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(text.contains("<![CDATA[IF a < b THEN]]>"));
        assert!(text.contains("<!-- exported -->"));
        assert!(text.contains("<Empty/>"));

        let again = XmlDocument::parse_str(&text).unwrap();
        assert_eq!(again, doc);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let source = format!("\u{feff}{}", "<Root A=\"1\"/>");
        let doc = XmlDocument::parse_str(&source).unwrap();
        assert_eq!(doc.root().attribute("A"), Some("1"));
    }

    #[test]
    fn test_malformed_documents_rejected() {
        assert!(XmlDocument::parse_str("<A><B></A>").is_err());
        assert!(XmlDocument::parse_str("<A>").is_err());
        assert!(XmlDocument::parse_str("").is_err());
        assert!(XmlDocument::parse_str("<A/><B/>").is_err());
    }

    #[test]
    fn test_remove_first_takes_document_order() {
        let mut root = Element::new("Root")
            .with_child(
                Element::new("Group").with_child(Element::new("Item").with_attribute("Name", "x")),
            )
            .with_child(Element::new("Item").with_attribute("Name", "x"))
            .with_child(Element::new("Item").with_attribute("Name", "y"));

        let removed = root
            .remove_first(&|e| e.name() == "Item" && e.attribute("Name") == Some("x"))
            .unwrap();
        assert_eq!(removed.attribute("Name"), Some("x"));

        // The nested one went first; the top-level duplicate is untouched.
        assert!(root.find_first("Group").unwrap().find_first("Item").is_none());
        assert_eq!(root.find_all("Item").len(), 2);
    }

    #[test]
    fn test_remove_first_never_removes_self() {
        let mut root = Element::new("Item");
        assert!(root.remove_first(&|e| e.name() == "Item").is_none());
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut element = Element::new("E").with_attribute("A", "1").with_attribute("B", "2");
        element.set_attribute("A", "3");
        assert_eq!(
            element.attributes(),
            &[("A".to_string(), "3".to_string()), ("B".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.xml");
        let doc = XmlDocument::new(Element::new("Root").with_child(Element::new("Child")));

        doc.write(&path).unwrap();
        let read = XmlDocument::read(&path).unwrap();
        assert_eq!(read, doc);
    }
}
