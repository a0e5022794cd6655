use crate::error::Result;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

/// One named node of the request document: an ordered attribute list plus
/// ordered child sections. Attribute and section order is part of the
/// vendor schema and must be reproduced exactly, so both are plain vectors
/// filled in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Section {
    name: String,
    attributes: Vec<(String, Option<String>)>,
    children: Vec<Section>,
}

impl Section {
    pub fn new(name: &str) -> Self {
        Section {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends an attribute. `None` is kept and later serialized as an
    /// empty string; the vendor schema expects optional fields to be
    /// present rather than omitted.
    pub fn set(&mut self, key: &str, value: Option<String>) {
        self.attributes.push((key.to_string(), value));
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn add_child(&mut self, child: Section) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Section] {
        &self.children
    }

    fn start_tag(&self) -> BytesStart<'_> {
        let mut elem = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            elem.push_attribute((key.as_str(), value.as_deref().unwrap_or("")));
        }
        elem
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        if self.children.is_empty() {
            writer.write_event(Event::Empty(self.start_tag()))?;
            return Ok(());
        }

        writer.write_event(Event::Start(self.start_tag()))?;
        for child in &self.children {
            child.write(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// The assembled request document: a `data` root element carrying the
/// header attributes and an ordered list of child sections. One document
/// is built per operation attempt and discarded on failure.
#[derive(Debug, Clone)]
pub struct Document {
    root: Section,
}

impl Document {
    pub fn new() -> Self {
        Document {
            root: Section::new("data"),
        }
    }

    pub fn set_attr(&mut self, key: &str, value: Option<String>) {
        self.root.set(key, value);
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.root.attr(key)
    }

    pub fn push_section(&mut self, section: Section) {
        self.root.add_child(section);
    }

    pub fn sections(&self) -> &[Section] {
        self.root.children()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.root.children().iter().find(|s| s.name() == name)
    }

    /// Serializes the document as UTF-8 XML with declaration, matching the
    /// vendor's documented examples byte for byte apart from whitespace.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.root.write(&mut writer)?;
        // The writer only ever receives valid UTF-8.
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}
