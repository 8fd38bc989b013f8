//! Streaming XML writer for the translation export format.
//!
//! Records are written in the order they arrive. Consecutive records sharing
//! an identifier are variants of one node and end up as `<variant>` children
//! of a single `<node>` element:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <content name="Acme" sitePackageKey="Acme.Site" workspace="live" sourceLanguage="en">
//!   <nodes formatVersion="1.0">
//!     <node identifier="a1" nodeName="about">
//!       <variant nodeType="Acme:Page">
//!         <dimensions>
//!           <language>en</language>
//!         </dimensions>
//!         <properties>
//!           <title type="string"><![CDATA[About us]]></title>
//!         </properties>
//!       </variant>
//!     </node>
//!   </nodes>
//! </content>
//! ```

use std::io::Write;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use nodex_common::NodeVariantRecord;
use nodex_store::NodeTypeRegistry;

use crate::properties::PropertySelector;
use crate::{Error, Result};

/// Version token of the format; importers reject documents with another one.
pub const FORMAT_VERSION: &str = "1.0";

/// Attributes of the `<content>` root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub site_name: String,
    pub site_package_key: String,
    pub workspace: String,
    pub source_language: String,
    pub target_language: Option<String>,
    pub modified_after: Option<String>,
}

/// XML writer for node variant records.
///
/// Call [`start`](Self::start) once, [`write_record`](Self::write_record) for
/// every record, then [`finish`](Self::finish) to close all open elements.
pub struct XmlExporter<'a, W: Write, T: NodeTypeRegistry + ?Sized> {
    writer: Writer<W>,
    properties: PropertySelector<'a, T>,
    current_identifier: Option<String>,
    nodes: usize,
    variants: usize,
}

impl<'a, W: Write, T: NodeTypeRegistry + ?Sized> XmlExporter<'a, W, T> {
    /// Create an exporter writing to `inner`, indenting by `indent` spaces.
    pub fn new(inner: W, registry: &'a T, indent: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', indent),
            properties: PropertySelector::new(registry),
            current_identifier: None,
            nodes: 0,
            variants: 0,
        }
    }

    /// Write the XML declaration and open `<content>` and `<nodes>`.
    pub fn start(&mut self, envelope: &Envelope) -> Result<()> {
        self.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut content = BytesStart::new("content");
        content.push_attribute(("name", envelope.site_name.as_str()));
        content.push_attribute(("sitePackageKey", envelope.site_package_key.as_str()));
        content.push_attribute(("workspace", envelope.workspace.as_str()));
        content.push_attribute(("sourceLanguage", envelope.source_language.as_str()));
        if let Some(target) = &envelope.target_language {
            content.push_attribute(("targetLanguage", target.as_str()));
        }
        if let Some(modified_after) = &envelope.modified_after {
            content.push_attribute(("modifiedAfter", modified_after.as_str()));
        }
        self.write_event(Event::Start(content))?;

        let mut nodes = BytesStart::new("nodes");
        nodes.push_attribute(("formatVersion", FORMAT_VERSION));
        self.write_event(Event::Start(nodes))
    }

    /// Write one record, opening a new `<node>` when its identifier differs
    /// from the node currently open.
    pub fn write_record(&mut self, record: &NodeVariantRecord) -> Result<()> {
        if self.current_identifier.as_deref() != Some(record.identifier.as_str()) {
            if self.current_identifier.is_some() {
                self.end_element("node")?;
            }

            let mut node = BytesStart::new("node");
            node.push_attribute(("identifier", record.identifier.as_str()));
            node.push_attribute(("nodeName", record.name()));
            self.write_event(Event::Start(node))?;

            self.current_identifier = Some(record.identifier.clone());
            self.nodes += 1;
        }

        self.write_variant(record)
    }

    /// Close the open `<node>`, `<nodes>` and `<content>`, and return the
    /// underlying writer.
    pub fn finish(mut self) -> Result<W> {
        if self.current_identifier.take().is_some() {
            self.end_element("node")?;
        }
        self.end_element("nodes")?;
        self.end_element("content")?;
        self.writer.get_mut().write_all(b"\n")?;
        Ok(self.writer.into_inner())
    }

    /// Number of `<node>` elements written so far.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Number of `<variant>` elements written so far.
    pub fn variant_count(&self) -> usize {
        self.variants
    }

    fn write_variant(&mut self, record: &NodeVariantRecord) -> Result<()> {
        let mut variant = BytesStart::new("variant");
        variant.push_attribute(("nodeType", record.node_type.as_str()));
        self.write_event(Event::Start(variant))?;

        self.write_dimensions(record)?;
        self.write_properties(record)?;

        self.end_element("variant")?;
        self.variants += 1;
        Ok(())
    }

    fn write_dimensions(&mut self, record: &NodeVariantRecord) -> Result<()> {
        if record.dimension_values.is_empty() {
            return self.write_event(Event::Empty(BytesStart::new("dimensions")));
        }

        self.start_element("dimensions")?;
        for (name, values) in record.dimension_values.iter() {
            let name = validate_xml_name(name)?;
            for value in values {
                self.write_text_element(name, value)?;
            }
        }
        self.end_element("dimensions")
    }

    fn write_properties(&mut self, record: &NodeVariantRecord) -> Result<()> {
        let selected = self.properties.select(record);
        if selected.is_empty() {
            return self.write_event(Event::Empty(BytesStart::new("properties")));
        }

        self.start_element("properties")?;
        for (name, text) in &selected {
            self.write_property(name, text)?;
        }
        self.end_element("properties")
    }

    fn write_property(&mut self, name: &str, value: &str) -> Result<()> {
        let name = validate_xml_name(name)?;
        let mut element = BytesStart::new(name);
        element.push_attribute(("type", "string"));

        if value.is_empty() {
            return self.write_event(Event::Empty(element));
        }

        self.write_event(Event::Start(element))?;
        for section in cdata_sections(value) {
            self.write_event(Event::CData(BytesCData::new(section)))?;
        }
        self.end_element(name)
    }

    // Helper methods for XML writing

    fn write_event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::Xml(e.to_string()))
    }

    fn start_element(&mut self, name: &str) -> Result<()> {
        self.write_event(Event::Start(BytesStart::new(name)))
    }

    fn end_element(&mut self, name: &str) -> Result<()> {
        self.write_event(Event::End(BytesEnd::new(name)))
    }

    fn write_text_element(&mut self, name: &str, value: &str) -> Result<()> {
        self.start_element(name)?;
        self.write_event(Event::Text(BytesText::new(value)))?;
        self.end_element(name)
    }
}

/// Split text into pieces that can each be wrapped in a CDATA section.
///
/// A CDATA section cannot contain `]]>`, so the text is cut between `]]` and
/// `>`; the reader concatenates adjacent sections back together.
pub fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    for pos in memchr::memmem::find_iter(text.as_bytes(), b"]]>") {
        sections.push(&text[start..pos + 2]);
        start = pos + 2;
    }
    sections.push(&text[start..]);
    sections
}

/// Check that `name` can be written as an XML element name as is.
///
/// Names start with a letter or `_` and continue with letters, digits, `_`,
/// `-` or `.`. Anything else is an error rather than a silent rename, since
/// the reader maps element names straight back to dimension and property
/// names.
pub fn validate_xml_name(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(name)
    } else {
        Err(Error::InvalidXmlName(name.to_string()))
    }
}
