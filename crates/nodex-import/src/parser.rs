//! Parse export XML into an [`ExportDocument`].

use std::collections::BTreeMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::document::{ExportDocument, ExportedNode, ExportedVariant};
use crate::{Error, Result};

/// The only format version this reader understands.
pub const SUPPORTED_FORMAT_VERSION: &str = "1.0";

/// Parse an export document from XML text.
///
/// # Example
///
/// ```no_run
/// let xml = std::fs::read_to_string("acme-en.xml")?;
/// let document = nodex_import::parse(&xml)?;
///
/// for node in &document.nodes {
///     println!("{} ({} variants)", node.identifier, node.variants.len());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse(xml: &str) -> Result<ExportDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut builder = DocumentBuilder::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => builder.start_element(&e)?,
            Ok(Event::Empty(e)) => {
                builder.start_element(&e)?;
                builder.end_element();
            }
            Ok(Event::End(_)) => builder.end_element(),
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                builder.text(&text);
            }
            Ok(Event::CData(e)) => {
                // Split sections are adjacent; appending joins them again.
                let text = std::str::from_utf8(&e)?;
                builder.text(text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {} // Declarations, comments, processing instructions
            Err(e) => return Err(Error::Xml(format!("XML parse error: {}", e))),
        }
    }

    builder.finish()
}

/// Read and parse an export file.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<ExportDocument> {
    let xml = std::fs::read_to_string(path)?;
    parse(&xml)
}

/// Collects parser events into a document.
#[derive(Default)]
struct DocumentBuilder {
    stack: Vec<String>,
    document: Option<ExportDocument>,
    nodes_seen: bool,
    node: Option<ExportedNode>,
    variant: Option<ExportedVariant>,
    dimensions: BTreeMap<String, Vec<String>>,
    text: String,
}

impl DocumentBuilder {
    fn start_element(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let parent = self.stack.last().map(String::as_str);

        match (parent, name.as_str()) {
            (None, "content") => {
                let attributes = attributes(e)?;
                let required = |attribute: &'static str| {
                    attributes.get(attribute).cloned().ok_or(Error::MissingAttribute {
                        element: "content",
                        attribute,
                    })
                };
                self.document = Some(ExportDocument {
                    site_name: required("name")?,
                    site_package_key: required("sitePackageKey")?,
                    workspace: required("workspace")?,
                    source_language: required("sourceLanguage")?,
                    target_language: attributes.get("targetLanguage").cloned(),
                    modified_after: attributes.get("modifiedAfter").cloned(),
                    ..Default::default()
                });
            }
            (Some("content"), "nodes") => {
                let version = attributes(e)?.remove("formatVersion");
                if version.as_deref() != Some(SUPPORTED_FORMAT_VERSION) {
                    return Err(Error::UnsupportedFormatVersion {
                        found: version,
                        expected: SUPPORTED_FORMAT_VERSION,
                    });
                }
                if let Some(document) = self.document.as_mut() {
                    document.format_version = SUPPORTED_FORMAT_VERSION.to_string();
                }
                self.nodes_seen = true;
            }
            (Some("nodes"), "node") => {
                let mut attributes = attributes(e)?;
                self.node = Some(ExportedNode {
                    identifier: attributes.remove("identifier").ok_or(Error::MissingAttribute {
                        element: "node",
                        attribute: "identifier",
                    })?,
                    node_name: attributes.remove("nodeName").unwrap_or_default(),
                    variants: Vec::new(),
                });
            }
            (Some("node"), "variant") => {
                let node_type = attributes(e)?.remove("nodeType").ok_or(Error::MissingAttribute {
                    element: "variant",
                    attribute: "nodeType",
                })?;
                self.variant = Some(ExportedVariant {
                    node_type,
                    ..Default::default()
                });
                self.dimensions.clear();
            }
            _ => {}
        }

        self.text.clear();
        self.stack.push(name);
        Ok(())
    }

    fn end_element(&mut self) {
        let Some(name) = self.stack.pop() else {
            return;
        };
        let parent = self.stack.last().map(String::as_str);

        match (parent, name.as_str()) {
            (Some("dimensions"), _) => {
                self.dimensions
                    .entry(name.clone())
                    .or_default()
                    .push(std::mem::take(&mut self.text));
            }
            (Some("properties"), _) => {
                if let Some(variant) = self.variant.as_mut() {
                    variant.properties.insert(name.clone(), std::mem::take(&mut self.text));
                }
            }
            (Some("node"), "variant") => {
                if let (Some(node), Some(mut variant)) = (self.node.as_mut(), self.variant.take()) {
                    variant.dimensions = std::mem::take(&mut self.dimensions).into_iter().collect();
                    node.variants.push(variant);
                }
            }
            (Some("nodes"), "node") => {
                if let (Some(document), Some(node)) = (self.document.as_mut(), self.node.take()) {
                    debug!(identifier = %node.identifier, variants = node.variants.len(), "read node");
                    document.nodes.push(node);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        let in_value = self.stack.len() >= 2
            && matches!(
                self.stack[self.stack.len() - 2].as_str(),
                "dimensions" | "properties"
            );
        if in_value {
            self.text.push_str(text);
        }
    }

    fn finish(self) -> Result<ExportDocument> {
        let document = self.document.ok_or(Error::MissingElement("content"))?;
        if !self.nodes_seen {
            return Err(Error::UnsupportedFormatVersion {
                found: None,
                expected: SUPPORTED_FORMAT_VERSION,
            });
        }
        Ok(document)
    }
}

fn attributes(e: &BytesStart<'_>) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(e.to_string()))?
            .into_owned();
        map.insert(key, value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<content name="Acme" sitePackageKey="Acme.Site" workspace="live" sourceLanguage="en" targetLanguage="de">
  <nodes formatVersion="1.0">
    <node identifier="a1" nodeName="about">
      <variant nodeType="Acme:Page">
        <dimensions>
          <language>en</language>
          <region>gb</region>
          <region>us</region>
        </dimensions>
        <properties>
          <subtitle type="string"/>
          <title type="string"><![CDATA[Use ]]]]><![CDATA[> carefully]]></title>
        </properties>
      </variant>
    </node>
    <node identifier="b2" nodeName="team">
      <variant nodeType="Acme:Page">
        <dimensions/>
        <properties/>
      </variant>
    </node>
  </nodes>
</content>
"#;

    #[test]
    fn test_parse_document() {
        let document = parse(DOCUMENT).unwrap();
        assert_eq!(document.site_name, "Acme");
        assert_eq!(document.site_package_key, "Acme.Site");
        assert_eq!(document.source_language, "en");
        assert_eq!(document.target_language.as_deref(), Some("de"));
        assert_eq!(document.format_version, "1.0");
        assert_eq!(document.nodes.len(), 2);
        assert_eq!(document.variant_count(), 2);

        let about = document.node("a1").unwrap();
        assert_eq!(about.node_name, "about");
        let variant = &about.variants[0];
        assert_eq!(variant.dimensions.effective("language"), Some("en"));
        assert_eq!(variant.dimensions.get("region").map(<[String]>::len), Some(2));
        assert_eq!(variant.properties["title"], "Use ]]> carefully");
        assert_eq!(variant.properties["subtitle"], "");

        let team = document.node("b2").unwrap();
        assert!(team.variants[0].dimensions.is_empty());
        assert!(team.variants[0].properties.is_empty());
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acme-en.xml");
        std::fs::write(&path, DOCUMENT).unwrap();

        let document = read_file(&path).unwrap();
        assert_eq!(document.nodes.len(), 2);
        assert!(matches!(read_file(dir.path().join("missing.xml")), Err(Error::Io(_))));
    }

    #[test]
    fn test_rejects_other_format_version() {
        let xml = DOCUMENT.replace("formatVersion=\"1.0\"", "formatVersion=\"2.0\"");
        match parse(&xml) {
            Err(Error::UnsupportedFormatVersion { found, .. }) => {
                assert_eq!(found.as_deref(), Some("2.0"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_missing_format_version() {
        let xml = r#"<content name="A" sitePackageKey="A.Site" workspace="live" sourceLanguage="en"><nodes/></content>"#;
        assert!(matches!(
            parse(xml),
            Err(Error::UnsupportedFormatVersion { found: None, .. })
        ));

        let xml = r#"<content name="A" sitePackageKey="A.Site" workspace="live" sourceLanguage="en"/>"#;
        assert!(matches!(
            parse(xml),
            Err(Error::UnsupportedFormatVersion { found: None, .. })
        ));
    }

    #[test]
    fn test_missing_content_attribute() {
        let xml = r#"<content name="A" workspace="live" sourceLanguage="en"><nodes formatVersion="1.0"/></content>"#;
        assert!(matches!(
            parse(xml),
            Err(Error::MissingAttribute {
                attribute: "sitePackageKey",
                ..
            })
        ));
    }

    #[test]
    fn test_not_an_export() {
        assert!(matches!(parse("<other/>"), Err(Error::MissingElement("content"))));
    }
}
