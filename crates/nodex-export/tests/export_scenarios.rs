//! End-to-end export scenarios against an in-memory store.

use chrono::{TimeZone, Utc};
use nodex_common::NodeVariantRecord;
use nodex_export::{Error, ExportRequest, ExportService};
use nodex_store::{ContentDimension, MemoryStore, NodeTypeDefinition, Snapshot};

fn node(identifier: &str, path: &str, node_type: &str, language: &str) -> NodeVariantRecord {
    NodeVariantRecord::new(identifier, path, node_type).with_dimension("language", [language])
}

fn node_types(snapshot: Snapshot) -> Snapshot {
    snapshot
        .node_type("Neos.Neos:Document", NodeTypeDefinition::default())
        .node_type(
            "Acme:Page",
            NodeTypeDefinition::default()
                .extends("Neos.Neos:Document")
                .property("title", "string")
                .property("secret", "string")
                .skip_export("secret")
                .property("count", "integer"),
        )
        .node_type("Acme:Collection", NodeTypeDefinition::default())
        .node_type(
            "Acme:Text",
            NodeTypeDefinition::default().property("text", "string"),
        )
}

/// The `acme/about` tree:
///
/// - `about` and `main` exist in en and de
/// - `a` exists in en, and in de below the hidden German-only `de-only`
/// - `b` and the `team` page with its content exist in en only
fn acme_store() -> MemoryStore {
    let snapshot = node_types(Snapshot::new())
        .site("acme", "Acme", "Acme.Site")
        .dimension(
            "language",
            ContentDimension::default()
                .preset("en", ["en"])
                .preset("de", ["de", "en"]),
        )
        .node(
            node("about", "/sites/acme/about", "Acme:Page", "en")
                .with_property("title", "About us")
                .with_property("secret", "internal")
                .with_property("count", 3.0),
        )
        .node(node("about", "/sites/acme/about", "Acme:Page", "de").with_property("title", "Über uns"))
        .node(node("main", "/sites/acme/about/main", "Acme:Collection", "en"))
        .node(node("main", "/sites/acme/about/main", "Acme:Collection", "de"))
        .node(node("a", "/sites/acme/about/main/a", "Acme:Text", "en").with_property("text", "Use ]]> carefully"))
        .node(node("de-only", "/sites/acme/about/de-only", "Acme:Collection", "de").hidden(true))
        .node(node("a", "/sites/acme/about/de-only/a", "Acme:Text", "de").with_property("text", "Vorsicht"))
        .node(node("b", "/sites/acme/about/main/b", "Acme:Text", "en").with_property("text", "Second"))
        .node(node("team", "/sites/acme/about/team", "Acme:Page", "en").with_property("title", "Team"))
        .node(node("team-main", "/sites/acme/about/team/main", "Acme:Collection", "en"))
        .node(node("t", "/sites/acme/about/team/main/t", "Acme:Text", "en").with_property("text", "Hi"));
    MemoryStore::from_snapshot(snapshot).unwrap()
}

fn export(store: &MemoryStore, request: &ExportRequest) -> String {
    ExportService::new(store).export_to_string(request).unwrap()
}

fn node_ids(xml: &str) -> Vec<&str> {
    xml.split("<node identifier=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .collect()
}

#[test]
fn test_english_export_groups_variants() {
    let store = acme_store();
    let xml = export(&store, &ExportRequest::new("acme/about", "en").target_language("de"));

    assert_eq!(node_ids(&xml), vec!["about", "main", "a", "b", "team", "team-main", "t"]);
    assert_eq!(xml.matches("<node identifier=\"a\"").count(), 1);
    assert_eq!(xml.matches("<variant ").count(), 7);
    assert!(!xml.contains("<language>de</language>"));
    assert!(xml.contains(
        "<content name=\"Acme\" sitePackageKey=\"Acme.Site\" workspace=\"live\" sourceLanguage=\"en\" targetLanguage=\"de\">"
    ));
}

#[test]
fn test_german_export_drops_hidden_branch() {
    let store = acme_store();
    let xml = export(&store, &ExportRequest::new("acme/about", "de"));

    assert_eq!(node_ids(&xml), vec!["about", "main", "b", "team", "team-main", "t"]);
    assert!(xml.contains("<![CDATA[Über uns]]>"));
    assert!(!xml.contains("Vorsicht"));
    // Fallback records keep their own language.
    assert!(xml.contains("<![CDATA[Team]]>"));
}

#[test]
fn test_hidden_content_included_on_request() {
    let store = acme_store();
    let request = ExportRequest::new("acme/about", "de").ignore_hidden(false);
    let xml = export(&store, &request);

    assert_eq!(
        node_ids(&xml),
        vec!["about", "de-only", "a", "main", "b", "team", "team-main", "t"]
    );
    assert!(xml.contains("<![CDATA[Vorsicht]]>"));
}

#[test]
fn test_repeated_export_is_identical() {
    let store = acme_store();
    let request = ExportRequest::new("acme/about", "en");
    assert_eq!(export(&store, &request), export(&store, &request));
}

#[test]
fn test_exclude_child_documents() {
    let store = acme_store();
    let request = ExportRequest::new("acme/about", "en").exclude_child_documents(true);
    let xml = export(&store, &request);

    assert_eq!(node_ids(&xml), vec!["about", "main", "a", "b"]);
}

#[test]
fn test_only_exportable_properties_written() {
    let store = acme_store();
    let xml = export(&store, &ExportRequest::new("acme/about", "en"));

    assert!(xml.contains("<title type=\"string\"><![CDATA[About us]]></title>"));
    assert!(!xml.contains("<secret"));
    assert!(!xml.contains("<count"));
    assert!(xml.contains("<properties/>"));
}

#[test]
fn test_cdata_terminator_split() {
    let store = acme_store();
    let xml = export(&store, &ExportRequest::new("acme/about/main/a", "en"));
    assert!(xml.contains("<![CDATA[Use ]]]]><![CDATA[> carefully]]>"));
}

#[test]
fn test_leaf_export_layout() {
    let store = acme_store();
    let xml = export(&store, &ExportRequest::new("acme/about/main/b", "en"));
    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<content name="Acme" sitePackageKey="Acme.Site" workspace="live" sourceLanguage="en">
  <nodes formatVersion="1.0">
    <node identifier="b" nodeName="b">
      <variant nodeType="Acme:Text">
        <dimensions>
          <language>en</language>
        </dimensions>
        <properties>
          <text type="string"><![CDATA[Second]]></text>
        </properties>
      </variant>
    </node>
  </nodes>
</content>
"#;
    assert_eq!(xml, expected);
}

#[test]
fn test_modified_after_in_envelope() {
    let store = acme_store();
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let request = ExportRequest::new("acme/about", "en").modified_after(timestamp);
    let xml = export(&store, &request);

    assert!(xml.contains("modifiedAfter=\"2024-01-15T00:00:00Z\""));
    // The timestamp does not restrict the selection.
    assert_eq!(node_ids(&xml).len(), 7);
}

#[test]
fn test_region_variants_share_one_node() {
    let snapshot = node_types(Snapshot::new())
        .site("acme", "Acme", "Acme.Site")
        .dimension(
            "language",
            ContentDimension::default().preset("en", ["en"]).preset("de", ["de"]),
        )
        .dimension(
            "region",
            ContentDimension::default()
                .preset("us", ["us"])
                .preset("gb", ["gb", "us"]),
        )
        .node(node("home", "/sites/acme/home", "Acme:Page", "en").with_dimension("region", ["us"]))
        .node(node("x", "/sites/acme/home/x", "Acme:Text", "en").with_dimension("region", ["us"]))
        .node(
            node("x", "/sites/acme/home/x", "Acme:Text", "en")
                .with_dimension("region", ["gb"])
                .with_property("text", "Colour"),
        )
        .node(node("x", "/sites/acme/home/x", "Acme:Text", "de").with_dimension("region", ["us"]));
    let store = MemoryStore::from_snapshot(snapshot).unwrap();

    let xml = export(&store, &ExportRequest::new("acme/home", "en"));
    assert_eq!(node_ids(&xml), vec!["home", "x"]);
    assert_eq!(xml.matches("<variant ").count(), 3);
    assert!(xml.contains("<region>gb</region>"));
    assert!(!xml.contains("<language>de</language>"));
}

#[test]
fn test_variant_hidden_in_one_region_is_left_out() {
    let snapshot = node_types(Snapshot::new())
        .site("acme", "Acme", "Acme.Site")
        .dimension("language", ContentDimension::default().preset("en", ["en"]))
        .dimension(
            "region",
            ContentDimension::default()
                .preset("us", ["us"])
                .preset("gb", ["gb", "us"]),
        )
        .node(node("home", "/sites/acme/home", "Acme:Page", "en").with_dimension("region", ["us"]))
        .node(
            node("branch", "/sites/acme/home/branch", "Acme:Text", "en")
                .with_dimension("region", ["us"])
                .with_property("text", "Branch US"),
        )
        .node(
            node("branch", "/sites/acme/home/branch", "Acme:Text", "en")
                .with_dimension("region", ["gb"])
                .with_property("text", "Branch GB")
                .hidden(true),
        )
        .node(
            node("x", "/sites/acme/home/branch/x", "Acme:Text", "en")
                .with_dimension("region", ["us"])
                .with_property("text", "X US"),
        )
        .node(
            node("x", "/sites/acme/home/branch/x", "Acme:Text", "en")
                .with_dimension("region", ["gb"])
                .with_property("text", "X GB"),
        );
    let store = MemoryStore::from_snapshot(snapshot).unwrap();

    let xml = export(&store, &ExportRequest::new("acme/home", "en"));
    assert_eq!(node_ids(&xml), vec!["home", "branch", "x"]);
    assert_eq!(xml.matches("<variant ").count(), 3);
    assert!(xml.contains("<![CDATA[Branch US]]>"));
    assert!(xml.contains("<![CDATA[X US]]>"));
    assert!(!xml.contains("Branch GB"));
    assert!(!xml.contains("X GB"));
    assert!(!xml.contains("<region>gb</region>"));
}

#[test]
fn test_hidden_dimensionless_site_node_does_not_hide_content() {
    let snapshot = node_types(Snapshot::new())
        .site("acme", "Acme", "Acme.Site")
        .dimension("language", ContentDimension::default().preset("en", ["en"]))
        .node(NodeVariantRecord::new("site", "/sites/acme", "Acme:Collection").hidden(true))
        .node(node("about", "/sites/acme/about", "Acme:Page", "en").with_property("title", "About us"));
    let store = MemoryStore::from_snapshot(snapshot).unwrap();

    let xml = export(&store, &ExportRequest::new("acme/about", "en"));
    assert_eq!(node_ids(&xml), vec!["about"]);
    assert!(xml.contains("<![CDATA[About us]]>"));
}

#[test]
fn test_export_to_file() {
    let store = acme_store();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("acme-en.xml");
    let request = ExportRequest::new("acme/about", "en");

    let service = ExportService::new(&store);
    let summary = service.export_to_file(&path, &request).unwrap();
    assert_eq!(summary.nodes, 7);
    assert_eq!(summary.variants, 7);

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, service.export_to_string(&request).unwrap());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_failed_file_export_leaves_nothing() {
    let store = acme_store();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xml");

    let err = ExportService::new(&store)
        .export_to_file(&path, &ExportRequest::new("acme/missing", "en"))
        .unwrap_err();
    assert!(matches!(err, Error::NodeNotFound(_)));
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unknown_site() {
    let store = acme_store();
    let err = ExportService::new(&store)
        .export_to_string(&ExportRequest::new("globex/about", "en"))
        .unwrap_err();
    assert!(matches!(err, Error::SiteNotFound(name) if name == "globex"));
}
