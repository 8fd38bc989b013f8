//! Content walker for exports that exclude child documents.
//!
//! The walker lists a node and everything below it that is reachable through
//! non-document nodes only. Children are always queried with a filter that
//! excludes document types, so a document below the root is neither returned
//! nor expanded.

use nodex_common::NodeVariantRecord;
use nodex_store::{ChildQuery, ContentContext, NodeStoreReader, NodeTypeFilter};

use crate::Result;

/// Depth-first, pre-order walk over the content of a document.
pub struct ContentWalker<'a, R: NodeStoreReader + ?Sized> {
    reader: &'a R,
    filter: NodeTypeFilter,
}

impl<'a, R: NodeStoreReader + ?Sized> ContentWalker<'a, R> {
    /// Create a walker that stops at nodes of `document_node_type` (and its
    /// sub types).
    pub fn new(reader: &'a R, document_node_type: &str) -> Self {
        Self {
            reader,
            filter: NodeTypeFilter::excluding(document_node_type),
        }
    }

    /// Walk from `root`, returning the root followed by its content
    /// descendants in pre-order.
    ///
    /// Uses an explicit stack, so tree depth is bounded by memory only.
    pub fn walk(&self, root: NodeVariantRecord, context: &ContentContext) -> Result<Vec<NodeVariantRecord>> {
        let mut visited = Vec::new();
        let mut pending = vec![root];

        while let Some(node) = pending.pop() {
            let query = ChildQuery {
                parent_path: &node.path,
                node_type_filter: Some(&self.filter),
                workspace: &context.workspace,
                dimensions: &context.dimensions,
                include_removed: context.removed_content_shown,
                recursive: false,
                privilege: &context.privilege,
            };
            let children = self.reader.find_children(&query)?;

            // Reversed so the first child is popped next.
            pending.extend(children.into_iter().rev());
            visited.push(node);
        }

        Ok(visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodex_common::Dimensions;
    use nodex_store::{MemoryStore, NodeTypeDefinition, ReadPrivilege, Snapshot};

    fn node(identifier: &str, path: &str, node_type: &str) -> NodeVariantRecord {
        NodeVariantRecord::new(identifier, path, node_type).with_dimension("language", ["en"])
    }

    fn store() -> MemoryStore {
        let snapshot = Snapshot::new()
            .node_type("Neos.Neos:Document", NodeTypeDefinition::default())
            .node_type(
                "Acme:Page",
                NodeTypeDefinition::default().extends("Neos.Neos:Document"),
            )
            .node(node("page", "/sites/acme/about", "Acme:Page"))
            .node(node("main", "/sites/acme/about/main", "Acme:Collection"))
            .node(node("t1", "/sites/acme/about/main/t1", "Acme:Text"))
            .node(node("t2", "/sites/acme/about/main/t2", "Acme:Text"))
            .node(node("t1-quote", "/sites/acme/about/main/t1/quote", "Acme:Text"))
            .node(node("team", "/sites/acme/about/team", "Acme:Page"))
            .node(node("team-main", "/sites/acme/about/team/main", "Acme:Collection"))
            .node(node("footer", "/sites/acme/about/footer", "Acme:Collection"));
        MemoryStore::from_snapshot(snapshot).unwrap()
    }

    #[test]
    fn test_walk_is_preorder_and_stops_at_documents() {
        let store = store();
        let context = ContentContext::new("live", Dimensions::new().with("language", ["en"]))
            .with_privilege(ReadPrivilege::Elevated);
        let root = store.get_node("/sites/acme/about", &context).unwrap().unwrap();

        let walker = ContentWalker::new(&store, "Neos.Neos:Document");
        let visited: Vec<_> = walker
            .walk(root, &context)
            .unwrap()
            .into_iter()
            .map(|r| r.identifier)
            .collect();

        assert_eq!(visited, vec!["page", "footer", "main", "t1", "t1-quote", "t2"]);
    }

    #[test]
    fn test_walk_leaf() {
        let store = store();
        let context = ContentContext::new("live", Dimensions::new().with("language", ["en"]));
        let leaf = store.get_node("/sites/acme/about/main/t2", &context).unwrap().unwrap();

        let visited = ContentWalker::new(&store, "Neos.Neos:Document")
            .walk(leaf, &context)
            .unwrap();
        assert_eq!(visited.len(), 1);
    }
}
