//! Read contexts passed to every store call.

use nodex_common::{Dimensions, NodeVariantRecord, LIVE_WORKSPACE};

/// Authorization level a read runs with.
///
/// Exports are administrative operations: they read with
/// [`ReadPrivilege::Elevated`] regardless of who started them. The privilege
/// travels with the [`ContentContext`] instead of living in global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadPrivilege {
    /// Access roles on nodes are enforced against the given roles.
    Checked { roles: Vec<String> },
    /// Access roles are ignored.
    Elevated,
}

impl ReadPrivilege {
    /// Checked privilege for an anonymous caller.
    pub fn anonymous() -> Self {
        Self::Checked { roles: Vec::new() }
    }

    /// Whether a record's access roles admit this privilege.
    pub fn can_read(&self, record: &NodeVariantRecord) -> bool {
        match self {
            Self::Elevated => true,
            Self::Checked { roles } => {
                record.access_roles.is_empty()
                    || record.access_roles.iter().any(|r| roles.contains(r))
            }
        }
    }
}

impl Default for ReadPrivilege {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// A view on the content store: one workspace, one dimension combination,
/// and the visibility rules applied to reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentContext {
    pub workspace: String,
    pub dimensions: Dimensions,
    pub invisible_content_shown: bool,
    pub removed_content_shown: bool,
    pub inaccessible_content_shown: bool,
    pub privilege: ReadPrivilege,
}

impl ContentContext {
    /// Create a context with default visibility: hidden, removed and
    /// inaccessible content are not shown.
    pub fn new(workspace: impl Into<String>, dimensions: Dimensions) -> Self {
        Self {
            workspace: workspace.into(),
            dimensions,
            invisible_content_shown: false,
            removed_content_shown: false,
            inaccessible_content_shown: false,
            privilege: ReadPrivilege::default(),
        }
    }

    /// Builder-style setter for showing hidden nodes.
    pub fn show_invisible(mut self, shown: bool) -> Self {
        self.invisible_content_shown = shown;
        self
    }

    /// Builder-style setter for showing nodes the privilege cannot read.
    pub fn show_inaccessible(mut self, shown: bool) -> Self {
        self.inaccessible_content_shown = shown;
        self
    }

    /// Builder-style setter for the read privilege.
    pub fn with_privilege(mut self, privilege: ReadPrivilege) -> Self {
        self.privilege = privilege;
        self
    }

    /// Same visibility rules, different dimension combination.
    pub fn for_dimensions(&self, dimensions: Dimensions) -> Self {
        Self {
            dimensions,
            ..self.clone()
        }
    }

    /// Whether a record is visible under this context's rules.
    pub fn admits(&self, record: &NodeVariantRecord) -> bool {
        if record.removed && !self.removed_content_shown {
            return false;
        }
        if record.hidden && !self.invisible_content_shown {
            return false;
        }
        self.inaccessible_content_shown || self.privilege.can_read(record)
    }
}

impl Default for ContentContext {
    fn default() -> Self {
        Self::new(LIVE_WORKSPACE, Dimensions::new())
    }
}
