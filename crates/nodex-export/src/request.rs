//! Export requests.

use chrono::{DateTime, SecondsFormat, Utc};

/// Parameters of one export call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Start of the subtree, relative to the sites root (e.g. `acme/about`).
    pub starting_point: String,
    /// Language the exported content is read in.
    pub source_language: String,
    /// Language the content is to be translated into; informational only.
    pub target_language: Option<String>,
    /// Recorded in the document envelope; does not restrict the selection.
    pub modified_after: Option<DateTime<Utc>>,
    /// Leave out hidden nodes and nodes below hidden ancestors.
    pub ignore_hidden: bool,
    /// Do not descend into documents below the starting point.
    pub exclude_child_documents: bool,
    /// Workspace to read; the settings' default when `None`.
    pub workspace: Option<String>,
}

impl ExportRequest {
    /// Create a request with defaults: hidden content ignored, child
    /// documents included.
    pub fn new(starting_point: impl Into<String>, source_language: impl Into<String>) -> Self {
        Self {
            starting_point: starting_point.into(),
            source_language: source_language.into(),
            target_language: None,
            modified_after: None,
            ignore_hidden: true,
            exclude_child_documents: false,
            workspace: None,
        }
    }

    pub fn target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = Some(language.into());
        self
    }

    pub fn modified_after(mut self, timestamp: DateTime<Utc>) -> Self {
        self.modified_after = Some(timestamp);
        self
    }

    pub fn ignore_hidden(mut self, ignore: bool) -> Self {
        self.ignore_hidden = ignore;
        self
    }

    pub fn exclude_child_documents(mut self, exclude: bool) -> Self {
        self.exclude_child_documents = exclude;
        self
    }

    pub fn workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    /// `modified_after` as written into the envelope.
    pub fn modified_after_attribute(&self) -> Option<String> {
        self.modified_after
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}
