//! Export entry points.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use nodex_common::path;
use nodex_store::{ContentRepository, SiteRepository};
use tracing::{debug, info};

use crate::selection::{SelectionEngine, SelectionResult};
use crate::xml::{Envelope, XmlExporter};
use crate::{Error, ExportRequest, ExportSettings, Result};

/// Counts of a finished export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub nodes: usize,
    pub variants: usize,
}

/// Exports content subtrees of a repository as translation XML.
pub struct ExportService<'a, R: ContentRepository + ?Sized> {
    repository: &'a R,
    settings: ExportSettings,
}

impl<'a, R: ContentRepository + ?Sized> ExportService<'a, R> {
    /// Create a service with default settings.
    pub fn new(repository: &'a R) -> Self {
        Self::with_settings(repository, ExportSettings::default())
    }

    pub fn with_settings(repository: &'a R, settings: ExportSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Export to an in-memory string.
    pub fn export_to_string(&self, request: &ExportRequest) -> Result<String> {
        let mut buffer = Vec::new();
        self.export_to_writer(request, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Export to a file.
    ///
    /// The document is written next to `path` first and renamed into place
    /// once complete. On failure nothing is left at `path`.
    pub fn export_to_file<P: AsRef<Path>>(&self, path: P, request: &ExportRequest) -> Result<ExportSummary> {
        let path = path.as_ref();
        let (envelope, selection) = self.prepare(request)?;

        let partial = partial_path(path);
        debug!(path = %partial.display(), "writing partial export");

        let result = self.write_file(&partial, &envelope, &selection);
        match result {
            Ok(summary) => {
                fs::rename(&partial, path)?;
                info!(
                    path = %path.display(),
                    nodes = summary.nodes,
                    variants = summary.variants,
                    "export written"
                );
                Ok(summary)
            }
            Err(e) => {
                if let Err(remove_err) = fs::remove_file(&partial) {
                    debug!(error = %remove_err, "could not remove partial export");
                }
                Err(e)
            }
        }
    }

    /// Export to any writer.
    ///
    /// Selection completes before the first byte is written, so lookup
    /// errors never leave partial output behind.
    pub fn export_to_writer<W: Write>(&self, request: &ExportRequest, writer: W) -> Result<ExportSummary> {
        let (envelope, selection) = self.prepare(request)?;
        let (_, summary) = self.write_document(writer, &envelope, &selection)?;
        info!(
            nodes = summary.nodes,
            variants = summary.variants,
            "export complete"
        );
        Ok(summary)
    }

    fn prepare(&self, request: &ExportRequest) -> Result<(Envelope, SelectionResult)> {
        let site_node_name = path::site_node_name(&request.starting_point);
        let site = self
            .repository
            .find_site(site_node_name)?
            .ok_or_else(|| Error::SiteNotFound(site_node_name.to_string()))?;

        let engine = SelectionEngine::new(self.repository, &self.settings);
        let selection = engine.select(request)?;

        let envelope = Envelope {
            site_name: site.name,
            site_package_key: site.site_resources_package_key,
            workspace: engine.base_context(request).workspace,
            source_language: request.source_language.clone(),
            target_language: request.target_language.clone(),
            modified_after: request.modified_after_attribute(),
        };
        Ok((envelope, selection))
    }

    fn write_file(&self, partial: &Path, envelope: &Envelope, selection: &SelectionResult) -> Result<ExportSummary> {
        let file = File::create(partial)?;
        let (mut writer, summary) = self.write_document(BufWriter::new(file), envelope, selection)?;
        writer.flush()?;
        Ok(summary)
    }

    fn write_document<W: Write>(
        &self,
        writer: W,
        envelope: &Envelope,
        selection: &SelectionResult,
    ) -> Result<(W, ExportSummary)> {
        let mut exporter = XmlExporter::new(writer, self.repository, self.settings.indent);
        exporter.start(envelope)?;
        for record in selection {
            exporter.write_record(record)?;
        }

        let summary = ExportSummary {
            nodes: exporter.node_count(),
            variants: exporter.variant_count(),
        };
        Ok((exporter.finish()?, summary))
    }
}

/// Hidden sibling of `path` used while a file export is in progress.
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.partial"))
}
