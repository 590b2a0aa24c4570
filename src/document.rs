//! Fluent Bit configuration document model, rendering and persistence

use crate::errors::Result;
use std::fmt;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// A single `key value` line inside a section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub key: &'static str,
    pub value: String,
}

/// A `[NAME]` block of directives, kept in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: &'static str,
    directives: Vec<Directive>,
}

impl Section {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            directives: Vec::new(),
        }
    }

    /// Append a directive; duplicate keys are kept
    pub fn directive(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.directives.push(Directive {
            key,
            value: value.into(),
        });
        self
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// First value emitted for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.directives
            .iter()
            .find(|d| d.key == key)
            .map(|d| d.value.as_str())
    }

    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.directives
            .iter()
            .any(|d| d.key == key && d.value == value)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.name)?;
        for directive in &self.directives {
            writeln!(f, "\t\t{} {}", directive.key, directive.value)?;
        }
        Ok(())
    }
}

/// Complete target configuration, sections in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetDocument {
    sections: Vec<Section>,
}

impl TargetDocument {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Render the document in Fluent Bit's classic format
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Write the document to `path` atomically.
    ///
    /// The content goes to a temporary file next to `path` which is then
    /// renamed over it, so readers see either the old file or the full new one.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = temp_file_in(dir)?;
        tmp.write_all(self.render().as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;

        debug!("Wrote {} sections to {}", self.sections.len(), path.display());
        Ok(())
    }
}

/// Temporary file that ends up `0644` once renamed, independent of umask
#[cfg(unix)]
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    let tmp = NamedTempFile::new_in(dir)?;
    tmp.as_file()
        .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    Ok(tmp)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

impl fmt::Display for TargetDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            write!(f, "{}", section)?;
        }
        Ok(())
    }
}
