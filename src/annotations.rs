//! Annotation corpus used by fixture tests.
//!
//! A corpus maps an item id to the page URL, the raw page markup and the
//! expected cleaned markup. It persists as JSON with sorted keys, indent 4
//! and UTF-8 without ASCII escaping, so diffs over the fixture file stay
//! readable.

use std::collections::BTreeMap;
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One annotated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyAnnotation {
    pub url: String,
    pub raw_html: String,
    pub expected_html: String,
}

/// Map-like store of [`BodyAnnotation`] values per item id, persisted to
/// disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyAnnotations(BTreeMap<String, BodyAnnotation>);

impl BodyAnnotations {
    /// Load annotations from `path`. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!(
                "Body annotations file does not exist in {}. Loading empty annotations",
                path.display()
            );
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(BodyAnnotations(serde_json::from_str(&data)?))
    }

    /// Save annotations to `path` (sorted keys, indent 4, no ASCII
    /// escaping).
    pub fn save(&self, path: &Path) -> Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.0.serialize(&mut serializer)?;
        fs::write(path, buf)?;
        Ok(())
    }
}

impl Deref for BodyAnnotations {
    type Target = BTreeMap<String, BodyAnnotation>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for BodyAnnotations {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<(String, BodyAnnotation)> for BodyAnnotations {
    fn from_iter<I: IntoIterator<Item = (String, BodyAnnotation)>>(iter: I) -> Self {
        BodyAnnotations(iter.into_iter().collect())
    }
}
