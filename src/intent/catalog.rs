// ABOUTME: Intent catalog loading and tag/index mapping
// ABOUTME: Parses intents.json from the model directory at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One intent category with its training patterns and canned replies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDefinition {
    /// Intent tag, unique within the catalog
    pub tag: String,
    /// Example phrasings for this intent
    pub patterns: Vec<String>,
    /// Canned replies to choose from when this intent wins
    pub responses: Vec<String>,
}

/// Top-level shape of intents.json
#[derive(Debug, Deserialize)]
struct IntentsFile {
    intents: Vec<IntentDefinition>,
}

/// The fixed set of intents the chatbot understands
#[derive(Debug, Clone)]
pub struct IntentCatalog {
    intents: Vec<IntentDefinition>,
    tag_to_index: HashMap<String, usize>,
}

impl IntentCatalog {
    /// Load the catalog from `<model_dir>/intents.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unparseable, or holds
    /// no intents
    pub fn load(model_dir: &Path) -> Result<Self> {
        let path = model_dir.join("intents.json");
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read intent catalog at {}", path.display()))?;

        let file: IntentsFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse intent catalog at {}", path.display()))?;

        Self::from_intents(file.intents)
    }

    /// Build a catalog from already-parsed intent definitions
    ///
    /// # Errors
    ///
    /// Returns an error if the intent list is empty or contains
    /// duplicate tags
    pub fn from_intents(intents: Vec<IntentDefinition>) -> Result<Self> {
        if intents.is_empty() {
            anyhow::bail!("Intent catalog is empty");
        }

        let mut tag_to_index = HashMap::with_capacity(intents.len());
        for (index, intent) in intents.iter().enumerate() {
            if tag_to_index.insert(intent.tag.clone(), index).is_some() {
                anyhow::bail!("Duplicate intent tag in catalog: {}", intent.tag);
            }
        }

        tracing::info!("Loaded intent catalog with {} intents", intents.len());

        Ok(Self {
            intents,
            tag_to_index,
        })
    }

    /// All intents in catalog order
    #[must_use]
    pub fn intents(&self) -> &[IntentDefinition] {
        &self.intents
    }

    /// Look up an intent by tag
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&IntentDefinition> {
        self.tag_to_index.get(tag).map(|&i| &self.intents[i])
    }

    /// Number of intents in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// Whether the catalog is empty (never true after construction)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Vec<IntentDefinition> {
        vec![
            IntentDefinition {
                tag: "greeting".into(),
                patterns: vec!["hello".into(), "hi there".into()],
                responses: vec!["Hello!".into()],
            },
            IntentDefinition {
                tag: "payslip".into(),
                patterns: vec!["show my payslip".into()],
                responses: vec!["Here is your payslip.".into()],
            },
        ]
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = IntentCatalog::from_intents(sample()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("payslip").unwrap().responses.len(), 1);
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(IntentCatalog::from_intents(vec![]).is_err());
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let mut intents = sample();
        intents.push(IntentDefinition {
            tag: "greeting".into(),
            patterns: vec![],
            responses: vec![],
        });
        assert!(IntentCatalog::from_intents(intents).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("intents.json"),
            r#"{"intents":[{"tag":"greeting","patterns":["hello"],"responses":["Hi!"]}]}"#,
        )
        .unwrap();

        let catalog = IntentCatalog::load(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(IntentCatalog::load(dir.path()).is_err());
    }
}
