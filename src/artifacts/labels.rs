//! Label encoder: maps class indices produced by a model back to class names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::error::{BotaniqError, Result};

/// Ordered class names; position `i` is the name of class `i`
///
/// Stored on disk as a JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self> {
        if classes.is_empty() {
            return Err(BotaniqError::Config(
                "label encoder needs at least one class".to_string(),
            ));
        }
        Ok(Self { classes })
    }

    /// Load class names from a JSON array file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BotaniqError::PathNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let classes: Vec<String> = serde_json::from_str(&content)?;
        Self::new(classes)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.classes)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Class name for a predicted index
    pub fn inverse_transform(&self, index: usize) -> Result<&str> {
        self.classes.get(index).map(String::as_str).ok_or_else(|| {
            BotaniqError::InvalidInput(format!(
                "class index {} out of range for {} classes",
                index,
                self.classes.len()
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> LabelEncoder {
        LabelEncoder::new(vec!["Aloe Vera".into(), "Orchid".into(), "Tulip".into()]).unwrap()
    }

    #[test]
    fn test_inverse_transform() {
        let labels = encoder();
        assert_eq!(labels.inverse_transform(1).unwrap(), "Orchid");
        assert!(matches!(
            labels.inverse_transform(3),
            Err(BotaniqError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(LabelEncoder::new(Vec::new()).is_err());
    }

    #[test]
    fn test_load_from_json_array() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("labels.json");
        std::fs::write(&path, r#"["Healthy", "High Stress", "Moderate Stress"]"#).unwrap();

        let labels = LabelEncoder::load(&path).unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.inverse_transform(2).unwrap(), "Moderate Stress");
    }

    #[test]
    fn test_load_missing_file() {
        let err = LabelEncoder::load(Path::new("/nonexistent/labels.json")).unwrap_err();
        assert!(matches!(err, BotaniqError::PathNotFound(_)));
    }
}
