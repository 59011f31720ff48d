use std::collections::HashMap;

use crate::error::StoreError;

/// Named model and data texts of one session.
#[derive(Debug, Default, Clone)]
pub struct ArtifactStore {
    models: HashMap<String, String>,
    data: HashMap<String, String>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a model. A trailing newline is appended so the
    /// MathProg translator does not warn about a missing final line end.
    pub fn add_model(&mut self, name: impl Into<String>, text: &str) {
        let mut text = text.to_string();
        text.push('\n');
        self.models.insert(name.into(), text);
    }

    pub fn add_data(&mut self, name: impl Into<String>, text: &str) {
        self.data.insert(name.into(), text.to_string());
    }

    /// Stored model names, sorted; `None` when nothing is stored.
    pub fn list_models(&self) -> Option<Vec<&str>> {
        sorted_names(&self.models)
    }

    pub fn list_data(&self) -> Option<Vec<&str>> {
        sorted_names(&self.data)
    }

    pub fn clear_models(&mut self) {
        self.models.clear();
    }

    pub fn clear_data(&mut self) {
        self.data.clear();
    }

    pub fn show_model(&self, name: &str) -> Result<&str, StoreError> {
        self.models
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| StoreError::ModelNotFound(name.to_string()))
    }

    pub fn show_data(&self, name: &str) -> Result<&str, StoreError> {
        self.data
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| StoreError::DataNotFound(name.to_string()))
    }
}

fn sorted_names(texts: &HashMap<String, String>) -> Option<Vec<&str>> {
    if texts.is_empty() {
        return None;
    }
    let mut names: Vec<&str> = texts.keys().map(String::as_str).collect();
    names.sort_unstable();
    Some(names)
}
