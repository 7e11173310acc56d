use crate::Result;
use crate::field::FieldDescriptor;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A structural form container (`<form>`, view group, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Container {
    /// Id, class and text joined for keyword search
    pub fn context_text(&self) -> String {
        [
            Some(self.id.as_str()),
            self.class.as_deref(),
            self.text.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// One detection pass worth of input: the flattened fields of a page or
/// screen plus the context they were found in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// URL for web pages, package id for native apps
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Visible page text outside any container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl PageSnapshot {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            title: None,
            text: None,
            containers: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    /// Read a page snapshot from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading page snapshot from: {}", path.display());

        let file = File::open(path)?;
        let page: PageSnapshot = serde_json::from_reader(BufReader::new(file))?;

        tracing::debug!(
            "Parsed page snapshot for {} with {} fields",
            page.origin,
            page.fields.len()
        );

        Ok(page)
    }

    /// Parse a page snapshot from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
