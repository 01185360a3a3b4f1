//! Pipeline definition model
//!
//! Parses the JSON document handed to a deployment into an ordered sequence
//! of pipeline objects, normalized for transmission to the remote service.
//! This is intentionally a thin adapter: structural checks only, no
//! interpretation of the object fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

/// Errors produced while constructing a [`PipelineDefinition`]
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Source text is not JSON at all
    #[error("pipeline definition is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Top level carries no recognizable object list
    #[error("pipeline definition has no top-level \"objects\" array")]
    MissingObjectList,

    /// An entry of the object list is not a JSON object
    #[error("pipeline object at index {index} is not a JSON object")]
    NotAnObject { index: usize },

    /// An object has no usable identifier
    #[error("pipeline object at index {index} has no non-empty \"id\"")]
    MissingId { index: usize },

    /// Two objects share an identifier
    #[error("duplicate pipeline object id \"{id}\"")]
    DuplicateId { id: String },
}

/// One node of the pipeline graph
///
/// `fields` holds every key of the source object except `id` and `name`,
/// untouched, in the shape the remote service expects back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineObjectSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// Parsed pipeline definition: an ordered sequence of uniquely-identified
/// pipeline objects
///
/// Produced once per deployment from the input JSON and immutable afterwards.
#[derive(Debug, Clone)]
pub struct PipelineDefinition {
    objects: Vec<PipelineObjectSpec>,
}

impl PipelineDefinition {
    /// Parses a pipeline definition from JSON source
    ///
    /// The document must carry a top-level `"objects"` array; every entry
    /// must be an object with a non-empty string `"id"` unique within the
    /// document. An entry without a `"name"` uses its id as the name.
    ///
    /// # Errors
    /// Returns a [`DefinitionError`] describing the first structural problem
    /// encountered, in document order.
    pub fn parse(source: &str) -> Result<Self, DefinitionError> {
        let document: Value = serde_json::from_str(source)?;
        let list = document
            .get("objects")
            .and_then(Value::as_array)
            .ok_or(DefinitionError::MissingObjectList)?;

        let mut objects = Vec::with_capacity(list.len());
        let mut seen = HashSet::new();

        for (index, entry) in list.iter().enumerate() {
            let map = entry
                .as_object()
                .ok_or(DefinitionError::NotAnObject { index })?;

            let id = map
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .ok_or(DefinitionError::MissingId { index })?
                .to_string();

            if !seen.insert(id.clone()) {
                return Err(DefinitionError::DuplicateId { id });
            }

            let name = map
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(id.as_str())
                .to_string();

            let fields: Map<String, Value> = map
                .iter()
                .filter(|(key, _)| key.as_str() != "id" && key.as_str() != "name")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();

            objects.push(PipelineObjectSpec { id, name, fields });
        }

        Ok(Self { objects })
    }

    /// The pipeline objects in document order, as sent to validate/put
    pub fn objects(&self) -> &[PipelineObjectSpec] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
