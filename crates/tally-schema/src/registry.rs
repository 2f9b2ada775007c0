//! Registry of the output contract's JSON Schemas.
//!
//! Schemas are generated from the Rust types with [`schemars::schema_for!`]
//! when the registry is built and validated with `jsonschema`.

use std::collections::BTreeMap;

use schemars::{JsonSchema, schema_for};
use serde::Serialize;
use tally_core::entities::{MemberVote, VoteRecord};
use tally_core::responses::{BatchSummary, ExtractionReport, RunSummary, UnextractedBlock};
use tally_roster::RosterSnapshot;

use crate::error::SchemaError;

/// Every published schema, by name.
pub struct SchemaRegistry {
    schemas: BTreeMap<&'static str, serde_json::Value>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            schemas: BTreeMap::new(),
        };

        // --- Vote output ---
        registry.register::<VoteRecord>("vote_record");
        registry.register::<MemberVote>("member_vote");
        registry.register::<UnextractedBlock>("unextracted_block");

        // --- Reports ---
        registry.register::<ExtractionReport>("extraction_report");
        registry.register::<RunSummary>("run_summary");
        registry.register::<BatchSummary>("batch_summary");

        // --- Inputs ---
        registry.register::<RosterSnapshot>("roster_snapshot");

        registry
    }

    fn register<T: JsonSchema>(&mut self, name: &'static str) {
        self.schemas.insert(name, schema_for!(T).to_value());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.schemas.get(name)
    }

    /// Validate a JSON value against a named schema.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown name, `ValidationFailed` with every
    /// violation when the instance does not conform.
    pub fn validate(&self, name: &str, instance: &serde_json::Value) -> Result<(), SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;

        let validator =
            jsonschema::validator_for(schema).map_err(|e| SchemaError::Compile(e.to_string()))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|e| format!("{}: {e}", e.instance_path))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// Serialize a value and validate it against a named schema.
    ///
    /// # Errors
    ///
    /// As [`Self::validate`], plus `Serialize` if the value cannot be
    /// turned into JSON.
    pub fn validate_serialized<T: Serialize>(
        &self,
        name: &str,
        value: &T,
    ) -> Result<(), SchemaError> {
        self.validate(name, &serde_json::to_value(value)?)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        self.schemas.keys().copied().collect()
    }

    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
