use crate::error::DeclarationError;
use jsonschema::Validator;
use schemars::JsonSchema;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Recursively rewrite `$ref` paths from schemars format to the hoisted
/// `definitions` format.
///
/// schemars 1.x emits Draft 2020-12 (`$defs`, `$ref: "#/$defs/X"`). The
/// document keeps nested types under a top-level `definitions` map, so
/// references must point at `#/definitions/X` both inside the model and
/// once the definitions have been hoisted.
fn sanitize_refs(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(ref_str)) = obj.get_mut("$ref") {
                if ref_str.starts_with("#/$defs/") {
                    *ref_str = ref_str.replace("#/$defs/", "#/definitions/");
                }
            }

            for (_, v) in obj.iter_mut() {
                sanitize_refs(v);
            }
        }
        Value::Array(arr) => {
            for v in arr.iter_mut() {
                sanitize_refs(v);
            }
        }
        _ => {}
    }
}

/// A named JSON Schema fragment together with its compiled validator.
///
/// Identity is the name. The validator is compiled once, from the schema as
/// declared (nested `definitions` included), so it keeps working after the
/// registry copy of the schema has had its definitions hoisted.
#[derive(Clone)]
pub struct ModelSchema {
    name: String,
    schema: Value,
    validator: Arc<Validator>,
}

impl ModelSchema {
    /// Build the schema of a Rust type through `schemars`.
    pub fn of<T: JsonSchema>() -> Result<Self, DeclarationError> {
        let name = T::schema_name().into_owned();
        let schema = serde_json::to_value(schemars::schema_for!(T)).map_err(|err| {
            DeclarationError::InvalidSchema {
                model: name.clone(),
                reason: err.to_string(),
            }
        })?;
        Self::from_value(name, schema)
    }

    /// Build a model from a raw JSON Schema document.
    pub fn from_value(name: impl Into<String>, mut schema: Value) -> Result<Self, DeclarationError> {
        let name = name.into();
        let Some(obj) = schema.as_object_mut() else {
            return Err(DeclarationError::InvalidSchema {
                model: name,
                reason: "schema must be a JSON object".to_string(),
            });
        };

        obj.remove("$schema");
        if let Some(Value::Object(defs)) = obj.remove("$defs") {
            let target = obj
                .entry("definitions")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(target) = target.as_object_mut() {
                target.extend(defs);
            }
        }
        sanitize_refs(&mut schema);

        let validator =
            jsonschema::validator_for(&schema).map_err(|err| DeclarationError::InvalidSchema {
                model: name.clone(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            name,
            schema,
            validator: Arc::new(validator),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.schema.get("properties")?.as_object()
    }

    /// Whether the schema describes an object, i.e. can be spread into
    /// named parameters.
    pub fn is_object(&self) -> bool {
        self.properties().is_some() || self.schema.get("type") == Some(&Value::from("object"))
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties()?.get(name)
    }

    /// Validate an instance, returning every violation message.
    pub fn validate(&self, instance: &Value) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|err| err.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}

impl std::fmt::Debug for ModelSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSchema")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish()
    }
}

impl PartialEq for ModelSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.schema == other.schema
    }
}
