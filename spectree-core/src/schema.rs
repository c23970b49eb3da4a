use serde_json::{Map, Value};
use std::collections::HashMap;

/// Registry that collects the JSON Schema of every declared model.
///
/// Keys are model names and iterate in first-registration order. On a name
/// collision the last registration wins: two different types sharing a
/// schema name silently share one component, so a warning is logged when
/// the stored fragment actually changes.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    order: Vec<String>,
    schemas: HashMap<String, Value>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema definition under the given name, replacing any
    /// previous one.
    pub fn register(&mut self, name: &str, schema: Value) {
        match self.schemas.insert(name.to_string(), schema) {
            None => self.order.push(name.to_string()),
            Some(previous) => {
                if self.schemas.get(name) != Some(&previous) {
                    tracing::warn!(
                        model = name,
                        "schema name registered twice with different content; last registration wins"
                    );
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Check if a schema is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate `(name, schema)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.order
            .iter()
            .filter_map(|name| self.schemas.get(name).map(|schema| (name.as_str(), schema)))
    }

    /// Move every nested `definitions` entry out of the stored schemas.
    ///
    /// Returns the merged map; on a key collision the schema registered
    /// later wins. Afterwards no stored schema carries a `definitions` key.
    pub fn extract_definitions(&mut self) -> Map<String, Value> {
        let mut definitions = Map::new();
        for name in &self.order {
            let Some(Value::Object(schema)) = self.schemas.get_mut(name) else {
                continue;
            };
            if let Some(Value::Object(nested)) = schema.remove("definitions") {
                definitions.extend(nested);
            }
        }
        definitions
    }

    /// Consume the registry and return the schemas map for embedding in the
    /// document's `components.schemas`.
    pub fn into_schemas(self) -> Map<String, Value> {
        let mut schemas = self.schemas;
        self.order
            .into_iter()
            .filter_map(|name| schemas.remove(&name).map(|schema| (name, schema)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_shared(own: &str, shared: Value) -> Value {
        let mut definitions = Map::new();
        definitions.insert("Shared".into(), shared);
        definitions.insert(own.into(), json!({ "type": "string" }));
        json!({
            "type": "object",
            "properties": { "shared": { "$ref": "#/definitions/Shared" } },
            "definitions": definitions
        })
    }

    #[test]
    fn later_nested_definitions_win() {
        let mut registry = SchemaRegistry::new();
        registry.register("Order", with_shared("OrderOnly", json!({ "type": "integer" })));
        registry.register("Invoice", with_shared("InvoiceOnly", json!({ "type": "string" })));

        let definitions = registry.extract_definitions();
        assert_eq!(definitions["Shared"], json!({ "type": "string" }));
        assert!(definitions.contains_key("OrderOnly"));
        assert!(definitions.contains_key("InvoiceOnly"));
    }

    #[test]
    fn definitions_are_removed_from_every_schema() {
        let mut registry = SchemaRegistry::new();
        registry.register("Order", with_shared("OrderOnly", json!({ "type": "integer" })));
        registry.register("Empty", json!({ "type": "object", "definitions": {} }));
        registry.register("Plain", json!({ "type": "object" }));

        registry.extract_definitions();
        for (name, schema) in registry.iter() {
            assert!(schema.get("definitions").is_none(), "{name} kept definitions");
        }
        assert_eq!(registry.get("Empty"), Some(&json!({ "type": "object" })));
    }

    #[test]
    fn into_schemas_keeps_registration_order() {
        let mut registry = SchemaRegistry::new();
        for name in ["Zeta", "Alpha", "Mid"] {
            registry.register(name, json!({ "type": "object" }));
        }
        let names: Vec<String> = registry.into_schemas().keys().cloned().collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn last_registration_wins_without_reordering() {
        let mut registry = SchemaRegistry::new();
        registry.register("User", json!({ "type": "object" }));
        registry.register("Role", json!({ "type": "string" }));
        registry.register("User", json!({ "type": "object", "title": "v2" }));
        registry.register("User", json!({ "type": "object", "title": "v2" }));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("User").unwrap()["title"], "v2");
        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["User", "Role"]);
    }
}
