use crate::error::SpecGenerationError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Where a parameter is located in the HTTP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// One entry of an operation's `parameters` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParamLocation,
    pub required: bool,
    pub schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    /// A parameter inferred from a `{name}` placeholder.
    pub fn path(name: &str) -> Self {
        Self {
            name: name.to_string(),
            location: ParamLocation::Path,
            required: true,
            schema: serde_json::json!({ "type": "string" }),
            description: None,
        }
    }
}

/// Values captured from path placeholders, by name.
pub type PathParams = HashMap<String, String>;

/// Normalize a route path template and infer its path parameters.
///
/// Accepts `{name}` and catch-all `{*name}` placeholders; both are
/// documented as `{name}`.
pub fn parse_template(path: &str) -> Result<(String, Vec<Parameter>), SpecGenerationError> {
    let invalid = |reason: &str| SpecGenerationError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let mut normalized = String::with_capacity(path.len());
    let mut params: Vec<Parameter> = Vec::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' | '/' => return Err(invalid("unterminated placeholder")),
                        c => name.push(c),
                    }
                }
                if !closed {
                    return Err(invalid("unterminated placeholder"));
                }
                let name = name.strip_prefix('*').unwrap_or(&name);
                if name.is_empty() {
                    return Err(invalid("empty placeholder"));
                }
                if params.iter().any(|p| p.name == name) {
                    return Err(invalid("duplicate placeholder"));
                }
                normalized.push('{');
                normalized.push_str(name);
                normalized.push('}');
                params.push(Parameter::path(name));
            }
            '}' => return Err(invalid("unbalanced '}'")),
            c => normalized.push(c),
        }
    }

    Ok((normalized, params))
}

fn decode(raw: &str) -> Option<String> {
    urlencoding::decode(raw).ok().map(|value| value.into_owned())
}

/// Match a request path against a route template, capturing placeholders.
///
/// A `{name}` placeholder matches exactly one non-empty segment, a
/// `{*name}` placeholder matches the rest of the path. Captured values are
/// percent-decoded; a capture that does not decode to UTF-8 is no match.
pub fn match_path(template: &str, path: &str) -> Option<PathParams> {
    let mut params = PathParams::new();
    let mut segments = path.trim_start_matches('/').split('/');

    for pattern in template.trim_start_matches('/').split('/') {
        if let Some(name) = pattern.strip_prefix("{*").and_then(|p| p.strip_suffix('}')) {
            let rest: Vec<&str> = segments.by_ref().collect();
            params.insert(name.to_string(), decode(&rest.join("/"))?);
            return Some(params);
        }

        let segment = segments.next()?;
        match pattern.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            Some(name) => {
                if segment.is_empty() {
                    return None;
                }
                params.insert(name.to_string(), decode(segment)?);
            }
            None if pattern == segment => {}
            None => return None,
        }
    }

    segments.next().is_none().then_some(params)
}

/// One parameter per property of an object schema.
pub fn model_parameters(schema: &Value, location: ParamLocation) -> Vec<Parameter> {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    properties
        .iter()
        .map(|(name, property)| Parameter {
            name: name.clone(),
            location,
            required: required.contains(&name.as_str()),
            schema: property.clone(),
            description: property
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
        .collect()
}

/// The primitive JSON type a schema declares, ignoring `null` alternatives
/// (`Option<T>` fields are emitted as `["integer", "null"]` or `anyOf`).
fn primitive_type(schema: &Value) -> Option<&str> {
    match schema.get("type") {
        Some(Value::String(ty)) => return Some(ty.as_str()),
        Some(Value::Array(types)) => {
            return types.iter().filter_map(Value::as_str).find(|ty| *ty != "null")
        }
        _ => {}
    }
    ["anyOf", "oneOf"]
        .iter()
        .filter_map(|key| schema.get(*key).and_then(Value::as_array))
        .flatten()
        .find_map(|alt| primitive_type(alt).filter(|ty| *ty != "null"))
}

/// Convert a raw string to the JSON type its schema declares.
///
/// Values that do not parse stay strings so that schema validation reports
/// them instead of the conversion silently dropping them.
pub fn coerce(raw: &str, schema: Option<&Value>) -> Value {
    let string = || Value::String(raw.to_string());
    match schema.and_then(primitive_type) {
        Some("integer") => raw.parse::<i64>().map(Value::from).unwrap_or_else(|_| string()),
        Some("number") => raw.parse::<f64>().map(Value::from).unwrap_or_else(|_| string()),
        Some("boolean") => raw.parse::<bool>().map(Value::from).unwrap_or_else(|_| string()),
        _ => string(),
    }
}

fn header_key(name: &str) -> String {
    name.to_ascii_lowercase().replace('_', "-")
}

/// Build the JSON object validated for a query/header/cookie model from raw
/// name/value pairs.
///
/// Repeated names become arrays when the property is an array, otherwise the
/// last value wins. With `headers` set, names match properties
/// case-insensitively and `_` matches `-`.
pub fn collect(pairs: &[(String, String)], schema: Option<&Value>, headers: bool) -> Value {
    let properties = schema
        .and_then(|s| s.get("properties"))
        .and_then(Value::as_object);

    let lookup: HashMap<String, &str> = match (properties, headers) {
        (Some(properties), true) => properties
            .keys()
            .map(|name| (header_key(name), name.as_str()))
            .collect(),
        _ => HashMap::new(),
    };

    let mut out = Map::new();
    for (raw_name, raw_value) in pairs {
        let name = if headers {
            let key = header_key(raw_name);
            lookup
                .get(&key)
                .map(|name| name.to_string())
                .unwrap_or_else(|| raw_name.to_ascii_lowercase())
        } else {
            raw_name.clone()
        };

        let property = properties.and_then(|p| p.get(&name));
        if property.and_then(primitive_type) == Some("array") {
            let items = property.and_then(|p| p.get("items"));
            let value = coerce(raw_value, items);
            match out.get_mut(&name) {
                Some(Value::Array(existing)) => existing.push(value),
                _ => {
                    out.insert(name, Value::Array(vec![value]));
                }
            }
        } else {
            out.insert(name, coerce(raw_value, property));
        }
    }
    Value::Object(out)
}
