use crate::adapter::Adapter;
use crate::comments;
use crate::error::SpecGenerationError;
use crate::meta::{HandlerRef, InstanceId, Role, RouteMeta};
use crate::params::{self, Parameter};
use crate::schema::SchemaRegistry;
use crate::tree::SpecTree;
use http::Method;
use serde_json::{json, Map, Value};

/// Body documented for the 422 answer of validating routes.
fn validation_error_response() -> Value {
    json!({
        "description": "Validation Error",
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "error": { "type": "string" },
                        "details": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "field": { "type": "string" },
                                    "message": { "type": "string" },
                                    "code": { "type": "string" }
                                },
                                "required": ["field", "message", "code"]
                            }
                        }
                    },
                    "required": ["error", "details"]
                }
            }
        }
    })
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

/// Path parameters followed by one parameter per property of the query,
/// header and cookie models. The first entry for a `(name, location)` pair
/// wins.
fn operation_parameters(
    path_params: &[Parameter],
    meta: Option<&RouteMeta>,
    models: &SchemaRegistry,
) -> Vec<Parameter> {
    let mut parameters: Vec<Parameter> = path_params.to_vec();

    let Some(meta) = meta else {
        return parameters;
    };

    for role in Role::ALL {
        let Some(location) = role.location() else {
            continue;
        };
        let Some(schema) = meta.model_name(role).and_then(|name| models.get(name)) else {
            continue;
        };
        for param in params::model_parameters(schema, location) {
            let seen = parameters
                .iter()
                .any(|p| p.name == param.name && p.location == param.location);
            if !seen {
                parameters.push(param);
            }
        }
    }

    parameters
}

fn operation_responses(meta: Option<&RouteMeta>) -> Map<String, Value> {
    let mut responses = meta
        .and_then(|meta| meta.response.as_ref())
        .map(|response| response.generate_spec())
        .unwrap_or_default();

    if responses.is_empty() {
        responses.insert(
            "200".into(),
            json!({ "description": "Successful Response" }),
        );
    }

    if let Some(meta) = meta {
        if meta.validating && meta.has_request_models() && !responses.contains_key("422") {
            responses.insert("422".into(), validation_error_response());
        }
    }

    responses
}

/// Every model the route references must be in the working registry.
/// Models owned by another instance (greedy mode) are merged in first.
///
/// Decoration registers every model of the metadata it builds, so a miss
/// only happens for metadata attached to a route table by hand.
fn resolve_models(
    operation_id: &str,
    meta: &RouteMeta,
    own_id: InstanceId,
    models: &mut SchemaRegistry,
) -> Result<(), SpecGenerationError> {
    for model in meta.models() {
        if models.contains(model.name()) {
            continue;
        }
        if meta.owner != own_id {
            models.register(model.name(), model.schema().clone());
            continue;
        }
        return Err(SpecGenerationError::MissingSchema {
            operation: operation_id.to_string(),
            schema: model.name().to_string(),
        });
    }
    Ok(())
}

fn build_operation(
    handler: &HandlerRef,
    method: &Method,
    path_params: &[Parameter],
    models: &SchemaRegistry,
    tags: &mut Vec<String>,
) -> Map<String, Value> {
    let meta = handler.meta();
    let name = handler.id().operation_name();
    let method_lower = method.as_str().to_lowercase();

    let (summary, description) = comments::parse_comments(meta.and_then(|m| m.comment.as_deref()));
    let route_tags: Vec<String> = meta.map(|m| m.tags.clone()).unwrap_or_default();
    for tag in &route_tags {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }

    let mut operation = Map::new();
    operation.insert(
        "summary".into(),
        json!(summary.unwrap_or_else(|| format!("{name} <{}>", method.as_str()))),
    );
    operation.insert("operationID".into(), json!(format!("{name}__{method_lower}")));
    operation.insert("description".into(), json!(description.unwrap_or_default()));
    operation.insert("tags".into(), json!(route_tags));
    operation.insert(
        "parameters".into(),
        json!(operation_parameters(path_params, meta, models)),
    );
    operation.insert("responses".into(), Value::Object(operation_responses(meta)));

    if let Some(body) = meta.and_then(|m| m.model_name(Role::Json)) {
        operation.insert(
            "requestBody".into(),
            json!({
                "content": {
                    "application/json": { "schema": schema_ref(body) }
                }
            }),
        );
    }

    operation
}

/// Build the OpenAPI document of every route the adapter reports.
///
/// Works on a copy of the instance's registry; the stored registry keeps
/// its nested definitions.
pub(crate) fn generate<A: Adapter>(tree: &SpecTree<A>) -> Result<Value, SpecGenerationError> {
    let adapter = tree.adapter();
    let config = tree.config();
    let mut models = tree.models();
    let mut paths: Map<String, Value> = Map::new();
    let mut tags: Vec<String> = Vec::new();
    let mut operations = 0usize;

    for route in adapter.find_routes() {
        let (path, path_params) = adapter.parse_path(&route)?;

        for (method, handler) in adapter.parse_func(&route) {
            if adapter.bypass(&handler, &method) || tree.bypass(handler.meta()) {
                tracing::debug!(
                    path = %path,
                    method = %method,
                    handler = handler.id().type_name(),
                    "route left out of the document"
                );
                continue;
            }

            if let Some(meta) = handler.meta() {
                let operation_id = format!(
                    "{}__{}",
                    handler.id().operation_name(),
                    method.as_str().to_lowercase()
                );
                resolve_models(&operation_id, meta, tree.id(), &mut models)?;
            }

            let operation = build_operation(&handler, &method, &path_params, &models, &mut tags);
            let entry = paths
                .entry(path.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(obj) = entry.as_object_mut() {
                obj.insert(method.as_str().to_lowercase(), Value::Object(operation));
            }
            operations += 1;
        }
    }

    let definitions = models.extract_definitions();
    let schemas = models.into_schemas();

    tracing::info!(
        title = %config.title,
        mode = %config.mode,
        paths = paths.len(),
        operations,
        schemas = schemas.len(),
        "generated OpenAPI document"
    );

    let tags: Vec<Value> = tags.into_iter().map(|name| json!({ "name": name })).collect();

    Ok(json!({
        "openapi": config.openapi_version,
        "info": {
            "title": config.title,
            "version": config.version,
        },
        "tags": tags,
        "paths": paths,
        "components": {
            "schemas": schemas,
        },
        "definitions": definitions,
    }))
}
