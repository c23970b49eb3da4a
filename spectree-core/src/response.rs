use crate::error::DeclarationError;
use crate::model::ModelSchema;
use http::StatusCode;
use schemars::JsonSchema;
use serde_json::{json, Map, Value};

/// The documented responses of a route.
///
/// An ordered list of `(status, model)` entries. Statuses that carry a
/// model are the ones whose bodies get validated by validating routes.
///
/// ```ignore
/// let resp = ResponseSpec::new()
///     .model::<User>(StatusCode::OK)
///     .empty(StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResponseSpec {
    entries: Vec<(StatusCode, Option<ModelSchema>)>,
    pending: Option<DeclarationError>,
}

impl ResponseSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document `status` as returning a JSON body shaped like `T`.
    pub fn model<T: JsonSchema>(self, status: StatusCode) -> Self {
        match ModelSchema::of::<T>() {
            Ok(model) => self.push(status, Some(model)),
            Err(err) => self.fail(err),
        }
    }

    /// Document `status` with an already built model.
    pub fn schema(self, status: StatusCode, model: ModelSchema) -> Self {
        self.push(status, Some(model))
    }

    /// Document `status` as carrying no validated body.
    pub fn empty(self, status: StatusCode) -> Self {
        self.push(status, None)
    }

    fn push(mut self, status: StatusCode, model: Option<ModelSchema>) -> Self {
        match self.entries.iter().position(|(code, _)| *code == status) {
            Some(index) => self.entries[index].1 = model,
            None => self.entries.push((status, model)),
        }
        self
    }

    fn fail(mut self, err: DeclarationError) -> Self {
        self.pending.get_or_insert(err);
        self
    }

    /// The first declaration error recorded while building, if any.
    pub(crate) fn take_error(&mut self) -> Option<DeclarationError> {
        self.pending.take()
    }

    pub fn entries(&self) -> &[(StatusCode, Option<ModelSchema>)] {
        &self.entries
    }

    /// Every model referenced by the entries.
    pub fn models(&self) -> impl Iterator<Item = &ModelSchema> {
        self.entries.iter().filter_map(|(_, model)| model.as_ref())
    }

    /// Statuses whose bodies are validated.
    pub fn validated_codes(&self) -> impl Iterator<Item = StatusCode> + '_ {
        self.entries
            .iter()
            .filter(|(_, model)| model.is_some())
            .map(|(code, _)| *code)
    }

    pub fn model_for(&self, status: StatusCode) -> Option<&ModelSchema> {
        self.entries
            .iter()
            .find(|(code, _)| *code == status)
            .and_then(|(_, model)| model.as_ref())
    }

    /// The OpenAPI `responses` object for these entries.
    pub fn generate_spec(&self) -> Map<String, Value> {
        let mut responses = Map::new();
        for (status, model) in &self.entries {
            let description = status.canonical_reason().unwrap_or("Unknown Status");
            let entry = match model {
                Some(model) => json!({
                    "description": description,
                    "content": {
                        "application/json": {
                            "schema": { "$ref": format!("#/components/schemas/{}", model.name()) }
                        }
                    }
                }),
                None => json!({ "description": description }),
            };
            responses.insert(status.as_str().to_string(), entry);
        }
        responses
    }
}
