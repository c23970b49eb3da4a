use crate::error::{FieldError, RequestValidationError, ResponseValidationError};
use crate::meta::{Role, RouteMeta};
use crate::model::ModelSchema;
use crate::params::{self, PathParams};
use crate::reply::Reply;
use bytes::Bytes;
use http::header::COOKIE;
use http::{Extensions, HeaderMap, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

// ── Raw request ────────────────────────────────────────────

/// Framework-neutral view of an incoming request, before validation.
#[derive(Debug, Default)]
pub struct RawRequest {
    pub method: Method,
    pub path_params: PathParams,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    pub body: Bytes,
    pub extensions: Extensions,
}

impl RawRequest {
    /// Build from `http` request parts and an already buffered body.
    pub fn from_parts(parts: http::request::Parts, path_params: PathParams, body: Bytes) -> Self {
        let query = parts.uri.query().map(parse_query).unwrap_or_default();
        let cookies = parse_cookies(&parts.headers);
        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        Self {
            method: parts.method,
            path_params,
            query,
            headers,
            cookies,
            body,
            extensions: parts.extensions,
        }
    }
}

/// Decode a query string into name/value pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Collect cookies from every `Cookie` header.
pub fn parse_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

// ── Validated request ──────────────────────────────────────

/// What a handler receives: request data parsed into JSON and, for
/// validating routes, checked against the declared models.
#[derive(Debug)]
pub struct ValidatedRequest {
    method: Method,
    path: PathParams,
    query: Value,
    json: Value,
    headers: Value,
    cookies: Value,
    extensions: Extensions,
}

impl ValidatedRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path.get(name).map(String::as_str)
    }

    pub fn path_params(&self) -> &PathParams {
        &self.path
    }

    /// Raw JSON of one request part.
    pub fn value(&self, role: Role) -> &Value {
        match role {
            Role::Query => &self.query,
            Role::Json => &self.json,
            Role::Headers => &self.headers,
            Role::Cookies => &self.cookies,
        }
    }

    pub fn query<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.query)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.json)
    }

    pub fn headers<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.headers)
    }

    pub fn cookies<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.cookies)
    }

    /// Request extension inserted by the host framework or a middleware.
    pub fn extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }
}

fn check(model: Option<&ModelSchema>, role: Role, value: &Value, errors: &mut Vec<FieldError>) {
    let Some(model) = model else {
        return;
    };
    if let Err(messages) = model.validate(value) {
        errors.extend(
            messages
                .into_iter()
                .map(|message| FieldError::new(role.as_str(), message, "validation")),
        );
    }
}

/// Parse a raw request and, when `enforce` is set, validate every declared
/// part against its model.
///
/// Without metadata (or without `enforce`) the data is only parsed, which is
/// what the doc-only variant hands to its handler.
pub fn validate_request(
    meta: Option<&RouteMeta>,
    raw: RawRequest,
    enforce: bool,
) -> Result<ValidatedRequest, RequestValidationError> {
    let model = |role: Role| meta.and_then(|meta| meta.model(role));
    let mut errors = Vec::new();

    let query = params::collect(&raw.query, model(Role::Query).map(ModelSchema::schema), false);
    let headers = params::collect(&raw.headers, model(Role::Headers).map(ModelSchema::schema), true);
    let cookies = params::collect(&raw.cookies, model(Role::Cookies).map(ModelSchema::schema), false);

    let mut body_parsed = true;
    let json = if raw.body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&raw.body).unwrap_or_else(|err| {
            if enforce && model(Role::Json).is_some() {
                errors.push(FieldError::new(
                    Role::Json.as_str(),
                    format!("invalid JSON body: {err}"),
                    "parse",
                ));
            }
            body_parsed = false;
            Value::Null
        })
    };

    if enforce {
        check(model(Role::Query), Role::Query, &query, &mut errors);
        if body_parsed {
            check(model(Role::Json), Role::Json, &json, &mut errors);
        }
        check(model(Role::Headers), Role::Headers, &headers, &mut errors);
        check(model(Role::Cookies), Role::Cookies, &cookies, &mut errors);
    }

    if !errors.is_empty() {
        return Err(RequestValidationError { errors });
    }

    Ok(ValidatedRequest {
        method: raw.method,
        path: raw.path_params,
        query,
        json,
        headers,
        cookies,
        extensions: raw.extensions,
    })
}

/// Check a handler's reply against the model declared for its status.
///
/// Statuses without a model are not checked.
pub fn validate_response(meta: &RouteMeta, reply: &Reply) -> Result<(), ResponseValidationError> {
    let Some(model) = meta
        .response
        .as_ref()
        .and_then(|response| response.model_for(reply.status()))
    else {
        return Ok(());
    };

    model
        .validate(reply.body())
        .map_err(|errors| ResponseValidationError {
            status: reply.status(),
            model: model.name().to_string(),
            errors,
        })
}
