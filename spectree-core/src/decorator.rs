use crate::error::DeclarationError;
use crate::meta::{InstanceId, Role, RouteMeta};
use crate::model::ModelSchema;
use crate::response::ResponseSpec;
use schemars::JsonSchema;

/// Declaration of what a route accepts and returns.
///
/// Passed to [`SpecTree::doc`](crate::SpecTree::doc) or
/// [`SpecTree::validate`](crate::SpecTree::validate). Errors found while
/// building are kept and reported when the declaration is applied, so
/// startup fails on the first bad declaration.
///
/// ```ignore
/// let endpoint = tree.validate(
///     RouteDoc::new()
///         .query::<Page>()
///         .response(ResponseSpec::new().model::<Users>(StatusCode::OK))
///         .tags(["users"])
///         .comment("List users\n\nReturns one page of users."),
///     list_users,
/// )?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteDoc {
    query: Option<ModelSchema>,
    json: Option<ModelSchema>,
    headers: Option<ModelSchema>,
    cookies: Option<ModelSchema>,
    response: Option<ResponseSpec>,
    tags: Vec<String>,
    comment: Option<String>,
    error: Option<DeclarationError>,
}

impl RouteDoc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query string model (`?name=value`).
    pub fn query<T: JsonSchema>(self) -> Self {
        self.declare(Role::Query, ModelSchema::of::<T>())
    }

    /// JSON request body model.
    pub fn json<T: JsonSchema>(self) -> Self {
        self.declare(Role::Json, ModelSchema::of::<T>())
    }

    pub fn headers<T: JsonSchema>(self) -> Self {
        self.declare(Role::Headers, ModelSchema::of::<T>())
    }

    pub fn cookies<T: JsonSchema>(self) -> Self {
        self.declare(Role::Cookies, ModelSchema::of::<T>())
    }

    /// Declare a prebuilt model for a role.
    pub fn schema(self, role: Role, model: ModelSchema) -> Self {
        self.declare(role, Ok(model))
    }

    pub fn query_schema(self, model: ModelSchema) -> Self {
        self.schema(Role::Query, model)
    }

    pub fn json_schema(self, model: ModelSchema) -> Self {
        self.schema(Role::Json, model)
    }

    pub fn headers_schema(self, model: ModelSchema) -> Self {
        self.schema(Role::Headers, model)
    }

    pub fn cookies_schema(self, model: ModelSchema) -> Self {
        self.schema(Role::Cookies, model)
    }

    pub fn response(mut self, response: ResponseSpec) -> Self {
        self.response = Some(response);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Documentation comment: first paragraph is the summary, the rest the
    /// description.
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    fn declare(mut self, role: Role, model: Result<ModelSchema, DeclarationError>) -> Self {
        let model = match model {
            Ok(model) => model,
            Err(err) => {
                self.error.get_or_insert(err);
                return self;
            }
        };

        if role != Role::Json && !model.is_object() {
            self.error.get_or_insert(DeclarationError::NotAnObject {
                role,
                model: model.name().to_string(),
            });
            return self;
        }

        let slot = match role {
            Role::Query => &mut self.query,
            Role::Json => &mut self.json,
            Role::Headers => &mut self.headers,
            Role::Cookies => &mut self.cookies,
        };
        *slot = Some(model);
        self
    }

    /// Turn the declaration into immutable route metadata owned by `owner`.
    pub(crate) fn into_meta(
        mut self,
        owner: InstanceId,
        validating: bool,
    ) -> Result<RouteMeta, DeclarationError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if let Some(err) = self.response.as_mut().and_then(ResponseSpec::take_error) {
            return Err(err);
        }

        Ok(RouteMeta {
            owner,
            query: self.query,
            json: self.json,
            headers: self.headers,
            cookies: self.cookies,
            response: self.response,
            tags: self.tags,
            comment: self.comment,
            validating,
        })
    }
}
