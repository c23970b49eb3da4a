use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateUserRequest {
    #[schemars(length(min = 1, max = 100))]
    pub name: String,
    #[schemars(length(min = 3))]
    pub email: String,
}

/// Page of a listing.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct Pagination {
    #[schemars(range(min = 1, max = 100))]
    pub limit: u32,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UserList {
    pub users: Vec<User>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ClientHeaders {
    /// Identifier of the calling client, echoed in logs.
    pub x_client_id: Option<String>,
}
