use crate::models::{CreateUserRequest, User};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct UserService {
    users: Arc<RwLock<Vec<User>>>,
}

impl Default for UserService {
    fn default() -> Self {
        let users = vec![
            User {
                id: 1,
                name: "Alice".into(),
                email: "alice@example.com".into(),
            },
            User {
                id: 2,
                name: "Bob".into(),
                email: "bob@example.com".into(),
            },
        ];
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }
}

impl UserService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns one page of users and the total count.
    pub async fn list(&self, limit: usize, offset: usize) -> (Vec<User>, usize) {
        let users = self.users.read().await;
        let page = users.iter().skip(offset).take(limit).cloned().collect();
        (page, users.len())
    }

    pub async fn get(&self, id: u64) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    pub async fn create(&self, request: CreateUserRequest) -> User {
        let mut users = self.users.write().await;
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            name: request.name,
            email: request.email,
        };
        users.push(user.clone());
        user
    }

    pub async fn delete(&self, id: u64) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        users.len() != before
    }
}
