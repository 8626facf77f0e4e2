use async_trait::async_trait;

use crate::database::models::{Session, User, UserGroup};
use crate::domain::DomainResult;

pub mod use_cases;

pub struct NewUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub api_key: Option<String>,
    pub password_hash: Option<String>,
    pub user_group_id: Option<String>,
}

pub struct UserPage {
    pub items: Vec<User>,
    pub total: i64,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, id: &str) -> DomainResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn find_by_api_key(&self, api_key: &str) -> DomainResult<Option<User>>;

    async fn list(&self, page: i64, page_size: i64) -> DomainResult<UserPage>;

    async fn insert(&self, user: NewUser) -> DomainResult<User>;

    async fn update(&self, user: &User) -> DomainResult<User>;

    async fn count_in_group(&self, user_group_id: &str) -> DomainResult<i64>;
}

pub struct NewUserGroup {
    pub id: String,
    pub name: String,
    pub is_admin: bool,
    pub is_built_in: bool,
    pub monthly_tokens: Option<i32>,
    pub monthly_user_tokens: Option<i32>,
}

#[async_trait]
pub trait UserGroupStore: Send + Sync {
    async fn find(&self, id: &str) -> DomainResult<Option<UserGroup>>;

    async fn list(&self) -> DomainResult<Vec<UserGroup>>;

    async fn insert(&self, group: NewUserGroup) -> DomainResult<UserGroup>;

    async fn update(&self, group: &UserGroup) -> DomainResult<UserGroup>;

    async fn delete(&self, id: &str) -> DomainResult<()>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn find(&self, id: &str) -> DomainResult<Option<Session>>;

    async fn insert(&self, session: &Session) -> DomainResult<()>;

    async fn delete(&self, id: &str) -> DomainResult<()>;
}
