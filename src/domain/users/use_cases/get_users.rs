use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::User;
use crate::dispatch::{Handler, Request};
use crate::domain::users::UserStore;
use crate::domain::DomainResult;

pub struct GetUsers {
    pub page: i64,
    pub page_size: i64,
}

impl Request for GetUsers {
    type Response = GetUsersResponse;
}

pub struct GetUsersResponse {
    pub users: Vec<User>,
    pub total: i64,
}

pub struct GetUsersHandler {
    users: Arc<dyn UserStore>,
}

impl GetUsersHandler {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<GetUsers> for GetUsersHandler {
    async fn handle(&self, query: GetUsers) -> DomainResult<GetUsersResponse> {
        let page = query.page.max(0);
        let page_size = query.page_size.clamp(1, 500);

        let result = self.users.list(page, page_size).await?;

        Ok(GetUsersResponse {
            users: result.items,
            total: result.total,
        })
    }
}
