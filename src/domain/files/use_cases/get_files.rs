use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::{File, User};
use crate::dispatch::{Handler, Request};
use crate::domain::files::FileStore;
use crate::domain::DomainResult;

pub struct GetFiles {
    pub user: User,
    pub page: i64,
    pub page_size: i64,
}

impl Request for GetFiles {
    type Response = GetFilesResponse;
}

pub struct GetFilesResponse {
    pub files: Vec<File>,
    pub total: i64,
}

pub struct GetFilesHandler {
    files: Arc<dyn FileStore>,
}

impl GetFilesHandler {
    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self { files }
    }
}

#[async_trait]
impl Handler<GetFiles> for GetFilesHandler {
    async fn handle(&self, query: GetFiles) -> DomainResult<GetFilesResponse> {
        let page = query.page.max(0);
        let page_size = query.page_size.clamp(1, 200);

        let result = self
            .files
            .list_for_user(&query.user.id, page, page_size)
            .await?;

        Ok(GetFilesResponse {
            files: result.items,
            total: result.total,
        })
    }
}
