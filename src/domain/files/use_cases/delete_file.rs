use std::sync::Arc;

use async_trait::async_trait;

use crate::database::models::User;
use crate::dispatch::{Handler, Request};
use crate::domain::files::FileStore;
use crate::domain::{DomainError, DomainResult};

pub struct DeleteFile {
    pub id: i32,
    pub user: User,
}

impl Request for DeleteFile {
    type Response = DeleteFileResponse;
}

pub struct DeleteFileResponse;

pub struct DeleteFileHandler {
    files: Arc<dyn FileStore>,
}

impl DeleteFileHandler {
    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self { files }
    }
}

#[async_trait]
impl Handler<DeleteFile> for DeleteFileHandler {
    async fn handle(&self, command: DeleteFile) -> DomainResult<DeleteFileResponse> {
        let DeleteFile { id, user } = command;

        let entity = self
            .files
            .find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("File {id} was not found")))?;

        if entity.user_id.as_deref() != Some(user.id.as_str()) {
            return Err(DomainError::forbidden("File belongs to another user"));
        }

        self.files.delete(entity.id).await?;

        Ok(DeleteFileResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::files::NewFile;
    use crate::testing::{fake_user, InMemoryFileStore};

    async fn seed_file(files: &InMemoryFileStore, user_id: Option<&str>) -> i32 {
        files
            .insert(NewFile {
                file_name: "notes.txt".to_string(),
                mime_type: "text/plain".to_string(),
                file_size: 5,
                user_id: user_id.map(str::to_string),
                bucket_id: Some(1),
                extension_id: None,
                conversation_id: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn foreign_file_is_forbidden() {
        let files = Arc::new(InMemoryFileStore::default());
        let id = seed_file(&files, Some("u2")).await;

        let handler = DeleteFileHandler::new(files.clone());
        let result = handler.handle(DeleteFile { id, user: fake_user("u1") }).await;

        assert!(matches!(result, Err(DomainError::Forbidden(_))));
        assert!(files.find(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let files = Arc::new(InMemoryFileStore::default());

        let handler = DeleteFileHandler::new(files);
        let result = handler
            .handle(DeleteFile { id: 999, user: fake_user("u1") })
            .await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
}
