use crate::models::{
    Author, CreateAuthorError, CreateAuthorRequest, DeleteAuthorError, DeleteAuthorRequest,
    FindAuthorError, FindAuthorRequest, SearchAuthorsError, SearchAuthorsRequest,
    UpdateAuthorError, UpdateAuthorRequest,
};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync + 'static {
    /// Persists a new author and assigns its id.
    async fn create_author(&self, req: &CreateAuthorRequest) -> Result<Author, CreateAuthorError>;

    async fn find_author(&self, req: &FindAuthorRequest) -> Result<Option<Author>, FindAuthorError>;

    async fn search_authors(
        &self,
        req: &SearchAuthorsRequest,
    ) -> Result<Vec<Author>, SearchAuthorsError>;

    /// Replaces the mutable fields of an existing author in one step.
    async fn update_author(&self, req: &UpdateAuthorRequest) -> Result<Author, UpdateAuthorError>;

    /// Deletes an existing author in one step.
    async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError>;
}
