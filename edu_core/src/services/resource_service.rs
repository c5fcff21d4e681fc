use std::sync::Arc;

use tracing::{debug, info, warn};
use validator::Validate;

use crate::{
    database::Repository,
    error::{AppError, Result},
    models::{
        ContentItem, CreateContentInput, CreateGameSessionInput, CreateUserInput, GameSession,
        ListQuery, Page, UpdateContentInput, UpdateGameSessionInput, UpdateUserInput, User,
    },
};

/// A repository bound at start-up, whatever backend it talks to.
pub type SharedRepository<T, C, U> = Arc<dyn Repository<T, CreateInput = C, UpdateInput = U>>;

pub type ContentService = ResourceService<ContentItem, CreateContentInput, UpdateContentInput>;
pub type UserService = ResourceService<User, CreateUserInput, UpdateUserInput>;
pub type GameSessionService =
    ResourceService<GameSession, CreateGameSessionInput, UpdateGameSessionInput>;

/// Validates input, delegates to the repository and turns absence into
/// `NotFound`. Handlers wrap whatever comes back in the response envelope.
pub struct ResourceService<T, C, U> {
    repository: SharedRepository<T, C, U>,
    resource: &'static str,
}

impl<T, C, U> Clone for ResourceService<T, C, U> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            resource: self.resource,
        }
    }
}

impl<T, C, U> ResourceService<T, C, U>
where
    C: Validate + Send,
    U: Validate + Send,
{
    pub fn new(repository: SharedRepository<T, C, U>, resource: &'static str) -> Self {
        Self {
            repository,
            resource,
        }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub async fn list(&self, query: ListQuery) -> Result<Page<T>> {
        self.list_matching(query, |_| true).await
    }

    /// Like [`list`](Self::list), but only entities accepted by `predicate`
    /// count towards the page and its `total`.
    pub async fn list_matching<F>(&self, query: ListQuery, predicate: F) -> Result<Page<T>>
    where
        F: Fn(&T) -> bool + Send,
    {
        let all = self.repository.find_all().await?;
        let matching: Vec<T> = all.into_iter().filter(|entity| predicate(entity)).collect();
        let page = Page::from_all(matching, query);

        debug!(
            "Listed {} {} (total {}, limit {}, offset {})",
            page.items.len(),
            self.resource,
            page.total,
            page.limit,
            page.offset
        );
        Ok(page)
    }

    pub async fn count(&self) -> Result<usize> {
        Ok(self.repository.find_all().await?.len())
    }

    pub async fn get(&self, id: &str) -> Result<T> {
        debug!("Fetching {} {}", self.resource, id);

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} with id {} not found", self.resource, id)))
    }

    pub async fn create(&self, input: C) -> Result<T> {
        if let Err(errors) = input.validate() {
            warn!("Rejected {} creation: {}", self.resource, errors);
            return Err(errors.into());
        }

        let created = self.repository.create(input).await?;
        info!("Created {}", self.resource);
        Ok(created)
    }

    pub async fn update(&self, id: &str, input: U) -> Result<T> {
        if let Err(errors) = input.validate() {
            warn!("Rejected {} update for {}: {}", self.resource, id, errors);
            return Err(errors.into());
        }

        let updated = self.repository.update(id, input).await?;
        info!("Updated {} {}", self.resource, id);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repository.delete(id).await?;
        info!("Deleted {} {}", self.resource, id);
        Ok(())
    }
}
