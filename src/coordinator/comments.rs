use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::{validate_content, CoordinatorError};
use crate::entity_store::EntityStore;
use crate::model::Comment;
use crate::transport::{CommentPatch, NewComment, Operation, Transport};

/// Creates, edits and deletes comments, patching the entity store with the
/// backend's answer instead of refetching.
///
/// Edit and delete assume the caller only offers them to the comment's
/// author (see [`Comment::is_authored_by`]); authorship is not re-checked.
pub struct CommentCoordinator<T> {
    transport: Arc<T>,
    store: EntityStore,
}

impl<T: Transport> CommentCoordinator<T> {
    pub fn new(transport: Arc<T>, store: EntityStore) -> Self {
        Self { transport, store }
    }

    /// Post a new comment. On success the stored comment goes to the head
    /// of the collection.
    #[instrument(skip(self, comment), fields(store_id = %comment.store_id, author_id = %comment.user_id))]
    pub async fn create(&self, comment: NewComment) -> Result<Comment, CoordinatorError> {
        validate_content(&comment.content)?;
        self.store.snapshot()?;

        let created = self
            .transport
            .create_comment(&comment)
            .await
            .map_err(|e| {
                warn!(error = %e, "comment creation failed");
                CoordinatorError::mutation(Operation::CreateComment, e)
            })?;

        self.store
            .upsert_comment(created.clone())
            .map_err(|e| CoordinatorError::unsynced(Operation::CreateComment, e))?;
        info!(comment_id = %created.id, "comment created");
        Ok(created)
    }

    /// Overwrite a comment's content and recommendation.
    #[instrument(skip(self, comment, content), fields(comment_id = %comment.id))]
    pub async fn update(
        &self,
        comment: &Comment,
        content: String,
        is_recommended: bool,
    ) -> Result<Comment, CoordinatorError> {
        validate_content(&content)?;
        self.store.snapshot()?;

        let patch = CommentPatch {
            content,
            is_recommended,
        };
        let updated = self
            .transport
            .update_comment(&comment.id, &patch)
            .await
            .map_err(|e| {
                warn!(error = %e, "comment update failed");
                CoordinatorError::mutation(Operation::UpdateComment, e)
            })?
            .with_relations_from(comment);

        self.store
            .upsert_comment(updated.clone())
            .map_err(|e| CoordinatorError::unsynced(Operation::UpdateComment, e))?;
        info!(is_recommended = updated.is_recommended, "comment updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, comment_id: &str) -> Result<(), CoordinatorError> {
        self.store.snapshot()?;

        self.transport
            .delete_comment(comment_id)
            .await
            .map_err(|e| {
                warn!(error = %e, "comment deletion failed");
                CoordinatorError::mutation(Operation::DeleteComment, e)
            })?;

        self.store
            .remove_comment(comment_id)
            .map_err(|e| CoordinatorError::unsynced(Operation::DeleteComment, e))?;
        info!("comment deleted");
        Ok(())
    }
}
