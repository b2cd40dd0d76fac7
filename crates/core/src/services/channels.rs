//! Channel lifecycle.

use minds_common::AppResult;
use minds_db::{entities::user, repositories::UserRepository};
use tracing::info;

/// Channel service.
#[derive(Clone)]
pub struct ChannelService {
    user_repo: UserRepository,
}

impl ChannelService {
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Delete a channel. The row is kept, flagged deleted, and its token revoked.
    pub async fn delete(&self, user: &user::Model) -> AppResult<()> {
        self.user_repo.mark_deleted(user.guid).await?;
        info!(user = user.guid, username = %user.username, "Channel deleted");
        Ok(())
    }
}
