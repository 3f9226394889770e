//! Driving port for completion history.

use async_trait::async_trait;

use crate::domain::{CompletionEntry, CompletionFilter, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionQuery: Send + Sync {
    /// Completions matching `filter`, newest first.
    async fn list_completions(
        &self,
        filter: CompletionFilter,
    ) -> Result<Vec<CompletionEntry>, Error>;
}
