pub mod file;
pub mod gist;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::SeenState;

pub use file::FileStore;
pub use gist::GistStore;

/// Name of the state document, both as gist file name and default local file.
pub const STATE_FILE_NAME: &str = "tidings-state.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new remote store was created. The operator must configure this id
    /// for later runs to share state.
    Created { id: String },
    Updated,
}

/// Persistence for [`SeenState`] between runs.
#[async_trait]
pub trait StateStore {
    /// Load the last persisted state; an absent store or document is an empty state.
    async fn load(&self) -> Result<SeenState>;

    /// Persist `state`, replacing whatever was stored before.
    async fn save(&self, state: &SeenState) -> Result<SaveOutcome>;
}
