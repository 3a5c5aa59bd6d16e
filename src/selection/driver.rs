//! Async driver binding the cascade state machine to the location client.

use crate::selection::cascade::{CascadeState, FetchCommand};
use crate::selection::client::LocationClient;
use crate::selection::session::Session;
use crate::selection::types::{Level, SelectionResult};

/// One form's hierarchy selection, fetches included.
///
/// The driver executes the `FetchCommand`s the state machine emits and
/// feeds results back through `apply_options`; the machine's generation
/// guard makes any response that arrives after a parent change a no-op.
pub struct SelectionSession {
    client: LocationClient,
    session: Session,
    cascade: CascadeState,
}

impl SelectionSession {
    pub fn new(
        client: LocationClient,
        session: Session,
        levels: Vec<Level>,
    ) -> SelectionResult<Self> {
        Ok(Self {
            client,
            session,
            cascade: CascadeState::new(levels)?,
        })
    }

    /// Load the top level's options.
    pub async fn start(&mut self) -> SelectionResult<()> {
        let command = self.cascade.begin();
        self.execute(command).await
    }

    /// Select a value at a level and, when it resolves, load its children.
    ///
    /// A fetch failure leaves the child level usable-but-empty; the error
    /// comes back so the caller decides what to show.
    pub async fn choose(&mut self, level_index: usize, name: &str) -> SelectionResult<()> {
        match self.cascade.select(level_index, name)? {
            Some(command) => self.execute(command).await,
            None => Ok(()),
        }
    }

    async fn execute(&mut self, command: FetchCommand) -> SelectionResult<()> {
        let outcome = self
            .client
            .fetch_level(&self.session, command.level, command.parent_id.as_deref())
            .await;
        let for_caller = outcome.as_ref().map(|_| ()).map_err(|e| e.clone());
        self.cascade.apply_options(&command, outcome);
        for_caller
    }

    pub fn cascade(&self) -> &CascadeState {
        &self.cascade
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
