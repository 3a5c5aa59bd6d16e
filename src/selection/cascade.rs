//! Cascading hierarchical selection state machine.
//!
//! # States (per level)
//! - `Disabled`: parent not yet chosen, no options
//! - `Loading`: fetch in flight for this level's options
//! - `Ready`: options loaded, zero or one selected
//!
//! # State Transitions
//! ```text
//! begin():            level 0 → Loading, all others → Disabled
//! select(L, name):    resolve name→id in level L's options,
//!                     clear every level > L (selection AND options),
//!                     id resolved → level L+1 Loading + FetchCommand
//!                     id empty    → level L+1 stays Disabled
//! apply_options(cmd): cmd.generation stale → discarded (no state change)
//!                     otherwise level → Ready (empty options on fetch error)
//! ```
//!
//! # Design Decisions
//! - The machine is sans-IO: transitions emit `FetchCommand`s and results
//!   come back through `apply_options`, so every interleaving is testable.
//! - A single generation counter is bumped on every transition; any fetch
//!   still in flight from before the bump is stale by definition, which
//!   closes the late-response race on parent changes.
//! - A fetch failure leaves the level `Ready` with an empty option list;
//!   the caller gets the error separately and decides what to surface.

use crate::selection::types::{Level, LocationOption, SelectionError, SelectionResult};

/// Lifecycle of one hierarchy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
    Disabled,
    Loading,
    Ready,
}

/// Instruction to fetch the option list for one level.
///
/// Carries the generation that issued it; `apply_options` discards results
/// whose generation no longer matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCommand {
    pub level_index: usize,
    pub level: Level,
    pub parent_id: Option<String>,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct LevelSlot {
    state: LevelState,
    options: Vec<LocationOption>,
    selected_name: String,
    selected_id: String,
}

impl LevelSlot {
    fn new() -> Self {
        Self {
            state: LevelState::Disabled,
            options: Vec::new(),
            selected_name: String::new(),
            selected_id: String::new(),
        }
    }

    fn reset(&mut self) {
        self.state = LevelState::Disabled;
        self.options.clear();
        self.selected_name.clear();
        self.selected_id.clear();
    }
}

/// Dependent-selection state over a 1–4 level hierarchy.
#[derive(Debug, Clone)]
pub struct CascadeState {
    levels: Vec<Level>,
    slots: Vec<LevelSlot>,
    generation: u64,
}

impl CascadeState {
    /// Create a cascade over the given levels, shallowest first.
    pub fn new(levels: Vec<Level>) -> SelectionResult<Self> {
        if levels.is_empty() {
            return Err(SelectionError::InvalidHierarchy("no levels".into()));
        }
        if levels.len() > 4 {
            return Err(SelectionError::InvalidHierarchy(format!(
                "{} levels, at most 4 supported",
                levels.len()
            )));
        }
        if !levels.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err(SelectionError::InvalidHierarchy(
                "levels must be in shallowest-to-deepest order".into(),
            ));
        }

        let slots = levels.iter().map(|_| LevelSlot::new()).collect();
        Ok(Self {
            levels,
            slots,
            generation: 0,
        })
    }

    /// The full State → District → Mandal → Village hierarchy.
    pub fn full() -> Self {
        // The fixed four-level list always passes validation.
        Self::new(vec![
            Level::State,
            Level::District,
            Level::Mandal,
            Level::Village,
        ])
        .unwrap_or_else(|_| unreachable!())
    }

    /// Start (or restart) the cascade: everything cleared, level 0 loading.
    pub fn begin(&mut self) -> FetchCommand {
        self.generation += 1;
        for slot in &mut self.slots {
            slot.reset();
        }
        self.slots[0].state = LevelState::Loading;

        FetchCommand {
            level_index: 0,
            level: self.levels[0],
            parent_id: None,
            generation: self.generation,
        }
    }

    /// Select a value (by display name) at the given level.
    ///
    /// Every deeper level loses its selection and its loaded options. When
    /// the name resolves to an id, the next level starts loading and the
    /// returned command tells the caller what to fetch. An empty name clears
    /// the level; a name missing from the loaded options keeps the name but
    /// resolves to an empty id, so nothing below it activates.
    pub fn select(
        &mut self,
        level_index: usize,
        name: &str,
    ) -> SelectionResult<Option<FetchCommand>> {
        let slot = self
            .slots
            .get(level_index)
            .ok_or(SelectionError::UnknownLevel(level_index))?;
        if slot.state != LevelState::Ready {
            return Err(SelectionError::LevelNotReady {
                level: self.levels[level_index],
            });
        }

        let resolved_id = slot
            .options
            .iter()
            .find(|option| option.name == name)
            .map(|option| option.id.clone())
            .unwrap_or_default();

        self.generation += 1;

        let slot = &mut self.slots[level_index];
        slot.selected_name = name.to_string();
        slot.selected_id = resolved_id.clone();

        for deeper in &mut self.slots[level_index + 1..] {
            deeper.reset();
        }

        if resolved_id.is_empty() || level_index + 1 >= self.levels.len() {
            return Ok(None);
        }

        self.slots[level_index + 1].state = LevelState::Loading;
        Ok(Some(FetchCommand {
            level_index: level_index + 1,
            level: self.levels[level_index + 1],
            parent_id: Some(resolved_id),
            generation: self.generation,
        }))
    }

    /// Apply a fetch result to the level that requested it.
    ///
    /// Returns `false` when the command's generation is stale (a parent
    /// changed after the fetch went out) and the result was discarded.
    pub fn apply_options(
        &mut self,
        command: &FetchCommand,
        outcome: SelectionResult<Vec<LocationOption>>,
    ) -> bool {
        if command.generation != self.generation {
            tracing::debug!(
                level = %command.level,
                stale_generation = command.generation,
                current_generation = self.generation,
                "Discarding stale option fetch"
            );
            return false;
        }

        let Some(slot) = self.slots.get_mut(command.level_index) else {
            return false;
        };

        match outcome {
            Ok(options) => {
                slot.options = options;
            }
            Err(e) => {
                tracing::warn!(level = %command.level, error = %e, "Option fetch failed");
                slot.options.clear();
            }
        }
        slot.state = LevelState::Ready;
        true
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn level_state(&self, level_index: usize) -> LevelState {
        self.slots
            .get(level_index)
            .map(|slot| slot.state)
            .unwrap_or(LevelState::Disabled)
    }

    pub fn options(&self, level_index: usize) -> &[LocationOption] {
        self.slots
            .get(level_index)
            .map(|slot| slot.options.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected_name(&self, level_index: usize) -> &str {
        self.slots
            .get(level_index)
            .map(|slot| slot.selected_name.as_str())
            .unwrap_or("")
    }

    pub fn selected_id(&self, level_index: usize) -> &str {
        self.slots
            .get(level_index)
            .map(|slot| slot.selected_id.as_str())
            .unwrap_or("")
    }

    /// True when every level has a resolved id.
    pub fn is_fully_resolved(&self) -> bool {
        self.slots.iter().all(|slot| !slot.selected_id.is_empty())
    }
}
