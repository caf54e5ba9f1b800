//! Persisted snapshot and the storage port
//!
//! The engine never talks to storage directly. An adapter implementing
//! [`SnapshotStore`] loads one [`PersistedSnapshot`] at start-up and
//! receives a fresh one after each mutation. Only owned state is
//! persisted; trends, progress and insights are always recomputed.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};
use crate::models::{DietGoals, Preferences, Profile, WeightEntry};
use crate::state::ProfileState;

/// Current snapshot schema version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Key the snapshot is stored under
pub const SNAPSHOT_KEY: &str = "bw-diet-user-storage";

/// The persisted part of [`ProfileState`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotState {
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub goals: Option<DietGoals>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub weight_history: Vec<WeightEntry>,
    #[serde(default)]
    pub is_onboarded: bool,
}

/// Versioned snapshot record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    pub state: SnapshotState,
    /// Records written by the first browser release carry version 0
    #[serde(default)]
    pub version: u32,
}

impl PersistedSnapshot {
    /// Capture the persistable part of a state
    pub fn capture(state: &ProfileState) -> Self {
        Self {
            state: SnapshotState {
                profile: state.profile().cloned(),
                goals: state.goals().cloned(),
                preferences: state.preferences().clone(),
                weight_history: state.ledger().to_vec(),
                is_onboarded: state.is_onboarded(),
            },
            version: SNAPSHOT_VERSION,
        }
    }

    /// Rebuild a state, rejecting schemas newer than this build knows
    pub fn restore(self) -> CoreResult<ProfileState> {
        if self.version > SNAPSHOT_VERSION {
            return Err(CoreError::UnsupportedSchema(self.version));
        }
        let SnapshotState {
            profile,
            goals,
            preferences,
            weight_history,
            is_onboarded,
        } = self.state;
        Ok(ProfileState::from_parts(
            profile,
            goals,
            preferences,
            weight_history,
            is_onboarded,
        ))
    }

    pub fn to_json(&self, pretty: bool) -> CoreResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Load/save port for the persisted snapshot
pub trait SnapshotStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the stored snapshot; `Ok(None)` on first run
    fn load(&self) -> Result<Option<PersistedSnapshot>, Self::Error>;

    /// Replace the stored snapshot
    fn save(&self, snapshot: &PersistedSnapshot) -> Result<(), Self::Error>;
}

/// Load a state from a store, falling back to a fresh state on first run
pub fn load_state<S: SnapshotStore>(store: &S) -> Result<ProfileState, LoadError<S::Error>> {
    match store.load().map_err(LoadError::Store)? {
        Some(snapshot) => snapshot.restore().map_err(LoadError::Snapshot),
        None => Ok(ProfileState::new()),
    }
}

/// Failure while loading a state from a store
#[derive(Debug, thiserror::Error)]
pub enum LoadError<E: std::error::Error + 'static> {
    #[error("Snapshot store error: {0}")]
    Store(#[source] E),

    #[error(transparent)]
    Snapshot(CoreError),
}

/// In-memory store holding the serialized record
///
/// Goes through JSON so tests exercise the same encoding a real store uses.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slot: Mutex<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw JSON record, as a browser export would provide
    pub fn with_json(json: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(json.into())),
        }
    }

    /// Raw stored JSON, if any
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl SnapshotStore for MemorySnapshotStore {
    type Error = CoreError;

    fn load(&self) -> Result<Option<PersistedSnapshot>, Self::Error> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| CoreError::Snapshot("memory store poisoned".to_string()))?;
        slot.as_deref().map(PersistedSnapshot::from_json).transpose()
    }

    fn save(&self, snapshot: &PersistedSnapshot) -> Result<(), Self::Error> {
        let json = snapshot.to_json(false)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| CoreError::Snapshot("memory store poisoned".to_string()))?;
        *slot = Some(json);
        Ok(())
    }
}
