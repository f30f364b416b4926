use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    choreography::{ActionBlock, Choreography},
    config::EditorConfig,
    stage::StagePoint,
    GroogieError, Result,
};

/// Choreographies for every dancer, keyed by dancer id.
///
/// Persisted as a JSON object mapping each id to its block array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoreographyStore {
    choreographies: BTreeMap<String, Choreography>,
}

impl ChoreographyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with an empty choreography for each id.
    pub fn with_dancers<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            choreographies: ids
                .into_iter()
                .map(|id| (id.to_string(), Choreography::new()))
                .collect(),
        }
    }

    pub fn dancers(&self) -> impl Iterator<Item = &str> {
        self.choreographies.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Choreography)> {
        self.choreographies
            .iter()
            .map(|(id, choreo)| (id.as_str(), choreo))
    }

    pub fn get(&self, dancer: &str) -> Option<&Choreography> {
        self.choreographies.get(dancer)
    }

    /// Choreography for `dancer`, or an empty one if none was ever edited.
    pub fn choreography(&self, dancer: &str) -> Choreography {
        self.get(dancer).cloned().unwrap_or_default()
    }

    pub fn choreography_mut(&mut self, dancer: &str) -> Result<&mut Choreography> {
        self.choreographies
            .get_mut(dancer)
            .ok_or_else(|| GroogieError::UnknownDancer(dancer.to_string()))
    }

    /// Appends a dance step. `duration` defaults to the editor's step length.
    pub fn append_dance_step(
        &mut self,
        dancer: &str,
        step: impl Into<String>,
        duration: Option<f32>,
        editor: &EditorConfig,
    ) -> usize {
        let block = ActionBlock::dance_step(step, duration.unwrap_or(editor.dance_step_seconds));
        self.append(dancer, block)
    }

    /// Appends a move. `duration` defaults to the editor's move length.
    pub fn append_move_to(
        &mut self,
        dancer: &str,
        target: StagePoint,
        duration: Option<f32>,
        editor: &EditorConfig,
    ) -> usize {
        let block = ActionBlock::move_to(target, duration.unwrap_or(editor.move_seconds));
        self.append(dancer, block)
    }

    pub fn delete_block(&mut self, dancer: &str, index: usize) -> Result<ActionBlock> {
        self.choreography_mut(dancer)?.remove(index)
    }

    pub fn update_duration(&mut self, dancer: &str, index: usize, seconds: f32) -> Result<()> {
        self.choreography_mut(dancer)?.set_duration(index, seconds)
    }

    /// Replaces the whole sequence for `dancer`, creating the entry if needed.
    pub fn replace(&mut self, dancer: &str, choreography: Choreography) {
        self.choreographies.insert(dancer.to_string(), choreography);
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), dancers = self.choreographies.len(), "store saved");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Returns the index of the appended block.
    fn append(&mut self, dancer: &str, block: ActionBlock) -> usize {
        let choreo = self.choreographies.entry(dancer.to_string()).or_default();
        choreo.push(block);
        choreo.len() - 1
    }
}
