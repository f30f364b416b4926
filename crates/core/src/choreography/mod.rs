use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{stage::StagePoint, GroogieError, Result};

/// Duration given to dance steps added through the default entry path.
pub const DEFAULT_DANCE_STEP_SECONDS: f32 = 3.0;
/// Duration given to moves added through the default entry path.
pub const DEFAULT_MOVE_SECONDS: f32 = 2.0;
/// Substituted when a dance step or move carries no usable duration.
pub const FALLBACK_BLOCK_SECONDS: f32 = 1.0;
/// Hold time for blocks whose type is not understood.
pub const UNSUPPORTED_BLOCK_SECONDS: f32 = 0.3;

/// Clip names shipped with the dance animation pack.
pub const DANCE_CATALOG: &[&str] = &[
    "salsa1",
    "salsa2",
    "salsa3",
    "salsa4",
    "hiphop1",
    "hiphop2",
    "hiphop3",
    "hiphop4",
    "breakdance1",
    "breakdance2",
    "breakdance3",
    "mystery",
];

/// One timed unit of choreography.
///
/// Reading is lenient per block: a block that is not an object or has no
/// recognised `type` becomes [`ActionBlock::Unsupported`], and a missing,
/// `null` or non-numeric `duration` is read as zero so the playback fallback
/// applies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ActionBlock {
    /// Loop the named clip for `duration` seconds.
    DanceStep { step: String, duration: f32 },
    /// Walk to `position` over `duration` seconds. Without a position the
    /// dancer walks back to where the session started.
    MoveTo {
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<StagePoint>,
        duration: f32,
    },
    /// Anything else found in persisted data.
    Unsupported,
}

impl<'de> Deserialize<'de> for ActionBlock {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}

/// Discriminant of [`ActionBlock`], handy for events and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    DanceStep,
    MoveTo,
    Unsupported,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BlockKind::DanceStep => "danceStep",
            BlockKind::MoveTo => "moveTo",
            BlockKind::Unsupported => "unsupported",
        };
        f.write_str(label)
    }
}

impl ActionBlock {
    pub fn dance_step(step: impl Into<String>, duration: f32) -> Self {
        Self::DanceStep {
            step: step.into(),
            duration,
        }
    }

    pub fn move_to(position: StagePoint, duration: f32) -> Self {
        Self::MoveTo {
            position: Some(position),
            duration,
        }
    }

    fn from_value(value: Value) -> Self {
        let duration = value
            .get("duration")
            .and_then(Value::as_f64)
            .map_or(0.0, |seconds| seconds as f32);

        match value.get("type").and_then(Value::as_str) {
            Some("danceStep") => Self::DanceStep {
                step: value
                    .get("step")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                duration,
            },
            Some("moveTo") => Self::MoveTo {
                position: value
                    .get("position")
                    .cloned()
                    .and_then(|position| serde_json::from_value(position).ok()),
                duration,
            },
            _ => Self::Unsupported,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            ActionBlock::DanceStep { .. } => BlockKind::DanceStep,
            ActionBlock::MoveTo { .. } => BlockKind::MoveTo,
            ActionBlock::Unsupported => BlockKind::Unsupported,
        }
    }

    /// Duration as stored, which may be zero or garbage after hand edits.
    pub fn raw_duration(&self) -> Option<f32> {
        match self {
            ActionBlock::DanceStep { duration, .. } | ActionBlock::MoveTo { duration, .. } => {
                Some(*duration)
            }
            ActionBlock::Unsupported => None,
        }
    }

    /// Scheduled length of the block; always positive.
    pub fn duration_seconds(&self) -> f32 {
        match self.raw_duration() {
            Some(duration) if duration.is_finite() && duration > 0.0 => duration,
            Some(_) => FALLBACK_BLOCK_SECONDS,
            None => UNSUPPORTED_BLOCK_SECONDS,
        }
    }
}

/// Ordered blocks for one dancer, in playback order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Choreography {
    blocks: Vec<ActionBlock>,
}

impl Choreography {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[ActionBlock] {
        &self.blocks
    }

    pub fn get(&self, index: usize) -> Option<&ActionBlock> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionBlock> {
        self.blocks.iter()
    }

    pub fn push(&mut self, block: ActionBlock) {
        self.blocks.push(block);
    }

    pub fn remove(&mut self, index: usize) -> Result<ActionBlock> {
        self.check_index(index)?;
        Ok(self.blocks.remove(index))
    }

    /// Rewrites the duration of the block at `index`. The value is stored as
    /// given; playback substitutes a fallback for non-positive values.
    pub fn set_duration(&mut self, index: usize, seconds: f32) -> Result<()> {
        self.check_index(index)?;
        match &mut self.blocks[index] {
            ActionBlock::DanceStep { duration, .. } | ActionBlock::MoveTo { duration, .. } => {
                *duration = seconds;
                Ok(())
            }
            ActionBlock::Unsupported => Err(GroogieError::InvalidBlock {
                index,
                reason: "unsupported blocks have no editable duration".to_string(),
            }),
        }
    }

    pub fn replace(&mut self, blocks: Vec<ActionBlock>) {
        self.blocks = blocks;
    }

    /// Sum of the scheduled durations, accumulated in playback order.
    pub fn total_duration(&self) -> f64 {
        self.blocks
            .iter()
            .fold(0.0, |acc, block| acc + f64::from(block.duration_seconds()))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.blocks.len() {
            Ok(())
        } else {
            Err(GroogieError::BlockIndexOutOfRange {
                index,
                len: self.blocks.len(),
            })
        }
    }
}

impl From<Vec<ActionBlock>> for Choreography {
    fn from(blocks: Vec<ActionBlock>) -> Self {
        Self { blocks }
    }
}

impl FromIterator<ActionBlock> for Choreography {
    fn from_iter<I: IntoIterator<Item = ActionBlock>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}
