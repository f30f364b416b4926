//! Core library for the groogie choreography editor.
//!
//! Dancers on a stage each own a sequence of timed action blocks (dance steps
//! and moves). The crate covers editing and persisting those sequences and
//! playing them back deterministically: one [`ChoreographyPlayer`] per dancer,
//! advanced by explicit frames and cancelable timers, with the rendering side
//! abstracted behind the [`Actor`] trait.

pub mod actor;
pub mod choreography;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod player;
pub mod stage;
pub mod store;
pub mod timeline;

pub use actor::{Actor, AnimationHandle, HeadlessActor};
pub use choreography::{ActionBlock, BlockKind, Choreography, DANCE_CATALOG};
pub use config::{AppConfig, EditorConfig, PreviewConfig, StageConfig};
pub use ensemble::Ensemble;
pub use error::{GroogieError, Result};
pub use player::{ChoreographyPlayer, PlaybackEvent, PlaybackMode, PlayerState};
pub use stage::{DancerSpawn, StageBounds, StagePoint, Vec3};
pub use store::ChoreographyStore;
pub use timeline::{ManualClock, TimerHost, TimerId};
