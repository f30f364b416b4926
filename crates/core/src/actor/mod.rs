use std::collections::BTreeSet;

use crate::{choreography::DANCE_CATALOG, stage::Vec3, GroogieError, Result};

/// Handle to a running animation, owned by whoever started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle(u64);

impl AnimationHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// The visual entity a playback session drives: a rigged mesh that can loop
/// clips and be placed on the stage.
pub trait Actor {
    /// `false` while the mesh or its animation rig is still loading.
    fn is_ready(&self) -> bool {
        true
    }

    /// Starts `clip` in a continuous loop.
    fn play_looped(&mut self, clip: &str) -> Result<AnimationHandle>;

    /// Stops a clip started by [`Actor::play_looped`].
    fn stop_animation(&mut self, handle: AnimationHandle);

    /// Advances the animation mixer.
    fn advance_animation(&mut self, delta_seconds: f32) -> Result<()>;

    fn position(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);
}

/// A clip currently looping on a [`HeadlessActor`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveClip {
    pub handle: AnimationHandle,
    pub clip: String,
    pub elapsed: f32,
}

/// In-memory actor used by the preview command and tests. It keeps the same
/// bookkeeping a scene-graph actor would (clip catalog, active clips, position)
/// without rendering anything.
#[derive(Debug, Clone)]
pub struct HeadlessActor {
    catalog: BTreeSet<String>,
    failing: BTreeSet<String>,
    mixer_broken: bool,
    ready: bool,
    position: Vec3,
    next_handle: u64,
    active: Vec<ActiveClip>,
    played: Vec<String>,
}

impl HeadlessActor {
    pub fn new<I, S>(catalog: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            catalog: catalog.into_iter().map(Into::into).collect(),
            failing: BTreeSet::new(),
            mixer_broken: false,
            ready: true,
            position: Vec3::default(),
            next_handle: 0,
            active: Vec::new(),
            played: Vec::new(),
        }
    }

    /// Actor loaded with the stock dance catalog.
    pub fn with_dance_catalog() -> Self {
        Self::new(DANCE_CATALOG.iter().copied())
    }

    /// Makes every attempt to play `clip` fail, as a broken rig would.
    pub fn fail_on(mut self, clip: impl Into<String>) -> Self {
        self.failing.insert(clip.into());
        self
    }

    /// Makes every mixer update fail. Clips still start but never advance.
    pub fn break_mixer(mut self) -> Self {
        self.mixer_broken = true;
        self
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn active_clips(&self) -> &[ActiveClip] {
        &self.active
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.active.last().map(|active| active.clip.as_str())
    }

    /// Every clip successfully started, in order.
    pub fn played(&self) -> &[String] {
        &self.played
    }
}

impl Default for HeadlessActor {
    fn default() -> Self {
        Self::with_dance_catalog()
    }
}

impl Actor for HeadlessActor {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn play_looped(&mut self, clip: &str) -> Result<AnimationHandle> {
        if !self.ready {
            return Err(GroogieError::ActorUnavailable);
        }
        if !self.catalog.contains(clip) {
            return Err(GroogieError::AnimationNotFound {
                clip: clip.to_string(),
            });
        }
        if self.failing.contains(clip) {
            return Err(GroogieError::msg(format!("rig rejected clip `{clip}`")));
        }

        let handle = AnimationHandle::new(self.next_handle);
        self.next_handle += 1;
        self.active.push(ActiveClip {
            handle,
            clip: clip.to_string(),
            elapsed: 0.0,
        });
        self.played.push(clip.to_string());
        Ok(handle)
    }

    fn stop_animation(&mut self, handle: AnimationHandle) {
        self.active.retain(|active| active.handle != handle);
    }

    fn advance_animation(&mut self, delta_seconds: f32) -> Result<()> {
        if self.mixer_broken {
            return Err(GroogieError::msg("animation mixer is unavailable"));
        }
        for active in &mut self.active {
            active.elapsed += delta_seconds.max(0.0);
        }
        Ok(())
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plays_and_stops_catalog_clips() {
        let mut actor = HeadlessActor::with_dance_catalog();
        let handle = actor.play_looped("salsa1").unwrap();
        assert_eq!(actor.current_clip(), Some("salsa1"));

        actor.advance_animation(0.25).unwrap();
        assert_eq!(actor.active_clips()[0].elapsed, 0.25);

        actor.stop_animation(handle);
        assert!(actor.active_clips().is_empty());
        assert_eq!(actor.played(), ["salsa1".to_string()]);
    }

    #[test]
    fn reports_missing_clips() {
        let mut actor = HeadlessActor::new(["salsa1"]);
        let err = actor.play_looped("moonwalk").unwrap_err();
        assert!(matches!(err, GroogieError::AnimationNotFound { ref clip } if clip == "moonwalk"));
    }

    #[test]
    fn unready_actor_refuses_to_play() {
        let mut actor = HeadlessActor::default();
        actor.set_ready(false);
        assert!(matches!(
            actor.play_looped("salsa1"),
            Err(GroogieError::ActorUnavailable)
        ));
    }

    #[test]
    fn failing_clips_surface_as_errors() {
        let mut actor = HeadlessActor::default().fail_on("hiphop1");
        assert!(actor.play_looped("hiphop1").is_err());
        assert!(actor.active_clips().is_empty());
    }

    #[test]
    fn broken_mixer_rejects_updates() {
        let mut actor = HeadlessActor::default().break_mixer();
        actor.play_looped("salsa2").unwrap();
        assert!(actor.advance_animation(0.5).is_err());
        assert_eq!(actor.active_clips()[0].elapsed, 0.0);
    }
}
