use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::{
    actor::Actor,
    player::{ChoreographyPlayer, PlaybackEvent, PlaybackMode, PlayerState},
    stage::{DancerSpawn, Vec3},
    store::ChoreographyStore,
    timeline::{ManualClock, TimerHost},
    GroogieError, Result,
};

#[derive(Debug)]
struct Member<A> {
    spawn: Vec3,
    player: ChoreographyPlayer<A>,
}

/// Every dancer on stage plus the clock that drives them.
///
/// `tick` is the single pump for both timers and frames: timers due inside a
/// step are delivered first, in due order, then every player renders a frame
/// at the end of the step.
#[derive(Debug)]
pub struct Ensemble<A> {
    members: BTreeMap<String, Member<A>>,
    clock: ManualClock,
}

impl<A: Actor> Ensemble<A> {
    pub fn new() -> Self {
        Self {
            members: BTreeMap::new(),
            clock: ManualClock::new(),
        }
    }

    /// Builds one player per roster entry, each with its own actor.
    pub fn from_roster(
        roster: &[DancerSpawn],
        mut make_actor: impl FnMut(&DancerSpawn) -> A,
    ) -> Self {
        let mut ensemble = Self::new();
        for spawn in roster {
            let actor = make_actor(spawn);
            ensemble.add_dancer(&spawn.id, spawn.position, actor);
        }
        ensemble
    }

    /// Adds a dancer and places its actor at `spawn`.
    pub fn add_dancer(&mut self, id: &str, spawn: Vec3, mut actor: A) {
        actor.set_position(spawn);
        self.members.insert(
            id.to_string(),
            Member {
                spawn,
                player: ChoreographyPlayer::new(id, actor),
            },
        );
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn dancers(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn player(&self, id: &str) -> Option<&ChoreographyPlayer<A>> {
        self.members.get(id).map(|member| &member.player)
    }

    pub fn state(&self, id: &str) -> Option<PlayerState> {
        self.player(id).map(ChoreographyPlayer::state)
    }

    pub fn pending_timers(&self) -> usize {
        self.clock.pending_count()
    }

    /// Previews one dancer. Other solo previews are stopped; ensemble runs
    /// are left alone.
    pub fn play_solo(&mut self, id: &str, store: &ChoreographyStore) -> Result<()> {
        if !self.members.contains_key(id) {
            return Err(GroogieError::UnknownDancer(id.to_string()));
        }

        for (other, member) in self.members.iter_mut() {
            if other != id && member.player.mode() == Some(PlaybackMode::Solo) {
                member.player.stop(&mut self.clock);
            }
        }

        let choreography = store.choreography(id);
        if let Some(member) = self.members.get_mut(id) {
            info!(dancer = id, blocks = choreography.len(), "solo preview");
            member
                .player
                .start(&choreography, member.spawn, PlaybackMode::Solo, &mut self.clock);
        }
        Ok(())
    }

    /// Starts every dancer at once, each from its spawn point.
    pub fn play_all(&mut self, store: &ChoreographyStore) {
        info!(dancers = self.members.len(), "running full choreography");
        for (id, member) in self.members.iter_mut() {
            let choreography = store.choreography(id);
            member
                .player
                .start(&choreography, member.spawn, PlaybackMode::Ensemble, &mut self.clock);
        }
    }

    pub fn stop(&mut self, id: &str) -> Result<()> {
        let member = self
            .members
            .get_mut(id)
            .ok_or_else(|| GroogieError::UnknownDancer(id.to_string()))?;
        member.player.stop(&mut self.clock);
        Ok(())
    }

    pub fn stop_all(&mut self) {
        for member in self.members.values_mut() {
            member.player.stop(&mut self.clock);
        }
    }

    /// `true` once nobody is playing or waiting to play.
    pub fn is_settled(&self) -> bool {
        self.members.values().all(|member| !member.player.is_active())
    }

    /// Advances time by `delta` seconds and returns the events it produced.
    pub fn tick(&mut self, delta: f64) -> Vec<(String, PlaybackEvent)> {
        let until = self.clock.now() + delta.max(0.0);
        self.advance_to(until)
    }

    /// Ticks at `frame_rate` until `seconds` have passed, landing exactly on
    /// the end time.
    pub fn run_for(&mut self, seconds: f64, frame_rate: u32) -> Vec<(String, PlaybackEvent)> {
        let frame = 1.0 / f64::from(frame_rate.max(1));
        let end = self.clock.now() + seconds.max(0.0);
        let mut events = Vec::new();

        while self.clock.now() < end {
            let now = self.clock.now();
            // Far enough out a frame step no longer moves the clock.
            let until = match (now + frame).min(end) {
                step if step > now => step,
                _ => end,
            };
            events.extend(self.advance_to(until));
        }
        events
    }

    fn advance_to(&mut self, until: f64) -> Vec<(String, PlaybackEvent)> {
        let delta = (until - self.clock.now()).max(0.0) as f32;

        while let Some(id) = self.clock.pop_due(until) {
            let owned = self
                .members
                .values_mut()
                .any(|member| member.player.handle_timer(id, &mut self.clock));
            if !owned {
                debug!(%id, "dropped timer with no owner");
            }
        }

        self.clock.set_now(until);
        for member in self.members.values_mut() {
            member.player.advance_frame(delta, &mut self.clock);
        }

        self.drain_events()
    }

    fn drain_events(&mut self) -> Vec<(String, PlaybackEvent)> {
        let mut events = Vec::new();
        for (id, member) in self.members.iter_mut() {
            events.extend(
                member
                    .player
                    .drain_events()
                    .into_iter()
                    .map(|event| (id.clone(), event)),
            );
        }
        events
    }
}

impl<A: Actor> Default for Ensemble<A> {
    fn default() -> Self {
        Self::new()
    }
}
