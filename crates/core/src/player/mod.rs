//! Per-dancer choreography playback.
//!
//! A [`ChoreographyPlayer`] walks an ordered list of [`ActionBlock`]s. Each
//! block schedules one advance timer on the [`TimerHost`]; only that timer
//! moves playback to the next block. Frames ([`ChoreographyPlayer::advance_frame`])
//! drive the animation mixer and the eased movement between blocks, sampling
//! the same host clock so moves land when their timer fires.
//!
//! Actor failures never stop a session. A clip that cannot be played leaves
//! the dancer standing still for the block's duration.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    actor::{Actor, AnimationHandle},
    choreography::{ActionBlock, BlockKind, Choreography},
    stage::{StagePoint, Vec3},
    timeline::{TimerHost, TimerId},
    GroogieError,
};

/// Where a player is in its choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    /// Looping a clip, or holding pose for a block that has no clip.
    PlayingDanceStep,
    PlayingMoveTo,
    Finished,
}

/// Why a session was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// The selected dancer previewed on its own.
    Solo,
    /// Part of a run of the whole troupe.
    Ensemble,
}

/// Observable milestones of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    Started { mode: PlaybackMode },
    BlockStarted { index: usize, kind: BlockKind },
    Finished,
    Stopped,
}

/// Quadratic ease-in-out over `[0, 1]`.
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[derive(Debug, Clone)]
struct MoveInterpolation {
    from: Vec3,
    to: Vec3,
    started_at: f64,
    duration: f64,
}

impl MoveInterpolation {
    fn position_at(&self, now: f64) -> Vec3 {
        let elapsed = now - self.started_at;
        let progress = if self.duration > 0.0 {
            elapsed / self.duration
        } else {
            1.0
        };
        self.from.lerp(self.to, ease_in_out_quad(progress))
    }
}

#[derive(Debug)]
struct PlaybackSession {
    choreography: Choreography,
    mode: PlaybackMode,
    origin: Vec3,
    block_index: usize,
    animation: Option<AnimationHandle>,
    movement: Option<MoveInterpolation>,
    pending_timer: Option<TimerId>,
}

#[derive(Debug)]
struct DeferredStart {
    choreography: Choreography,
    initial_position: Vec3,
    mode: PlaybackMode,
}

/// Drives one actor through a choreography.
#[derive(Debug)]
pub struct ChoreographyPlayer<A> {
    dancer: String,
    actor: A,
    state: PlayerState,
    session: Option<PlaybackSession>,
    deferred: Option<DeferredStart>,
    events: Vec<PlaybackEvent>,
}

impl<A: Actor> ChoreographyPlayer<A> {
    pub fn new(dancer: impl Into<String>, actor: A) -> Self {
        Self {
            dancer: dancer.into(),
            actor,
            state: PlayerState::Idle,
            session: None,
            deferred: None,
            events: Vec::new(),
        }
    }

    pub fn dancer(&self) -> &str {
        &self.dancer
    }

    pub fn actor(&self) -> &A {
        &self.actor
    }

    pub fn actor_mut(&mut self) -> &mut A {
        &mut self.actor
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn mode(&self) -> Option<PlaybackMode> {
        self.session
            .as_ref()
            .map(|session| session.mode)
            .or(self.deferred.as_ref().map(|deferred| deferred.mode))
    }

    /// Index of the block being played, if a session is live.
    pub fn block_index(&self) -> Option<usize> {
        self.session.as_ref().map(|session| session.block_index)
    }

    /// `true` while a session is live or waiting for the actor.
    pub fn is_active(&self) -> bool {
        self.session.is_some() || self.deferred.is_some()
    }

    pub fn is_awaiting_actor(&self) -> bool {
        self.deferred.is_some()
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        self.session.as_ref().and_then(|session| session.pending_timer)
    }

    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begins playing `choreography` from its first block with the actor at
    /// `initial_position`. Any running session is stopped first.
    pub fn start(
        &mut self,
        choreography: &Choreography,
        initial_position: Vec3,
        mode: PlaybackMode,
        timers: &mut dyn TimerHost,
    ) {
        self.stop(timers);

        if !self.actor.is_ready() {
            warn!(
                dancer = %self.dancer,
                error = %GroogieError::ActorUnavailable,
                "deferring playback until the actor is ready"
            );
            self.deferred = Some(DeferredStart {
                choreography: choreography.clone(),
                initial_position,
                mode,
            });
            return;
        }

        self.begin_session(choreography.clone(), initial_position, mode, timers);
    }

    /// Cancels the pending timer, stops the active clip and discards the
    /// session. The actor stays where it is.
    pub fn stop(&mut self, timers: &mut dyn TimerHost) {
        let had_deferred = self.deferred.take().is_some();
        let session = self.session.take();
        let was_active = had_deferred || session.is_some();

        if let Some(mut session) = session {
            if let Some(id) = session.pending_timer.take() {
                timers.cancel(id);
            }
            if let Some(handle) = session.animation.take() {
                self.actor.stop_animation(handle);
            }
        }

        self.state = PlayerState::Idle;
        if was_active {
            debug!(dancer = %self.dancer, "playback stopped");
            self.events.push(PlaybackEvent::Stopped);
        }
    }

    /// Per-frame update: advances the mixer during dance steps and eases the
    /// actor along an active move. Never changes the current block.
    pub fn advance_frame(&mut self, delta_seconds: f32, timers: &mut dyn TimerHost) {
        if self.deferred.is_some() && self.actor.is_ready() {
            if let Some(deferred) = self.deferred.take() {
                info!(dancer = %self.dancer, "actor ready, starting deferred playback");
                self.begin_session(
                    deferred.choreography,
                    deferred.initial_position,
                    deferred.mode,
                    timers,
                );
            }
        }

        let Some(session) = self.session.as_ref() else {
            return;
        };

        match self.state {
            PlayerState::PlayingMoveTo => {
                if let Some(movement) = &session.movement {
                    let position = movement.position_at(timers.now());
                    self.actor.set_position(position);
                }
            }
            PlayerState::PlayingDanceStep if session.animation.is_some() => {
                if let Err(error) = self.actor.advance_animation(delta_seconds) {
                    warn!(dancer = %self.dancer, %error, "animation mixer update failed");
                }
            }
            _ => {}
        }
    }

    /// Delivers a fired timer. Returns `true` if it belonged to this player.
    pub fn handle_timer(&mut self, id: TimerId, timers: &mut dyn TimerHost) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.pending_timer != Some(id) {
            return false;
        }
        session.pending_timer = None;

        if let Some(movement) = session.movement.take() {
            self.actor.set_position(movement.to);
        }
        session.block_index += 1;

        if session.block_index >= session.choreography.len() {
            self.finish();
        } else {
            self.begin_block(timers);
        }
        true
    }

    fn begin_session(
        &mut self,
        choreography: Choreography,
        initial_position: Vec3,
        mode: PlaybackMode,
        timers: &mut dyn TimerHost,
    ) {
        self.actor.set_position(initial_position);
        self.events.push(PlaybackEvent::Started { mode });
        info!(
            dancer = %self.dancer,
            ?mode,
            blocks = choreography.len(),
            seconds = choreography.total_duration(),
            "playback started"
        );

        if choreography.is_empty() {
            self.state = PlayerState::Finished;
            self.events.push(PlaybackEvent::Finished);
            debug!(dancer = %self.dancer, "empty choreography, nothing to play");
            return;
        }

        self.session = Some(PlaybackSession {
            choreography,
            mode,
            origin: initial_position,
            block_index: 0,
            animation: None,
            movement: None,
            pending_timer: None,
        });
        self.begin_block(timers);
    }

    fn begin_block(&mut self, timers: &mut dyn TimerHost) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if let Some(handle) = session.animation.take() {
            self.actor.stop_animation(handle);
        }
        if let Some(id) = session.pending_timer.take() {
            timers.cancel(id);
        }
        session.movement = None;

        let index = session.block_index;
        let Some(block) = session.choreography.get(index) else {
            return;
        };
        let seconds = f64::from(block.duration_seconds());
        debug!(dancer = %self.dancer, index, kind = %block.kind(), seconds, "block started");

        match block {
            ActionBlock::DanceStep { step, .. } => {
                match self.actor.play_looped(step) {
                    Ok(handle) => session.animation = Some(handle),
                    Err(error @ GroogieError::AnimationNotFound { .. }) => {
                        warn!(dancer = %self.dancer, index, %error, "dancing without animation");
                    }
                    Err(error) => {
                        warn!(dancer = %self.dancer, index, clip = %step, %error, "clip failed to start");
                    }
                }
                self.state = PlayerState::PlayingDanceStep;
            }
            ActionBlock::MoveTo { position, .. } => {
                session.movement = Some(MoveInterpolation {
                    from: self.actor.position(),
                    to: position.map_or(session.origin, StagePoint::to_world),
                    started_at: timers.now(),
                    duration: seconds,
                });
                self.state = PlayerState::PlayingMoveTo;
            }
            ActionBlock::Unsupported => {
                let error = GroogieError::InvalidBlock {
                    index,
                    reason: "unrecognised block type".to_string(),
                };
                warn!(dancer = %self.dancer, %error, seconds, "skipping block");
                self.state = PlayerState::PlayingDanceStep;
            }
        }

        let kind = block.kind();
        session.pending_timer = Some(timers.schedule(seconds));
        self.events.push(PlaybackEvent::BlockStarted { index, kind });
    }

    fn finish(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Some(handle) = session.animation.take() {
                self.actor.stop_animation(handle);
            }
        }
        self.state = PlayerState::Finished;
        self.events.push(PlaybackEvent::Finished);
        info!(dancer = %self.dancer, "playback finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{actor::HeadlessActor, timeline::ManualClock};

    fn player() -> ChoreographyPlayer<HeadlessActor> {
        ChoreographyPlayer::new("dancer1", HeadlessActor::with_dance_catalog())
    }

    /// Fires everything due up to `until`, then renders one frame there.
    fn run_to(player: &mut ChoreographyPlayer<HeadlessActor>, clock: &mut ManualClock, until: f64) {
        let delta = (until - clock.now()) as f32;
        while let Some(id) = clock.pop_due(until) {
            player.handle_timer(id, clock);
        }
        clock.set_now(until);
        player.advance_frame(delta, clock);
    }

    fn count_finished(events: &[PlaybackEvent]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, PlaybackEvent::Finished))
            .count()
    }

    fn salsa_then_move() -> Choreography {
        vec![
            ActionBlock::dance_step("salsa1", 2.0),
            ActionBlock::move_to(StagePoint::new(5.0, 3.0), 1.5),
        ]
        .into()
    }

    #[test]
    fn ease_curve_is_symmetric() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(0.5), 0.5);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert_eq!(ease_in_out_quad(-2.0), 0.0);
        assert_eq!(ease_in_out_quad(3.0), 1.0);
        assert!((ease_in_out_quad(0.25) - 0.125).abs() < 1e-12);
        assert!((ease_in_out_quad(0.75) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn plays_dance_step_then_move_on_schedule() {
        let mut clock = ManualClock::new();
        let mut player = player();
        player.start(&salsa_then_move(), Vec3::default(), PlaybackMode::Solo, &mut clock);

        assert_eq!(player.state(), PlayerState::PlayingDanceStep);
        assert_eq!(player.actor().current_clip(), Some("salsa1"));

        run_to(&mut player, &mut clock, 1.0);
        assert_eq!(player.state(), PlayerState::PlayingDanceStep);
        assert_eq!(player.actor().active_clips()[0].elapsed, 1.0);

        run_to(&mut player, &mut clock, 2.0);
        assert_eq!(player.state(), PlayerState::PlayingMoveTo);
        assert!(player.actor().active_clips().is_empty());
        assert_eq!(player.actor().position(), Vec3::default());

        run_to(&mut player, &mut clock, 2.75);
        let mid = player.actor().position();
        assert!((mid.x - 2.5).abs() < 1e-4);
        assert!((mid.z - 1.5).abs() < 1e-4);

        run_to(&mut player, &mut clock, 3.5);
        assert_eq!(player.state(), PlayerState::Finished);
        assert_eq!(player.actor().position(), Vec3::new(5.0, 0.0, 3.0));
        assert!(!player.is_active());
        assert_eq!(clock.pending_count(), 0);
    }

    #[test]
    fn fast_forward_finishes_exactly_once() {
        let choreo: Choreography = vec![
            ActionBlock::dance_step("hiphop1", 1.25),
            ActionBlock::move_to(StagePoint::new(-3.0, 2.0), 0.75),
            ActionBlock::dance_step("breakdance2", 2.0),
            ActionBlock::move_to(StagePoint::new(1.0, 1.0), 1.0),
        ]
        .into();

        let mut clock = ManualClock::new();
        let mut player = player();
        player.start(&choreo, Vec3::default(), PlaybackMode::Ensemble, &mut clock);

        run_to(&mut player, &mut clock, choreo.total_duration());
        assert_eq!(player.state(), PlayerState::Finished);

        run_to(&mut player, &mut clock, choreo.total_duration() + 10.0);
        assert_eq!(count_finished(&player.drain_events()), 1);
    }

    #[test]
    fn move_starts_at_origin_and_ends_at_target() {
        let choreo: Choreography = vec![ActionBlock::move_to(StagePoint::new(7.3, -4.1), 2.0)].into();
        let start = Vec3::new(-1.7, 0.0, 0.9);

        let mut clock = ManualClock::new();
        let mut player = player();
        player.start(&choreo, start, PlaybackMode::Solo, &mut clock);

        run_to(&mut player, &mut clock, 0.0);
        assert_eq!(player.actor().position(), start);

        run_to(&mut player, &mut clock, 2.0);
        assert_eq!(player.actor().position(), Vec3::new(7.3, 0.0, -4.1));
    }

    #[test]
    fn timer_snaps_move_to_target_without_a_frame() {
        let choreo: Choreography = vec![
            ActionBlock::move_to(StagePoint::new(4.0, 4.0), 1.0),
            ActionBlock::dance_step("salsa2", 1.0),
        ]
        .into();

        let mut clock = ManualClock::new();
        let mut player = player();
        player.start(&choreo, Vec3::default(), PlaybackMode::Solo, &mut clock);

        let id = clock.pop_due(1.0).unwrap();
        assert!(player.handle_timer(id, &mut clock));
        assert_eq!(player.actor().position(), Vec3::new(4.0, 0.0, 4.0));
        assert_eq!(player.state(), PlayerState::PlayingDanceStep);
    }

    #[test]
    fn empty_choreography_finishes_without_timers() {
        let mut clock = ManualClock::new();
        let mut player = player();
        player.start(&Choreography::new(), Vec3::new(1.0, 0.0, 1.0), PlaybackMode::Solo, &mut clock);

        assert_eq!(player.state(), PlayerState::Finished);
        assert_eq!(clock.pending_count(), 0);
        assert_eq!(player.actor().position(), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(
            player.drain_events(),
            vec![
                PlaybackEvent::Started {
                    mode: PlaybackMode::Solo
                },
                PlaybackEvent::Finished
            ]
        );
    }

    #[test]
    fn restart_never_leaves_duplicate_timers_or_clips() {
        let choreo = salsa_then_move();
        let mut clock = ManualClock::new();
        let mut player = player();

        for _ in 0..3 {
            player.start(&choreo, Vec3::default(), PlaybackMode::Solo, &mut clock);
            assert!(player.pending_timer().is_some());
            assert_eq!(clock.pending_count(), 1);
            assert_eq!(player.actor().active_clips().len(), 1);
        }

        player.stop(&mut clock);
        player.start(&choreo, Vec3::default(), PlaybackMode::Solo, &mut clock);
        assert_eq!(clock.pending_count(), 1);
        assert_eq!(player.actor().active_clips().len(), 1);
    }

    #[test]
    fn consecutive_dance_steps_release_previous_clip() {
        let choreo: Choreography = vec![
            ActionBlock::dance_step("salsa1", 1.0),
            ActionBlock::dance_step("salsa2", 1.0),
        ]
        .into();
        let mut clock = ManualClock::new();
        let mut player = player();
        player.start(&choreo, Vec3::default(), PlaybackMode::Solo, &mut clock);

        run_to(&mut player, &mut clock, 1.0);
        assert_eq!(player.actor().active_clips().len(), 1);
        assert_eq!(player.actor().current_clip(), Some("salsa2"));

        run_to(&mut player, &mut clock, 2.0);
        assert!(player.actor().active_clips().is_empty());
    }

    #[test]
    fn stop_keeps_position_and_cleans_up() {
        let choreo: Choreography = vec![ActionBlock::move_to(StagePoint::new(10.0, 0.0), 2.0)].into();
        let mut clock = ManualClock::new();
        let mut player = player();
        player.start(&choreo, Vec3::default(), PlaybackMode::Solo, &mut clock);

        run_to(&mut player, &mut clock, 1.0);
        let halfway = player.actor().position();
        player.stop(&mut clock);

        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.actor().position(), halfway);
        assert_eq!(clock.pending_count(), 0);

        run_to(&mut player, &mut clock, 5.0);
        assert_eq!(player.actor().position(), halfway);
    }

    #[test]
    fn stop_is_safe_in_any_state() {
        let mut clock = ManualClock::new();
        let mut player = player();

        player.stop(&mut clock);
        assert!(player.drain_events().is_empty());

        player.start(&salsa_then_move(), Vec3::default(), PlaybackMode::Solo, &mut clock);
        player.stop(&mut clock);
        player.stop(&mut clock);
        assert_eq!(player.state(), PlayerState::Idle);
        assert!(player.actor().active_clips().is_empty());

        let events = player.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, PlaybackEvent::Stopped))
                .count(),
            1
        );
    }

    #[test]
    fn finished_player_can_start_again() {
        let mut clock = ManualClock::new();
        let mut player = player();
        let first: Choreography = vec![ActionBlock::dance_step("salsa1", 1.0)].into();
        player.start(&first, Vec3::default(), PlaybackMode::Solo, &mut clock);
        run_to(&mut player, &mut clock, 1.0);
        assert_eq!(player.state(), PlayerState::Finished);

        let second: Choreography = vec![ActionBlock::move_to(StagePoint::new(2.0, 2.0), 1.0)].into();
        player.start(&second, Vec3::default(), PlaybackMode::Ensemble, &mut clock);
        assert_eq!(player.state(), PlayerState::PlayingMoveTo);
        assert_eq!(player.mode(), Some(PlaybackMode::Ensemble));
        assert_eq!(player.block_index(), Some(0));
    }

    #[test]
    fn unknown_block_holds_for_short_default() {
        let choreo: Choreography = vec![
            ActionBlock::dance_step("salsa1", 1.0),
            ActionBlock::Unsupported,
            ActionBlock::move_to(StagePoint::new(2.0, 0.0), 2.0),
        ]
        .into();
        let total = choreo.total_duration();

        let mut clock = ManualClock::new();
        let mut player = player();
        player.start(&choreo, Vec3::default(), PlaybackMode::Solo, &mut clock);

        run_to(&mut player, &mut clock, 1.0);
        assert_eq!(player.block_index(), Some(1));
        assert!(player.actor().active_clips().is_empty());

        run_to(&mut player, &mut clock, 1.2);
        assert_eq!(player.block_index(), Some(1));

        run_to(&mut player, &mut clock, total - 0.01);
        assert_eq!(player.state(), PlayerState::PlayingMoveTo);

        run_to(&mut player, &mut clock, total);
        assert_eq!(player.state(), PlayerState::Finished);
    }

    /// Fail-open policy: a missing clip is logged and the dancer simply does
    /// not animate, while timing carries on unchanged.
    #[test]
    fn missing_clip_degrades_silently() {
        let choreo: Choreography = vec![
            ActionBlock::dance_step("moonwalk", 1.5),
            ActionBlock::dance_step("salsa3", 1.0),
        ]
        .into();
        let mut clock = ManualClock::new();
        let mut player = player();
        player.start(&choreo, Vec3::default(), PlaybackMode::Solo, &mut clock);

        assert_eq!(player.state(), PlayerState::PlayingDanceStep);
        assert!(player.actor().active_clips().is_empty());
        assert_eq!(clock.next_due(), Some(1.5));

        run_to(&mut player, &mut clock, 1.5);
        assert_eq!(player.actor().current_clip(), Some("salsa3"));
    }

    /// Fail-open policy: a rig error is swallowed and not retried.
    #[test]
    fn failing_clip_is_not_retried() {
        let actor = HeadlessActor::with_dance_catalog().fail_on("hiphop3");
        let mut player = ChoreographyPlayer::new("dancer2", actor);
        let mut clock = ManualClock::new();
        let choreo: Choreography = vec![ActionBlock::dance_step("hiphop3", 2.0)].into();

        player.start(&choreo, Vec3::default(), PlaybackMode::Solo, &mut clock);
        for frame in 1..=10_u32 {
            run_to(&mut player, &mut clock, f64::from(frame) * 0.1);
        }

        assert!(player.actor().played().is_empty());
        assert_eq!(player.state(), PlayerState::PlayingDanceStep);
        run_to(&mut player, &mut clock, 2.0);
        assert_eq!(player.state(), PlayerState::Finished);
    }

    /// Fail-open policy: mixer errors are logged every frame and the block
    /// schedule is unaffected.
    #[test]
    fn mixer_errors_do_not_stall_the_schedule() {
        let actor = HeadlessActor::with_dance_catalog().break_mixer();
        let mut player = ChoreographyPlayer::new("dancer5", actor);
        let mut clock = ManualClock::new();
        player.start(&salsa_then_move(), Vec3::default(), PlaybackMode::Solo, &mut clock);

        run_to(&mut player, &mut clock, 1.0);
        assert_eq!(player.actor().current_clip(), Some("salsa1"));
        assert_eq!(player.actor().active_clips()[0].elapsed, 0.0);
        assert_eq!(player.state(), PlayerState::PlayingDanceStep);

        run_to(&mut player, &mut clock, 2.0);
        assert_eq!(player.state(), PlayerState::PlayingMoveTo);
        assert_eq!(player.block_index(), Some(1));

        run_to(&mut player, &mut clock, 3.5);
        assert_eq!(player.state(), PlayerState::Finished);
        assert_eq!(player.actor().position(), Vec3::new(5.0, 0.0, 3.0));
    }

    #[test]
    fn move_without_target_returns_to_start() {
        let choreo: Choreography = serde_json::from_str(
            r#"[
                {"type": "moveTo", "position": [6, 0, -2], "duration": 1},
                {"type": "moveTo", "duration": 1}
            ]"#,
        )
        .unwrap();
        let start = Vec3::new(-5.0, 0.0, -2.0);

        let mut clock = ManualClock::new();
        let mut player = player();
        player.start(&choreo, start, PlaybackMode::Solo, &mut clock);

        run_to(&mut player, &mut clock, 1.0);
        assert_eq!(player.actor().position(), Vec3::new(6.0, 0.0, -2.0));
        assert_eq!(player.state(), PlayerState::PlayingMoveTo);

        run_to(&mut player, &mut clock, 2.0);
        assert_eq!(player.state(), PlayerState::Finished);
        assert_eq!(player.actor().position(), start);
    }

    #[test]
    fn defers_start_until_actor_is_ready() {
        let mut actor = HeadlessActor::with_dance_catalog();
        actor.set_ready(false);
        let mut player = ChoreographyPlayer::new("dancer3", actor);
        let mut clock = ManualClock::new();

        player.start(&salsa_then_move(), Vec3::new(1.0, 0.0, 1.0), PlaybackMode::Ensemble, &mut clock);
        assert!(player.is_awaiting_actor());
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(clock.pending_count(), 0);

        run_to(&mut player, &mut clock, 0.5);
        assert!(player.is_awaiting_actor());

        player.actor_mut().set_ready(true);
        run_to(&mut player, &mut clock, 0.6);
        assert!(!player.is_awaiting_actor());
        assert_eq!(player.state(), PlayerState::PlayingDanceStep);
        assert_eq!(player.actor().position(), Vec3::new(1.0, 0.0, 1.0));
        assert!((clock.next_due().unwrap() - 2.6).abs() < 1e-9);
    }

    #[test]
    fn stop_discards_deferred_start() {
        let mut actor = HeadlessActor::with_dance_catalog();
        actor.set_ready(false);
        let mut player = ChoreographyPlayer::new("dancer4", actor);
        let mut clock = ManualClock::new();

        player.start(&salsa_then_move(), Vec3::default(), PlaybackMode::Solo, &mut clock);
        player.stop(&mut clock);
        player.actor_mut().set_ready(true);
        run_to(&mut player, &mut clock, 1.0);

        assert_eq!(player.state(), PlayerState::Idle);
        assert!(player.actor().played().is_empty());
    }

    #[test]
    fn ignores_foreign_timers() {
        let mut clock = ManualClock::new();
        let foreign = clock.schedule(0.1);
        let mut player = player();
        player.start(&salsa_then_move(), Vec3::default(), PlaybackMode::Solo, &mut clock);

        assert!(!player.handle_timer(foreign, &mut clock));
        assert_eq!(player.block_index(), Some(0));
    }
}
