//! A focus session: breathing guidance and countdown driven by one timer queue.
//!
//! The session never reads a clock itself. Every operation takes the current
//! time in milliseconds and [`FocusSession::poll`] fires whatever timers have
//! come due, so callers can drive it from a UI tick or a [`ManualClock`].
//!
//! [`ManualClock`]: crate::scheduler::ManualClock

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::breath::{BreathCycle, BreathPhase};
use crate::countdown::{Countdown, CountdownStep, TICK_INTERVAL_MS};
use crate::error::Result;
use crate::scheduler::{Millis, TimerId, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTimer {
    PhaseTransition,
    CountdownTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionStatus {
    Running,
    Paused,
    Completed,
    EndedEarly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub duration_minutes: u32,
    pub breath_count: u32,
    pub seconds_focused: u32,
    pub ended_early: bool,
    pub finished_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhaseChanged(BreathPhase),
    Tick(u32),
    CycleCompleted(u32),
    Completed(SessionSummary),
}

/// Callback-style view of [`SessionEvent`]s
pub trait SessionObserver {
    fn on_phase_change(&mut self, _phase: BreathPhase) {}
    fn on_tick(&mut self, _seconds_remaining: u32) {}
    fn on_cycle_complete(&mut self, _breath_count: u32) {}
    fn on_session_complete(&mut self, _summary: &SessionSummary) {}
}

impl SessionEvent {
    pub fn dispatch(&self, observer: &mut dyn SessionObserver) {
        match self {
            SessionEvent::PhaseChanged(phase) => observer.on_phase_change(*phase),
            SessionEvent::Tick(secs) => observer.on_tick(*secs),
            SessionEvent::CycleCompleted(count) => observer.on_cycle_complete(*count),
            SessionEvent::Completed(summary) => observer.on_session_complete(summary),
        }
    }
}

#[derive(Debug)]
pub struct FocusSession {
    duration_minutes: u32,
    breath: BreathCycle,
    countdown: Countdown,
    status: SessionStatus,
    timers: TimerQueue<SessionTimer>,
    // At most one of each is ever pending.
    phase_timer: Option<TimerId>,
    tick_timer: Option<TimerId>,
    phase_started_at: Millis,
    paused_progress: f64,
    summary: Option<SessionSummary>,
}

impl FocusSession {
    pub fn start(duration_minutes: u32, now: Millis) -> Result<Self> {
        let countdown = Countdown::new(duration_minutes)?;
        let mut session = Self {
            duration_minutes,
            breath: BreathCycle::new(),
            countdown,
            status: SessionStatus::Running,
            timers: TimerQueue::new(),
            phase_timer: None,
            tick_timer: None,
            phase_started_at: now,
            paused_progress: 0.0,
            summary: None,
        };
        session.schedule_phase(now);
        session.schedule_tick(now);

        info!(duration_minutes, "focus session started");
        Ok(session)
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn phase(&self) -> BreathPhase {
        self.breath.phase()
    }

    pub fn breath_count(&self) -> u32 {
        self.breath.breath_count()
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.countdown.seconds_remaining()
    }

    pub fn is_paused(&self) -> bool {
        self.status == SessionStatus::Paused
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            SessionStatus::Completed | SessionStatus::EndedEarly
        )
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    /// Fraction of the current phase's dwell time already spent, in `[0, 1]`
    pub fn phase_progress(&self, now: Millis) -> f64 {
        match self.status {
            SessionStatus::Running => {
                let elapsed = now.saturating_sub(self.phase_started_at) as f64;
                (elapsed / self.phase().dwell_ms() as f64).clamp(0.0, 1.0)
            }
            SessionStatus::Paused => self.paused_progress,
            SessionStatus::Completed | SessionStatus::EndedEarly => 0.0,
        }
    }

    /// Fire every timer due at or before `now`, in deadline order
    pub fn poll(&mut self, now: Millis) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        while let Some((id, deadline, timer)) = self.timers.pop_due(now) {
            match timer {
                SessionTimer::PhaseTransition => {
                    if self.phase_timer == Some(id) {
                        self.phase_timer = None;
                    }
                    self.on_phase_timer(deadline, &mut events);
                }
                SessionTimer::CountdownTick => {
                    if self.tick_timer == Some(id) {
                        self.tick_timer = None;
                    }
                    self.on_tick_timer(deadline, &mut events);
                }
            }
        }

        events
    }

    /// Freeze both controllers. Partial dwell and partial-second progress is
    /// discarded; [`resume`](Self::resume) restarts both from zero.
    pub fn pause(&mut self, now: Millis) -> bool {
        if self.status != SessionStatus::Running {
            return false;
        }
        self.paused_progress = self.phase_progress(now);
        self.cancel_timers();
        self.status = SessionStatus::Paused;

        info!(
            seconds_remaining = self.seconds_remaining(),
            phase = %self.phase(),
            "focus session paused"
        );
        true
    }

    pub fn resume(&mut self, now: Millis) -> bool {
        if self.status != SessionStatus::Paused {
            return false;
        }
        self.status = SessionStatus::Running;
        self.schedule_phase(now);
        self.schedule_tick(now);

        info!(
            seconds_remaining = self.seconds_remaining(),
            "focus session resumed"
        );
        true
    }

    /// Returns whether the session is paused afterwards
    pub fn toggle_pause(&mut self, now: Millis) -> bool {
        if self.is_paused() {
            self.resume(now);
        } else {
            self.pause(now);
        }
        self.is_paused()
    }

    /// Stop immediately and report the breaths completed so far
    pub fn end_early(&mut self) -> u32 {
        if !self.is_finished() {
            self.finish(SessionStatus::EndedEarly);
        }
        self.breath_count()
    }

    fn on_phase_timer(&mut self, deadline: Millis, events: &mut Vec<SessionEvent>) {
        let step = self.breath.advance();
        debug!(phase = %step.phase, "breath phase changed");
        events.push(SessionEvent::PhaseChanged(step.phase));
        if step.cycle_completed {
            events.push(SessionEvent::CycleCompleted(self.breath.breath_count()));
        }
        self.schedule_phase(deadline);
    }

    fn on_tick_timer(&mut self, deadline: Millis, events: &mut Vec<SessionEvent>) {
        match self.countdown.tick() {
            Some(CountdownStep::Remaining(secs)) => {
                events.push(SessionEvent::Tick(secs));
                self.schedule_tick(deadline);
            }
            Some(CountdownStep::Completed) => {
                events.push(SessionEvent::Tick(0));
                let summary = self.finish(SessionStatus::Completed);
                events.push(SessionEvent::Completed(summary));
            }
            None => {}
        }
    }

    // Reschedules relative to `from` so coarse polling does not stretch the rhythm.
    fn schedule_phase(&mut self, from: Millis) {
        if let Some(stale) = self.phase_timer.take() {
            self.timers.cancel(stale);
        }
        self.phase_started_at = from;
        self.phase_timer = Some(self.timers.schedule(
            from,
            self.phase().dwell_ms(),
            SessionTimer::PhaseTransition,
        ));
    }

    fn schedule_tick(&mut self, from: Millis) {
        if let Some(stale) = self.tick_timer.take() {
            self.timers.cancel(stale);
        }
        self.tick_timer = Some(
            self.timers
                .schedule(from, TICK_INTERVAL_MS, SessionTimer::CountdownTick),
        );
    }

    fn cancel_timers(&mut self) {
        self.timers.cancel_all();
        self.phase_timer = None;
        self.tick_timer = None;
    }

    fn finish(&mut self, status: SessionStatus) -> SessionSummary {
        self.cancel_timers();
        self.status = status;

        let summary = SessionSummary {
            duration_minutes: self.duration_minutes,
            breath_count: self.breath_count(),
            seconds_focused: self.countdown.seconds_elapsed(),
            ended_early: status == SessionStatus::EndedEarly,
            finished_at: Local::now(),
        };
        info!(
            breath_count = summary.breath_count,
            seconds_focused = summary.seconds_focused,
            ended_early = summary.ended_early,
            "focus session finished"
        );
        self.summary = Some(summary.clone());
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FocusError;
    use crate::scheduler::{Clock, ManualClock};
    use assert_matches::assert_matches;

    fn phase_changes(events: &[SessionEvent]) -> Vec<BreathPhase> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::PhaseChanged(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    fn ticks(events: &[SessionEvent]) -> Vec<u32> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Tick(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_rejects_zero_duration() {
        assert_matches!(
            FocusSession::start(0, 0),
            Err(FocusError::InvalidDuration(0))
        );
    }

    #[test]
    fn test_start_schedules_one_timer_of_each_kind() {
        let session = FocusSession::start(5, 0).unwrap();
        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(session.phase(), BreathPhase::Inhale);
        assert_eq!(session.seconds_remaining(), 300);
        assert_eq!(session.pending_timers(), 2);
        assert_eq!(session.next_deadline(), Some(1000));
    }

    #[test]
    fn test_nothing_fires_before_deadlines() {
        let mut session = FocusSession::start(5, 0).unwrap();
        assert!(session.poll(999).is_empty());
        assert_eq!(session.poll(1000), vec![SessionEvent::Tick(299)]);
    }

    #[test]
    fn test_breath_phases_follow_dwell_times() {
        let clock = ManualClock::new();
        let mut session = FocusSession::start(5, clock.now_ms()).unwrap();

        clock.advance(3999);
        assert!(phase_changes(&session.poll(clock.now_ms())).is_empty());

        clock.advance(1);
        assert_eq!(
            phase_changes(&session.poll(clock.now_ms())),
            vec![BreathPhase::Hold]
        );

        clock.advance(2000);
        assert_eq!(
            phase_changes(&session.poll(clock.now_ms())),
            vec![BreathPhase::Exhale]
        );

        clock.advance(4000);
        let events = session.poll(clock.now_ms());
        assert_eq!(phase_changes(&events), vec![BreathPhase::Inhale]);
        assert!(events.contains(&SessionEvent::CycleCompleted(1)));
        assert_eq!(session.breath_count(), 1);
    }

    #[test]
    fn test_coarse_poll_catches_up_in_order() {
        let mut session = FocusSession::start(5, 0).unwrap();
        let events = session.poll(20_000);

        assert_eq!(ticks(&events), (280..300).rev().collect::<Vec<u32>>());
        assert_eq!(
            phase_changes(&events),
            vec![
                BreathPhase::Hold,
                BreathPhase::Exhale,
                BreathPhase::Inhale,
                BreathPhase::Hold,
                BreathPhase::Exhale,
                BreathPhase::Inhale,
            ]
        );
        assert_eq!(session.breath_count(), 2);
        assert_eq!(session.pending_timers(), 2);
    }

    #[test]
    fn test_session_completes_exactly_once() {
        let mut session = FocusSession::start(1, 0).unwrap();
        let events = session.poll(60_000);

        let completions: Vec<&SessionSummary> = events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Completed(summary) => Some(summary),
                _ => None,
            })
            .collect();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].breath_count, 6);
        assert_eq!(completions[0].seconds_focused, 60);
        assert!(!completions[0].ended_early);

        assert_eq!(ticks(&events).len(), 60);
        assert_matches!(events.last(), Some(SessionEvent::Completed(_)));
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.seconds_remaining(), 0);
        assert_eq!(session.pending_timers(), 0);

        assert!(session.poll(120_000).is_empty());
    }

    #[test]
    fn test_pause_freezes_both_controllers() {
        let mut session = FocusSession::start(5, 0).unwrap();
        session.poll(2500);
        assert_eq!(session.seconds_remaining(), 298);

        assert!(session.pause(2500));
        assert!(session.is_paused());
        assert_eq!(session.pending_timers(), 0);
        assert!(session.poll(100_000).is_empty());
        assert_eq!(session.seconds_remaining(), 298);
        assert_eq!(session.phase(), BreathPhase::Inhale);
    }

    #[test]
    fn test_resume_restarts_dwell_from_zero() {
        let mut session = FocusSession::start(5, 0).unwrap();
        session.poll(3500);
        session.pause(3500);
        session.resume(10_000);

        // the 3.5s of inhale already spent is not credited
        let events = session.poll(13_999);
        assert!(phase_changes(&events).is_empty());
        assert_eq!(ticks(&events), vec![296, 295, 294]);

        assert_eq!(
            phase_changes(&session.poll(14_000)),
            vec![BreathPhase::Hold]
        );
    }

    #[test]
    fn test_repeated_pause_resume_never_duplicates_timers() {
        let mut session = FocusSession::start(5, 0).unwrap();

        for i in 0..10u64 {
            let now = i * 700;
            session.poll(now);
            assert!(session.pending_timers() <= 2);
            session.pause(now);
            assert!(!session.pause(now));
            assert_eq!(session.pending_timers(), 0);
            session.resume(now + 300);
            assert!(!session.resume(now + 300));
            assert_eq!(session.pending_timers(), 2);
        }
    }

    #[test]
    fn test_toggle_pause() {
        let mut session = FocusSession::start(5, 0).unwrap();
        assert!(session.toggle_pause(100));
        assert!(!session.toggle_pause(200));
        assert_eq!(session.status(), SessionStatus::Running);
    }

    #[test]
    fn test_end_early_reports_breaths_so_far() {
        let mut session = FocusSession::start(5, 0).unwrap();
        session.poll(25_000);

        assert_eq!(session.end_early(), 2);
        assert_eq!(session.status(), SessionStatus::EndedEarly);
        assert_eq!(session.pending_timers(), 0);
        assert!(session.poll(1_000_000).is_empty());

        let summary = session.summary().unwrap();
        assert!(summary.ended_early);
        assert_eq!(summary.seconds_focused, 25);
        assert_eq!(summary.duration_minutes, 5);

        // idempotent
        assert_eq!(session.end_early(), 2);
        assert!(!session.resume(2_000_000));
    }

    #[test]
    fn test_phase_progress() {
        let mut session = FocusSession::start(5, 0).unwrap();
        assert_eq!(session.phase_progress(0), 0.0);
        assert_eq!(session.phase_progress(2000), 0.5);

        session.poll(5000);
        assert_eq!(session.phase(), BreathPhase::Hold);
        assert_eq!(session.phase_progress(5000), 0.5);

        session.pause(5000);
        assert_eq!(session.phase_progress(9000), 0.5);

        session.resume(9000);
        assert_eq!(session.phase_progress(9000), 0.0);
    }

    #[derive(Default)]
    struct Recorder {
        phases: Vec<BreathPhase>,
        ticks: usize,
        cycles: Vec<u32>,
        completed: Option<u32>,
    }

    impl SessionObserver for Recorder {
        fn on_phase_change(&mut self, phase: BreathPhase) {
            self.phases.push(phase);
        }

        fn on_tick(&mut self, _seconds_remaining: u32) {
            self.ticks += 1;
        }

        fn on_cycle_complete(&mut self, breath_count: u32) {
            self.cycles.push(breath_count);
        }

        fn on_session_complete(&mut self, summary: &SessionSummary) {
            self.completed = Some(summary.breath_count);
        }
    }

    #[test]
    fn test_observer_dispatch() {
        let mut session = FocusSession::start(1, 0).unwrap();
        let mut recorder = Recorder::default();

        for event in session.poll(60_000) {
            event.dispatch(&mut recorder);
        }

        assert_eq!(recorder.ticks, 60);
        assert_eq!(recorder.cycles, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(recorder.phases.len(), 18);
        assert_eq!(recorder.completed, Some(6));
    }
}
