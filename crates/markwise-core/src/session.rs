//! Session phase tracking and elapsed-time accounting.
//!
//! A grading session moves `NotStarted → InProgress → Finished`, never
//! backwards. The [`Session`] state machine is pure and framework-free;
//! [`SessionClock`] drives it from a once-per-second tokio tick that is
//! cancelled on finish and on drop, so no timer outlives the session that
//! owns it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::error::SessionError;

/// Where a grading session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Finished,
}

/// A pure session state machine: two gates around a monotonic counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    phase: SessionPhase,
    elapsed_secs: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::NotStarted,
            elapsed_secs: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Begin the session once the learner has acknowledged instructions.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::NotStarted => {
                self.phase = SessionPhase::InProgress;
                Ok(())
            }
            SessionPhase::InProgress => Err(SessionError::AlreadyStarted),
            SessionPhase::Finished => Err(SessionError::AlreadyFinished),
        }
    }

    /// Advance the clock by one second. Counts only while in progress.
    pub fn tick(&mut self) {
        if self.phase == SessionPhase::InProgress {
            self.elapsed_secs += 1;
        }
    }

    /// End the session and freeze the elapsed value, returning it.
    pub fn finish(&mut self) -> Result<u64, SessionError> {
        match self.phase {
            SessionPhase::InProgress => {
                self.phase = SessionPhase::Finished;
                Ok(self.elapsed_secs)
            }
            SessionPhase::NotStarted => Err(SessionError::NotInProgress),
            SessionPhase::Finished => Err(SessionError::AlreadyFinished),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Render elapsed seconds as `MM:SS`.
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Drives a [`Session`] from a once-per-second background tick.
///
/// The tick task is aborted on [`finish`](SessionClock::finish) and again on
/// drop, so every exit path clears the schedule.
pub struct SessionClock {
    session: Arc<Mutex<Session>>,
    ticker: JoinHandle<()>,
}

impl SessionClock {
    /// Start a session and spawn its tick task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start() -> Self {
        let mut session = Session::new();
        // Freshly constructed, the transition cannot fail.
        let _ = session.start();
        let session = Arc::new(Mutex::new(session));

        let ticker = tokio::spawn({
            let session = Arc::clone(&session);
            async move {
                let mut interval = tokio::time::interval(Duration::from_secs(1));
                // The first tick completes immediately; consume it so the
                // counter starts at zero.
                interval.tick().await;
                loop {
                    interval.tick().await;
                    session.lock().unwrap().tick();
                }
            }
        });

        Self { session, ticker }
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.lock().unwrap().phase()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.session.lock().unwrap().elapsed_secs()
    }

    /// Stop the tick task and freeze the session, returning elapsed seconds.
    pub fn finish(&self) -> Result<u64, SessionError> {
        self.ticker.abort();
        self.session.lock().unwrap().finish()
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_the_phase_order() {
        let mut session = Session::new();
        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.finish(), Err(SessionError::NotInProgress));

        session.start().unwrap();
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.start(), Err(SessionError::AlreadyStarted));

        assert_eq!(session.finish(), Ok(0));
        assert_eq!(session.phase(), SessionPhase::Finished);
        assert_eq!(session.start(), Err(SessionError::AlreadyFinished));
        assert_eq!(session.finish(), Err(SessionError::AlreadyFinished));
    }

    #[test]
    fn tick_counts_only_while_in_progress() {
        let mut session = Session::new();
        session.tick();
        assert_eq!(session.elapsed_secs(), 0);

        session.start().unwrap();
        session.tick();
        session.tick();
        assert_eq!(session.elapsed_secs(), 2);

        session.finish().unwrap();
        session.tick();
        assert_eq!(session.elapsed_secs(), 2, "finished sessions are frozen");
    }

    #[test]
    fn finish_reports_the_frozen_elapsed_value() {
        let mut session = Session::new();
        session.start().unwrap();
        for _ in 0..65 {
            session.tick();
        }
        assert_eq!(session.finish(), Ok(65));
        assert_eq!(session.elapsed_secs(), 65);
    }

    #[test]
    fn format_elapsed_pads_minutes_and_seconds() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(9), "00:09");
        assert_eq!(format_elapsed(65), "01:05");
        assert_eq!(format_elapsed(600), "10:00");
        assert_eq!(format_elapsed(3661), "61:01");
    }

    #[tokio::test(start_paused = true)]
    async fn clock_counts_65_simulated_seconds_then_freezes() {
        let clock = SessionClock::start();
        assert_eq!(clock.phase(), SessionPhase::InProgress);

        // Let the tick task register its timer before advancing.
        tokio::task::yield_now().await;
        for _ in 0..65 {
            tokio::time::advance(Duration::from_secs(1)).await;
        }
        tokio::task::yield_now().await;

        let elapsed = clock.finish().unwrap();
        assert_eq!(elapsed, 65);
        assert_eq!(format_elapsed(elapsed), "01:05");

        // The schedule is cleared; time passing changes nothing.
        tokio::time::advance(Duration::from_secs(30)).await;
        tokio::task::yield_now().await;
        assert_eq!(clock.elapsed_secs(), 65);
        assert_eq!(clock.phase(), SessionPhase::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn clock_cannot_finish_twice() {
        let clock = SessionClock::start();
        clock.finish().unwrap();
        assert_eq!(clock.finish(), Err(SessionError::AlreadyFinished));
    }
}
