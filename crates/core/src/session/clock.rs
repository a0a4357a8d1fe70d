/// Identifies one countdown started on a `RestClock`.
///
/// Ticks carry the token of the countdown they were scheduled for. Once a new
/// countdown starts or the clock is stopped, older tokens no longer match and
/// their ticks are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockToken(u64);

/// What a single tick did to the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Stale token, paused or idle clock: nothing changed.
    Ignored,
    /// One second elapsed and the countdown continues.
    Counting { remaining: u32 },
    /// The countdown reached zero; the clock is idle again.
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Countdown {
    #[default]
    Idle,
    Running {
        remaining: u32,
    },
    Paused {
        remaining: u32,
    },
}

/// Rest countdown with at most one live countdown at a time.
///
/// The clock does not own a timer. Whoever drives it calls `tick` once per
/// elapsed second with the token returned by `start`.
#[derive(Debug, Clone, Default)]
pub struct RestClock {
    generation: u64,
    countdown: Countdown,
}

impl RestClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down from `secs`, superseding any pending countdown.
    ///
    /// A zero-length countdown completes on its first tick.
    pub fn start(&mut self, secs: u32) -> ClockToken {
        self.generation = self.generation.wrapping_add(1);
        self.countdown = Countdown::Running { remaining: secs };
        ClockToken(self.generation)
    }

    /// Returns `true` if the clock was running and is now paused.
    pub fn pause(&mut self) -> bool {
        match self.countdown {
            Countdown::Running { remaining } => {
                self.countdown = Countdown::Paused { remaining };
                true
            }
            Countdown::Paused { .. } | Countdown::Idle => false,
        }
    }

    /// Returns `true` if the clock was paused and is now running.
    pub fn resume(&mut self) -> bool {
        match self.countdown {
            Countdown::Paused { remaining } => {
                self.countdown = Countdown::Running { remaining };
                true
            }
            Countdown::Running { .. } | Countdown::Idle => false,
        }
    }

    /// Flip between running and paused. Returns the new running flag, or
    /// `None` when no countdown is active.
    pub fn toggle(&mut self) -> Option<bool> {
        match self.countdown {
            Countdown::Running { .. } => {
                self.pause();
                Some(false)
            }
            Countdown::Paused { .. } => {
                self.resume();
                Some(true)
            }
            Countdown::Idle => None,
        }
    }

    /// Reassign the remaining time and stop emission until resumed.
    pub fn reset(&mut self, secs: u32) {
        self.countdown = Countdown::Paused { remaining: secs };
    }

    /// Halt the countdown and invalidate its token.
    pub fn stop(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.countdown = Countdown::Idle;
    }

    /// Apply one elapsed second.
    pub fn tick(&mut self, token: ClockToken) -> Tick {
        if token.0 != self.generation {
            return Tick::Ignored;
        }
        match self.countdown {
            Countdown::Running { remaining } if remaining <= 1 => {
                self.countdown = Countdown::Idle;
                Tick::Completed
            }
            Countdown::Running { remaining } => {
                let remaining = remaining - 1;
                self.countdown = Countdown::Running { remaining };
                Tick::Counting { remaining }
            }
            Countdown::Paused { .. } | Countdown::Idle => Tick::Ignored,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        match self.countdown {
            Countdown::Running { remaining } | Countdown::Paused { remaining } => remaining,
            Countdown::Idle => 0,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.countdown, Countdown::Running { .. })
    }

    /// Running or paused.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.countdown, Countdown::Idle)
    }

    /// Token of the live countdown, if any.
    #[must_use]
    pub fn token(&self) -> Option<ClockToken> {
        self.is_active().then_some(ClockToken(self.generation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_to_zero_and_completes_once() {
        let mut clock = RestClock::new();
        let token = clock.start(3);

        let ticks: Vec<Tick> = (0..5).map(|_| clock.tick(token)).collect();

        assert_eq!(
            ticks,
            vec![
                Tick::Counting { remaining: 2 },
                Tick::Counting { remaining: 1 },
                Tick::Completed,
                Tick::Ignored,
                Tick::Ignored,
            ]
        );
        assert_eq!(clock.remaining(), 0);
        assert!(!clock.is_active());
    }

    #[test]
    fn restart_invalidates_previous_token() {
        let mut clock = RestClock::new();
        let first = clock.start(60);
        let second = clock.start(30);

        assert_eq!(clock.tick(first), Tick::Ignored);
        assert_eq!(clock.remaining(), 30);
        assert_eq!(clock.tick(second), Tick::Counting { remaining: 29 });
    }

    #[test]
    fn pause_holds_remaining_time() {
        let mut clock = RestClock::new();
        let token = clock.start(10);
        clock.tick(token);

        assert!(clock.pause());
        assert_eq!(clock.tick(token), Tick::Ignored);
        assert_eq!(clock.remaining(), 9);

        assert!(clock.resume());
        assert_eq!(clock.tick(token), Tick::Counting { remaining: 8 });
    }

    #[test]
    fn double_toggle_restores_running_state() {
        let mut clock = RestClock::new();
        clock.start(45);
        let before = (clock.is_running(), clock.remaining());

        assert_eq!(clock.toggle(), Some(false));
        assert_eq!(clock.toggle(), Some(true));

        assert_eq!((clock.is_running(), clock.remaining()), before);
    }

    #[test]
    fn reset_reassigns_and_stops_emission() {
        let mut clock = RestClock::new();
        let token = clock.start(90);
        clock.tick(token);
        clock.reset(90);

        assert_eq!(clock.remaining(), 90);
        assert!(!clock.is_running());
        assert_eq!(clock.tick(token), Tick::Ignored);
        assert_eq!(clock.token(), Some(token));
    }

    #[test]
    fn stop_zeroes_and_drops_token() {
        let mut clock = RestClock::new();
        let token = clock.start(90);
        clock.stop();

        assert_eq!(clock.remaining(), 0);
        assert_eq!(clock.token(), None);
        assert_eq!(clock.tick(token), Tick::Ignored);
    }

    #[test]
    fn zero_length_countdown_completes_on_first_tick() {
        let mut clock = RestClock::new();
        let token = clock.start(0);
        assert_eq!(clock.tick(token), Tick::Completed);
    }

    #[test]
    fn toggle_on_idle_clock_is_none() {
        let mut clock = RestClock::new();
        assert_eq!(clock.toggle(), None);
    }
}
