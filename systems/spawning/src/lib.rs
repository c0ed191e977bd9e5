#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave controller responsible for emitting enemy spawn commands.
//!
//! The controller reacts to world events: a started wave arms a
//! [`SpawnTimer`], elapsed simulation time releases spawns, and terminal or
//! reset events disarm it.

use std::time::Duration;

use log::{debug, trace};
use waypoint_defence_core::{Command, Event, Outcome, WaveNumber, WaveRules};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Repeating timer that releases a bounded number of spawns.
///
/// Time only moves when [`SpawnTimer::advance`] is called, so replays that feed
/// the same deltas observe the same spawns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpawnTimer {
    interval: Duration,
    accumulator: Duration,
    remaining: u32,
    active: bool,
}

impl SpawnTimer {
    /// Arms the timer to release `total` spawns, one per elapsed `interval`.
    ///
    /// Intervals shorter than one millisecond are raised to one millisecond.
    pub fn start(&mut self, interval: Duration, total: u32) {
        self.interval = interval.max(MIN_INTERVAL);
        self.accumulator = Duration::ZERO;
        self.remaining = total;
        self.active = true;
        trace!("spawn timer armed: {total} spawns every {:?}", self.interval);
    }

    /// Advances the timer by `dt` and returns the number of spawns released.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.active {
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let mut released = 0;
        while self.remaining > 0 && self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            self.remaining -= 1;
            released += 1;
        }
        released
    }

    /// Stops the timer, reporting whether it was still running.
    ///
    /// Cancelling an idle timer is a no-op.
    pub fn cancel(&mut self) -> bool {
        if !self.active {
            return false;
        }

        self.active = false;
        self.remaining = 0;
        self.accumulator = Duration::ZERO;
        trace!("spawn timer cancelled");
        true
    }

    /// Reports whether the timer is armed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Spawns still to be released.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// Phase of the wave controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveState {
    /// No wave is spawning.
    Idle,
    /// A wave is releasing enemies.
    Spawning {
        /// Wave being spawned.
        wave: WaveNumber,
        /// Enemies released so far.
        spawned: u32,
        /// Enemies the wave contains.
        total: u32,
    },
    /// Every wave was defeated; nothing else will spawn.
    Won,
}

/// Pure system that turns wave starts and elapsed time into spawn commands.
#[derive(Debug)]
pub struct WaveController {
    rules: WaveRules,
    state: WaveState,
    timer: SpawnTimer,
}

impl Default for WaveController {
    fn default() -> Self {
        Self::new(WaveRules::default())
    }
}

impl WaveController {
    /// Creates an idle controller using the supplied wave rules.
    #[must_use]
    pub fn new(rules: WaveRules) -> Self {
        Self {
            rules,
            state: WaveState::Idle,
            timer: SpawnTimer::default(),
        }
    }

    /// Current phase of the controller.
    #[must_use]
    pub fn state(&self) -> WaveState {
        self.state
    }

    /// Timer pacing the current wave.
    #[must_use]
    pub fn timer(&self) -> &SpawnTimer {
        &self.timer
    }

    /// Consumes world events in order and emits the resulting commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::WaveStarted { wave } => self.start_wave(*wave, out),
                Event::TimeAdvanced { dt } => self.release(*dt, out),
                Event::GameOver {
                    outcome: Outcome::Victory,
                } => {
                    let _ = self.timer.cancel();
                    self.state = WaveState::Won;
                }
                Event::GameOver {
                    outcome: Outcome::Defeat,
                }
                | Event::SessionReset => self.stop(),
                _ => {}
            }
        }
    }

    fn start_wave(&mut self, wave: WaveNumber, out: &mut Vec<Command>) {
        if self.state == WaveState::Won {
            return;
        }

        let total = self.rules.enemies_in_wave(wave);
        let interval = self.rules.spawn_interval(wave);
        debug!("wave {wave}: spawning {total} enemies every {interval:?}");

        self.timer.start(interval, total);
        self.state = WaveState::Spawning {
            wave,
            spawned: 0,
            total,
        };

        if total == 0 {
            self.complete(wave, out);
        }
    }

    fn release(&mut self, dt: Duration, out: &mut Vec<Command>) {
        let WaveState::Spawning {
            wave,
            spawned,
            total,
        } = self.state
        else {
            return;
        };

        let released = self.timer.advance(dt);
        for _ in 0..released {
            out.push(Command::SpawnEnemy { wave });
        }

        let spawned = spawned + released;
        self.state = WaveState::Spawning {
            wave,
            spawned,
            total,
        };

        if spawned >= total {
            self.complete(wave, out);
        }
    }

    fn complete(&mut self, wave: WaveNumber, out: &mut Vec<Command>) {
        let _ = self.timer.cancel();
        self.state = WaveState::Idle;
        out.push(Command::CompleteSpawning { wave });
    }

    fn stop(&mut self) {
        if self.timer.cancel() {
            debug!("wave spawning interrupted");
        }
        self.state = WaveState::Idle;
    }
}
