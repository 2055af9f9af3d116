//! Simulation timers
//!
//! Timers advance on simulation time only (never wall clock), so freezing the
//! simulation freezes them too. Each timer remembers the run generation it was
//! armed for; firings from an older generation are dropped by the dispatcher.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    Armed,
    Paused,
    /// One-shot timer that already fired
    Done,
    Cancelled,
}

/// A one-shot or repeating countdown in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timer {
    delay_ms: f32,
    elapsed_ms: f32,
    repeat: bool,
    state: TimerState,
    generation: u32,
}

impl Timer {
    pub fn repeating(delay_ms: f32, generation: u32) -> Self {
        Self {
            delay_ms: delay_ms.max(1.0),
            elapsed_ms: 0.0,
            repeat: true,
            state: TimerState::Armed,
            generation,
        }
    }

    pub fn once(delay_ms: f32, generation: u32) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            elapsed_ms: 0.0,
            repeat: false,
            state: TimerState::Armed,
            generation,
        }
    }

    /// A timer that never fires
    pub fn disarmed(generation: u32) -> Self {
        Self {
            state: TimerState::Cancelled,
            ..Self::once(0.0, generation)
        }
    }

    /// Advance by `dt_ms`; returns how many times the timer fired
    pub fn advance(&mut self, dt_ms: f32) -> u32 {
        if self.state != TimerState::Armed || dt_ms.is_nan() || dt_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += dt_ms;

        if !self.repeat {
            if self.elapsed_ms >= self.delay_ms {
                self.state = TimerState::Done;
                return 1;
            }
            return 0;
        }

        let mut fired = 0;
        while self.elapsed_ms >= self.delay_ms {
            self.elapsed_ms -= self.delay_ms;
            fired += 1;
        }
        fired
    }

    pub fn pause(&mut self) {
        if self.state == TimerState::Armed {
            self.state = TimerState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == TimerState::Paused {
            self.state = TimerState::Armed;
        }
    }

    pub fn cancel(&mut self) {
        self.state = TimerState::Cancelled;
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.state == TimerState::Armed
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Milliseconds until the next firing (0 when not armed or paused)
    pub fn remaining_ms(&self) -> f32 {
        match self.state {
            TimerState::Armed | TimerState::Paused => (self.delay_ms - self.elapsed_ms).max(0.0),
            _ => 0.0,
        }
    }
}

/// Which timer fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    SpawnPipes,
    SpawnCloud,
    ArmCollisions,
    OpeningJump,
}

/// A firing, tagged with the generation of the timer that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFire {
    pub kind: TimerKind,
    pub generation: u32,
}

/// All timers owned by one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timers {
    pub spawn_pipes: Timer,
    pub spawn_cloud: Timer,
    pub arm_collisions: Timer,
    pub opening_jump: Timer,
}

impl Timers {
    fn each_mut(&mut self) -> [(TimerKind, &mut Timer); 4] {
        [
            (TimerKind::ArmCollisions, &mut self.arm_collisions),
            (TimerKind::OpeningJump, &mut self.opening_jump),
            (TimerKind::SpawnPipes, &mut self.spawn_pipes),
            (TimerKind::SpawnCloud, &mut self.spawn_cloud),
        ]
    }

    /// Advance every timer and collect firings in a stable order
    pub fn advance(&mut self, dt_ms: f32) -> Vec<TimerFire> {
        let mut fires = Vec::new();
        for (kind, timer) in self.each_mut() {
            let generation = timer.generation();
            for _ in 0..timer.advance(dt_ms) {
                fires.push(TimerFire { kind, generation });
            }
        }
        fires
    }

    pub fn pause_all(&mut self) {
        for (_, timer) in self.each_mut() {
            timer.pause();
        }
    }

    pub fn resume_all(&mut self) {
        for (_, timer) in self.each_mut() {
            timer.resume();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, timer) in self.each_mut() {
            timer.cancel();
        }
    }

    pub fn any_armed(&self) -> bool {
        [
            &self.spawn_pipes,
            &self.spawn_cloud,
            &self.arm_collisions,
            &self.opening_jump,
        ]
        .iter()
        .any(|t| t.is_armed())
    }
}
