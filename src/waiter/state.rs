// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Poll loop state machine.

/// `Polling` is initial; the other states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    Polling { attempt: u32 },
    Succeeded,
    TimedOut,
    Fatal,
}

/// What a single lookup reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Found,
    NotFound,
    Failed,
}

impl WaitState {
    pub fn initial() -> Self {
        WaitState::Polling { attempt: 1 }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, WaitState::Polling { .. })
    }

    pub fn advance(self, observation: Observation, max_attempts: u32) -> Self {
        let WaitState::Polling { attempt } = self else {
            return self;
        };

        match observation {
            Observation::Found => WaitState::Succeeded,
            Observation::NotFound if attempt >= max_attempts => WaitState::TimedOut,
            Observation::NotFound => WaitState::Polling {
                attempt: attempt + 1,
            },
            Observation::Failed => WaitState::Fatal,
        }
    }
}
