// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error carrying a specific process exit code.

use std::fmt;

/// Exit code for an unusable config file or state directory
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when another dwelld holds the state lock
pub const EXIT_LOCKED: i32 = 3;
/// Exit code for a board missing from the config
pub const EXIT_UNKNOWN_BOARD: i32 = 4;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
