// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Command implementations

mod config_cmds;
mod inspect;
mod render;

pub use config_cmds::*;
pub use inspect::*;
pub use render::*;
