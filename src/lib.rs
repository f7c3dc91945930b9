// Copyright 2026 Sitegrab Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sitegrab library — clone a rendered web page into a local folder.
//!
//! This library crate exposes the core modules for integration testing.

#![allow(
    dead_code,
    unused_imports,
    clippy::new_without_default,
    clippy::should_implement_trait
)]

pub mod capture;
pub mod cli;
pub mod cloner;
pub mod fetch;
pub mod output;
pub mod progress;
pub mod renderer;
