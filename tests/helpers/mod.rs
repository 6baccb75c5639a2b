//! Test helpers module
//!
//! This module provides utilities and helpers for testing VoiceBuddy.
//! It includes a recording data channel, temp-dir backed settings and
//! scripted conversation data.
#![allow(dead_code)]

pub mod channel_mock;
pub mod simple_test;
pub mod test_data;

pub use channel_mock::*;
pub use simple_test::*;
pub use test_data::*;
