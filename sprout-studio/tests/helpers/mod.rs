//! Shared test helpers for sprout-studio integration tests

#![allow(dead_code)]

pub mod fakes;
