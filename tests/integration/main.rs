//! Host-side integration test binary.
//!
//! Drives the full game service against mock hardware: phase flow, timer
//! dispatch, debounced input, and the end-to-end gameplay scenarios.

mod game_flow_tests;
mod mock_hw;
