//! Integration tests for the change cache

mod change_sets;
mod config_integration;
mod precedence;
mod recording;
mod replay_cli;
mod test_utils;
