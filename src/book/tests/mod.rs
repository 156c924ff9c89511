//! Scenario tests for the matching core.
