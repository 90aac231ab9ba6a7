//! Integration tests for the sensor dashboard.
//!
//! These tests verify the interaction between multiple components
//! and test complete workflows end-to-end.

mod provider_tests;
