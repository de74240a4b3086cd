//! Component-level tests for configuration, errors, builders and utilities.

mod unit;
