//! Test suites for the burrow daemon.

mod support;
