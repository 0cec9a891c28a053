//! Tests for the perch-engine crate.

mod helpers;
