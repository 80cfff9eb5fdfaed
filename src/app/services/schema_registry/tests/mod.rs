//! Tests for the record schema registry

mod registry_tests;
