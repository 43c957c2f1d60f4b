//! Database module tests

mod connection_tests;
