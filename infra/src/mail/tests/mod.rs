//! Tests for mail services
