//! Tests for attendance service
