//! Tests for the notification dispatcher and processor

#[cfg(test)]
mod dispatcher_tests;
#[cfg(test)]
mod processor_tests;
