//! Attendance session tracking
//!
//! Opening and closing sessions is race-free through the store's atomic
//! operations. Each successful transition dispatches a best-effort notice.

mod service;

#[cfg(test)]
mod tests;

pub use service::AttendanceService;
