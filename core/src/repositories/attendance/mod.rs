//! Attendance session repository module.

mod r#trait;
pub use r#trait::AttendanceRepository;
