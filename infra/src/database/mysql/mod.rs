//! MySQL repository implementations

mod attendance_repository_impl;
mod rows;
mod subject_repository_impl;
mod verification_repository_impl;

pub use attendance_repository_impl::MySqlAttendanceRepository;
pub use subject_repository_impl::MySqlSubjectRepository;
pub use verification_repository_impl::MySqlVerificationRepository;
