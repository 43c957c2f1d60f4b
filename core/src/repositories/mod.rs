//! Repository interfaces for the persistent state this crate owns, plus an
//! in-memory implementation used by tests and local tooling.

pub mod attendance;
pub mod mock;
pub mod subject;
pub mod verification;

#[cfg(test)]
mod tests;

pub use attendance::AttendanceRepository;
pub use mock::MockStore;
pub use subject::SubjectRepository;
pub use verification::VerificationCodeRepository;
