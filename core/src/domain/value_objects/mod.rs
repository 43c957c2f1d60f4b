//! Value objects representing immutable domain concepts.

pub mod login_payload;
pub mod subject_removal;

// Re-export commonly used types
pub use login_payload::LoginPayload;
pub use subject_removal::SubjectRemoval;
