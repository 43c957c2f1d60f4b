//! Notification side effects
//!
//! Producers hand jobs to [`NotificationDispatcher`], which submits them to the
//! external queue with a hard wait ceiling. Consumers turn jobs back into mail
//! through [`NotificationProcessor`].

mod config;
mod dispatcher;
mod messages;
mod processor;
mod traits;
mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use config::DispatcherConfig;
pub use dispatcher::NotificationDispatcher;
pub use messages::MailMessage;
pub use processor::NotificationProcessor;
pub use traits::{JobQueueTrait, MailerTrait};
pub use types::DispatchOutcome;
