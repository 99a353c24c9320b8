pub mod email_sender;
pub mod verification_notifier;

pub use email_sender::EmailSender;
pub use verification_notifier::{NotificationError, VerificationCodeNotifier};
