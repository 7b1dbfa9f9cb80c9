//! Email Adapters
//!
//! Implementations of the MailSender port for outbound code delivery.
//!
//! ## Available Adapters
//!
//! - **ResendMailer** - Resend HTTP API (production)
//! - **MockMailSender** - Records sends in memory (testing/development)

mod mock_mail_sender;
mod resend_mailer;

pub use mock_mail_sender::{MockMailSender, SentMail};
pub use resend_mailer::{ResendConfig, ResendMailer};
