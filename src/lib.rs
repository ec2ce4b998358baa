// Courier - transactional account emails over SendGrid or SMTP
//
// This crate re-exports the mail library and adds logging setup for the
// services that embed it.

// Re-export the mail library
pub use courier_mail::*;

pub mod logging;
