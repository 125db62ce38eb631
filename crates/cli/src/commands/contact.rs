//! Contact form command.
//!
//! The submission is simulated; nothing is sent.

use balance_guru_storefront::contact::{ContactForm, ContactService};
use balance_guru_storefront::{StorefrontConfig, StorefrontError};

/// Submit the contact form and print the resulting notification.
///
/// # Errors
///
/// Returns `StorefrontError::MissingField` or `StorefrontError::InvalidEmail`
/// for an incomplete form.
pub async fn send(
    config: StorefrontConfig,
    name: String,
    email: String,
    subject: String,
    message: String,
) -> Result<(), StorefrontError> {
    let service = ContactService::new(config.contact_delay);
    let form = ContactForm {
        name,
        email,
        subject,
        message,
    };

    let note = service.submit(&form).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("[{}] {}", note.title, note.description);
    }

    Ok(())
}
