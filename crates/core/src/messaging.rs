//! WhatsApp deep-links used to hand customers over to the seller.
//!
//! All links use the `https://wa.me/{digits}?text=...` form. When no
//! WhatsApp number is configured the digits are omitted and WhatsApp asks
//! the customer to pick a chat.

use serde::Deserialize;

use crate::models::Product;

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Inquiry captured by the public contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl ContactMessage {
    /// Names of required fields left blank, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("Name", &self.name),
            ("Email", &self.email),
            ("Message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }

    /// The pre-filled WhatsApp text.
    #[must_use]
    pub fn to_text(&self) -> String {
        format!(
            "New Contact Form Submission:\n\nName: {}\nEmail: {}\nPhone: {}\n\nMessage: {}",
            self.name.trim(),
            self.email.trim(),
            self.phone.trim(),
            self.message.trim(),
        )
    }
}

/// The digits of a configured WhatsApp number, if any.
fn recipient_digits(whatsapp: Option<&str>) -> String {
    whatsapp
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

/// A chat link with pre-filled text.
#[must_use]
pub fn chat_link(whatsapp: Option<&str>, text: &str) -> String {
    format!(
        "{WHATSAPP_BASE}{}?text={}",
        recipient_digits(whatsapp),
        urlencoding::encode(text)
    )
}

/// A chat link with no pre-filled text.
#[must_use]
pub fn plain_chat_link(whatsapp: Option<&str>) -> String {
    format!("{WHATSAPP_BASE}{}", recipient_digits(whatsapp))
}

/// The "order this product" message for a product.
#[must_use]
pub fn product_order_text(product: &Product) -> String {
    format!(
        "Hi! I'm interested in ordering the {} (Model: {})",
        product.name, product.model
    )
}

/// The order hand-off link for a product.
#[must_use]
pub fn product_order_link(whatsapp: Option<&str>, product: &Product) -> String {
    chat_link(whatsapp, &product_order_text(product))
}

/// The hand-off link for a contact-form submission.
#[must_use]
pub fn contact_form_link(whatsapp: Option<&str>, message: &ContactMessage) -> String {
    chat_link(whatsapp, &message.to_text())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn romeo() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "6f1c1a52-3b9e-4a53-9c1d-3a2f0b9f5e10",
            "name": "Romeo",
            "model": "romeo",
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_product_order_link_without_number() {
        assert_eq!(
            product_order_link(None, &romeo()),
            "https://wa.me/?text=Hi%21%20I%27m%20interested%20in%20ordering%20the%20Romeo%20%28Model%3A%20romeo%29"
        );
    }

    #[test]
    fn test_product_order_link_strips_number_formatting() {
        let link = product_order_link(Some("+254 700-000 000"), &romeo());
        assert!(link.starts_with("https://wa.me/254700000000?text=Hi%21"));
    }

    #[test]
    fn test_contact_form_text_layout() {
        let message = ContactMessage {
            name: "Amina".to_string(),
            email: "amina@example.com".to_string(),
            phone: String::new(),
            message: "Do you deliver to Kisumu?".to_string(),
        };
        assert_eq!(
            message.to_text(),
            "New Contact Form Submission:\n\nName: Amina\nEmail: amina@example.com\nPhone: \n\nMessage: Do you deliver to Kisumu?"
        );

        let link = contact_form_link(None, &message);
        assert!(link.contains("Submission%3A%0A%0AName%3A%20Amina%0A"));
    }

    #[test]
    fn test_missing_fields() {
        let message = ContactMessage {
            name: " ".to_string(),
            phone: "+254".to_string(),
            ..ContactMessage::default()
        };
        assert_eq!(message.missing_fields(), vec!["Name", "Email", "Message"]);
    }

    #[test]
    fn test_plain_chat_link() {
        assert_eq!(plain_chat_link(None), "https://wa.me/");
        assert_eq!(plain_chat_link(Some("+1 555 0100")), "https://wa.me/15550100");
    }
}
