//! Contact form drafts. Nothing is sent over the network; the visitor's
//! mail client does the delivery.

pub const DEFAULT_RECIPIENT: &str = "youxarthur@gmail.com";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// How the draft reached the visitor's mail client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Copied to the clipboard, then the mail client was opened.
    Clipboard,
    /// Clipboard unavailable; the page navigated to the mailto link.
    MailtoFallback,
}

impl Delivery {
    pub fn notice(self, recipient: &str) -> String {
        match self {
            Delivery::Clipboard => format!(
                "Your message has been copied to clipboard! Please paste it into your email app and send it to {recipient}"
            ),
            Delivery::MailtoFallback => format!(
                "Your email client will open automatically. Please send the message to {recipient}"
            ),
        }
    }
}

impl ContactDraft {
    /// Body shared by the clipboard text and the mailto link.
    pub fn mailto_body(&self) -> String {
        format!(
            "From: {} ({})\n\nMessage:\n{}",
            self.name, self.email, self.message
        )
    }

    pub fn email_text(&self, recipient: &str) -> String {
        format!(
            "To: {recipient}\nSubject: {}\n\n{}",
            self.subject,
            self.mailto_body()
        )
    }

    /// `mailto:` URL; `encode` is the URI component encoder of the host.
    pub fn mailto_url(&self, recipient: &str, encode: impl Fn(&str) -> String) -> String {
        format!(
            "mailto:{recipient}?subject={}&body={}",
            encode(&self.subject),
            encode(&self.mailto_body())
        )
    }
}
