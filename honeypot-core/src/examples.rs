//! Canned scam messages for trying the service out.

pub const EXAMPLE_MESSAGES: [&str; 4] = [
    "Your bank account has been suspended due to suspicious activity. Click here to verify: http://fake-bank-verify.com/secure",
    "Congratulations! You have won 1,00,000 rupees in our lottery! Send your bank account number to claim your prize immediately!",
    "Urgent: Your UPI needs verification. Share your UPI ID and account details to reactivate your account. Account number: 123456789012",
    "Your account will be blocked in 24 hours. Verify now at https://suspicious-link.com/verify?token=abc123",
];

pub fn example(index: usize) -> Option<&'static str> {
    EXAMPLE_MESSAGES.get(index).copied()
}

/// Message being composed before it is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    text: String,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Replace the draft with example `index`. Returns false (and leaves the
    /// draft alone) when there is no such example.
    pub fn set_example_text(&mut self, index: usize) -> bool {
        match example(index) {
            Some(text) => {
                self.set(text);
                true
            }
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examples_are_in_range() {
        assert_eq!(EXAMPLE_MESSAGES.len(), 4);
        assert!(example(3).unwrap().contains("https://suspicious-link.com"));
        assert!(example(4).is_none());
    }

    #[test]
    fn test_set_example_text_replaces_draft() {
        let mut draft = Draft::new();
        draft.set("typed by hand");
        assert!(draft.set_example_text(2));
        assert!(draft.as_str().contains("123456789012"));

        assert!(!draft.set_example_text(42));
        assert!(draft.as_str().contains("123456789012"));

        draft.clear();
        assert!(draft.is_blank());
    }
}
