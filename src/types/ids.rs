use super::ValidationError;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

lazy_static::lazy_static! {
    /// A run of at least 32 hex digits. Page slugs that end in hex letters
    /// ("...-Page-<id>") bleed into the run, so the ID is its last 32 digits.
    static ref HEX_RUN: Regex = Regex::new(r"(?i)[0-9a-f]{32,}")
        .expect("Failed to compile Notion ID regex - this is a bug in the code");
}

/// A Notion record ID in canonical `8-4-4-4-12` lowercase hyphenated form.
///
/// The private API keys every record map by this form, so it is the only
/// one the crate stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotionId(String);

impl NotionId {
    /// Extracts an ID from a page URL, a dashed UUID, or a bare 32-hex string.
    ///
    /// Dashes and underscores are stripped before searching, so IDs split by
    /// either survive. The first hex run of 32 or more digits wins.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("page URL/ID"));
        }

        let compact: String = trimmed.chars().filter(|c| *c != '-' && *c != '_').collect();
        let run = HEX_RUN.find(&compact).map(|m| m.as_str()).ok_or_else(|| {
            ValidationError::InvalidId(format!(
                "could not extract 32-char page id from input: {:?}",
                input
            ))
        })?;

        Self::from_hex(&run[run.len() - 32..])
    }

    /// Builds an ID from exactly 32 hex digits.
    fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        let uuid = Uuid::parse_str(hex)
            .map_err(|e| ValidationError::InvalidId(format!("{}: {}", hex, e)))?;
        Ok(NotionId(uuid.hyphenated().to_string()))
    }

    /// Returns the hyphenated form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the ID without dashes, as it appears in page URLs.
    pub fn to_compact(&self) -> String {
        self.0.replace('-', "")
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for NotionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl AsRef<str> for NotionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parsing() {
        let id = NotionId::parse("550e8400e29b41d4a716446655440000").unwrap();
        assert_eq!(id.as_str(), "550e8400-e29b-41d4-a716-446655440000");

        let id = NotionId::parse("550E8400-E29B-41D4-A716-446655440000").unwrap();
        assert_eq!(id.as_str(), "550e8400-e29b-41d4-a716-446655440000");

        let id = NotionId::parse("  550e8400_e29b_41d4_a716_446655440000\n").unwrap();
        assert_eq!(id.as_str(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_page_url_with_hex_letters_in_slug() {
        let id =
            NotionId::parse("https://www.example.com/My-Page-1234567890abcdef1234567890abcdef")
                .unwrap();
        assert_eq!(id.as_str(), "12345678-90ab-cdef-1234-567890abcdef");
    }

    #[test]
    fn test_page_url_with_view_query() {
        let id = NotionId::parse(
            "https://www.notion.so/ws/Tasks-0123456789abcdef0123456789abcdef?v=fedcba9876543210fedcba9876543210",
        )
        .unwrap();
        assert_eq!(id.as_str(), "01234567-89ab-cdef-0123-456789abcdef");
    }

    #[test]
    fn test_invalid_ids() {
        assert!(matches!(
            NotionId::parse(""),
            Err(ValidationError::EmptyField(_))
        ));
        assert!(matches!(
            NotionId::parse("   "),
            Err(ValidationError::EmptyField(_))
        ));
        assert!(matches!(
            NotionId::parse("too-short"),
            Err(ValidationError::InvalidId(_))
        ));
        assert!(NotionId::parse("https://www.notion.so/no-id-here").is_err());
    }

    #[test]
    fn test_to_compact() {
        let id = NotionId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.to_compact(), "550e8400e29b41d4a716446655440000");
    }
}
