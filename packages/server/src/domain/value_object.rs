//! Value objects for the chat room.

use std::{fmt, num::NonZeroUsize};

use uuid::Uuid;

use super::error::ValueObjectError;

/// Identity of one live transport session.
///
/// Unique per connection; two tabs opened by the same user get two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<&str> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| ValueObjectError::InvalidConnectionId(value.to_string()))
    }
}

/// Display name chosen at handshake. Not unique across connections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    /// Surrounding whitespace is trimmed; an empty result is rejected.
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyUsername);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display color. Opaque to the server (usually a CSS color such as `#ff8800`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyColor);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Color {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 1-based history page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumber(u32);

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(1);

    /// Anything below 1 is treated as the first page.
    pub fn clamped(raw: i64) -> Self {
        if raw < 1 {
            Self::FIRST
        } else {
            Self(u32::try_from(raw).unwrap_or(u32::MAX))
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Number of messages per history page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub const DEFAULT: PageSize = PageSize(NonZeroUsize::new(20).unwrap());

    pub fn new(value: usize) -> Result<Self, ValueObjectError> {
        NonZeroUsize::new(value)
            .map(Self)
            .ok_or(ValueObjectError::ZeroPageSize)
    }

    pub fn value(&self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rejects_empty() {
        // テスト項目: 空のユーザー名は拒否される
        // given (前提条件):
        let inputs = ["", "   ", "\t\n"];

        for input in inputs {
            // when (操作):
            let result = Username::new(input.to_string());

            // then (期待する結果):
            assert_eq!(result, Err(ValueObjectError::EmptyUsername));
        }
    }

    #[test]
    fn test_username_is_trimmed() {
        let username = Username::new("  alice ".to_string()).unwrap();

        assert_eq!(username.as_str(), "alice");
    }

    #[test]
    fn test_color_rejects_empty() {
        assert_eq!(
            Color::new(" ".to_string()),
            Err(ValueObjectError::EmptyColor)
        );
        assert_eq!(Color::new("#ff8800".to_string()).unwrap().as_str(), "#ff8800");
    }

    #[test]
    fn test_page_number_clamps_non_positive_to_first_page() {
        // テスト項目: 0 以下のページ番号は 1 ページ目として扱われる
        assert_eq!(PageNumber::clamped(0), PageNumber::FIRST);
        assert_eq!(PageNumber::clamped(-3), PageNumber::FIRST);
        assert_eq!(PageNumber::clamped(4).value(), 4);
        assert_eq!(PageNumber::clamped(i64::MAX).value(), u32::MAX);
    }

    #[test]
    fn test_page_size_rejects_zero() {
        assert_eq!(PageSize::new(0), Err(ValueObjectError::ZeroPageSize));
        assert_eq!(PageSize::default().value(), 20);
    }

    #[test]
    fn test_connection_id_round_trips_through_display() {
        let id = ConnectionId::generate();

        let parsed = ConnectionId::try_from(id.to_string().as_str()).unwrap();

        assert_eq!(parsed, id);
        assert!(ConnectionId::try_from("not-a-uuid").is_err());
    }
}
