//! Type-safe ID wrappers.

use serde::Serialize;
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        pub struct $name(pub String);

        // The API reports ids as JSON numbers in some payloads and strings
        // in others; accept both.
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                struct IdVisitor;

                impl serde::de::Visitor<'_> for IdVisitor {
                    type Value = String;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        f.write_str("a string or integer id")
                    }

                    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
                        Ok(v.to_owned())
                    }

                    fn visit_string<E: serde::de::Error>(self, v: String) -> Result<String, E> {
                        Ok(v)
                    }

                    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
                        Ok(v.to_string())
                    }

                    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
                        Ok(v.to_string())
                    }
                }

                deserializer.deserialize_any(IdVisitor).map($name)
            }
        }

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Check if this ID is empty or "0".
            pub fn is_empty(&self) -> bool {
                self.0.is_empty() || self.0 == "0"
            }

            /// Get the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_owned())
            }
        }

        impl From<&String> for $name {
            fn from(s: &String) -> Self {
                $name(s.clone())
            }
        }

        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                $name(n.to_string())
            }
        }

        impl From<i32> for $name {
            fn from(n: i32) -> Self {
                $name(n.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name("0".to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(AdId, "An advertisement identifier.");
define_id!(ChatId, "A server-assigned conversation identifier.");
define_id!(MessageId, "A message identifier.");
define_id!(UserId, "A user identifier.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ChatId::new("501");
        assert_eq!(id.as_str(), "501");
        assert_eq!(format!("{}", id), "501");
    }

    #[test]
    fn test_id_from_int() {
        let id = AdId::from(42i64);
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_id_is_empty() {
        assert!(ChatId::new("").is_empty());
        assert!(ChatId::new("0").is_empty());
        assert!(!ChatId::new("501").is_empty());
    }

    #[test]
    fn test_id_deserializes_from_number_or_string() {
        let id: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(id.as_str(), "7");

        let id: UserId = serde_json::from_str(r#""7""#).unwrap();
        assert_eq!(id.as_str(), "7");
    }
}
