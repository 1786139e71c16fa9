//! Newtype IDs for type-safe entity references.
//!
//! IDs are opaque strings. The order backends diverge on what they put in
//! them (one uses a timestamp-derived integer, the other a server-assigned
//! document name), so nothing in this crate ever parses an ID numerically
//! or assumes ordering between two IDs.
//!
//! Catalog documents in the wild carry IDs as JSON strings *or* numbers;
//! deserialization accepts both and normalizes to a string.

/// Macro to define an opaque string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` as a plain string
/// - `Deserialize` accepting a JSON string or integer
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>` and `From<&str>` implementations
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                struct IdVisitor;

                impl ::serde::de::Visitor<'_> for IdVisitor {
                    type Value = $name;

                    fn expecting(
                        &self,
                        f: &mut ::core::fmt::Formatter<'_>,
                    ) -> ::core::fmt::Result {
                        f.write_str("a string or integer id")
                    }

                    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
                    where
                        E: ::serde::de::Error,
                    {
                        Ok($name(v.to_owned()))
                    }

                    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
                    where
                        E: ::serde::de::Error,
                    {
                        Ok($name(v))
                    }

                    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
                    where
                        E: ::serde::de::Error,
                    {
                        Ok($name(v.to_string()))
                    }

                    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
                    where
                        E: ::serde::de::Error,
                    {
                        Ok($name(v.to_string()))
                    }
                }

                deserializer.deserialize_any(IdVisitor)
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_string() {
        let id: ProductId = serde_json::from_str("\"vanilla-7\"").unwrap();
        assert_eq!(id.as_str(), "vanilla-7");
    }

    #[test]
    fn test_deserialize_from_number() {
        let id: ProductId = serde_json::from_str("3").unwrap();
        assert_eq!(id.as_str(), "3");
    }

    #[test]
    fn test_serialize_as_string() {
        let id = OrderId::new("1714070000000");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1714070000000\"");
    }

    #[test]
    fn test_display() {
        let id = OrderId::from("abc123");
        assert_eq!(format!("{id}"), "abc123");
    }

    #[test]
    fn test_ids_are_distinct_types() {
        // ProductId and OrderId with equal contents are still different types;
        // equality is only defined within a type.
        let product = ProductId::new("1");
        let order = OrderId::new("1");
        assert_eq!(product.as_str(), order.as_str());
    }
}
