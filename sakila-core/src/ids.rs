//! Strongly-typed record identifiers.
//!
//! The backend uses integer primary keys; each entity gets its own newtype so
//! a rental id can never be passed where a customer id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Common behaviour of the identifier newtypes.
pub trait RecordId:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    fn new(raw: i64) -> Self;
    fn get(self) -> i64;
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl RecordId for $name {
            fn new(raw: i64) -> Self {
                Self(raw)
            }

            fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// `customer_id` primary key.
    CustomerId
);
record_id!(
    /// `film_id` primary key.
    FilmId
);
record_id!(
    /// `actor_id` primary key.
    ActorId
);
record_id!(
    /// `rental_id` primary key.
    RentalId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&CustomerId::new(42)).unwrap();
        assert_eq!(json, "42");
        let back: FilmId = serde_json::from_str("7").unwrap();
        assert_eq!(back.get(), 7);
    }

    #[test]
    fn ids_display_raw_value() {
        assert_eq!(RentalId::from(16049).to_string(), "16049");
    }
}
