//! Identifier newtypes.
//!
//! Players, peers and spaces are all identified by strings on the wire
//! (board JSON and intent messages), so each id is a transparent string
//! newtype. Keeping them distinct types stops a space id from being passed
//! where a player id is expected.
//!
//! ```
//! use rust_board::core::{PlayerId, SpaceId};
//!
//! let player = PlayerId::new("p1");
//! let space = SpaceId::new("start");
//!
//! assert_eq!(player.as_str(), "p1");
//! assert_eq!(format!("{}", space), "start");
//! ```

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new id.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw id.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Stable player identity, used by intents to claim who is acting.
    PlayerId
);

string_id!(
    /// Connection id of the peer controlling a player.
    PeerId
);

string_id!(
    /// Board space identifier.
    SpaceId
);
