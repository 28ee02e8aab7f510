//! Response envelope handling.
//!
//! Listing endpoints answer either with a bare JSON array or with the array
//! wrapped in an object (`{"products": [...]}`, `{"items": [...]}`, or
//! `{"recommendations": [...]}`). Both shapes unwrap to the same list.

use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A list payload in any of the accepted shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
#[serde(bound = "T: DeserializeOwned")]
pub(super) enum ListPayload<T> {
    Bare(Vec<T>),
    Products { products: Vec<T> },
    Items { items: Vec<T> },
    Recommendations { recommendations: Vec<T> },
}

impl<T> ListPayload<T> {
    pub(super) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(list)
            | Self::Products { products: list }
            | Self::Items { items: list }
            | Self::Recommendations {
                recommendations: list,
            } => list,
        }
    }
}
