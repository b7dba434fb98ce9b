pub mod book;
pub mod note;
pub mod quote;
pub mod reading_session;
pub mod review;
pub mod shelf;
pub mod user;
pub mod user_book;
pub mod user_book_shelf;

pub use book::Book;
pub use note::Note;
pub use quote::Quote;
pub use reading_session::ReadingSession;
pub use review::Review;
pub use shelf::Shelf;
pub use user_book::{ReadingStatus, UserBook};

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
/// Use with `#[serde(default, deserialize_with = "double_option")]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        rating: Option<Option<i32>>,
    }

    #[test]
    fn double_option_keeps_null_apart_from_missing() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        let cleared: Patch = serde_json::from_str(r#"{"rating": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"rating": 4}"#).unwrap();

        assert_eq!(missing.rating, None);
        assert_eq!(cleared.rating, Some(None));
        assert_eq!(set.rating, Some(Some(4)));
    }
}
