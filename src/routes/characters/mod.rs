mod handler;
mod model;

pub use handler::get_characters;
pub use model::{CharacterPage, CharacterQuery, SortField, SortOrder};
