//! The shareable card sheet: one trading card per agent on a PNG grid.

mod avatars;
mod draw;
pub mod layout;

pub use avatars::{avatar_client, load_avatars};
pub use draw::render_cards;
pub use layout::{calculate_optimal_columns, wrap_text, GridLayout};
