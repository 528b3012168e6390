pub mod agent;
pub mod authoring;
pub mod avatar;
pub mod cache;
pub mod card;
pub mod config;
pub mod error;
pub mod extract;
pub mod frontmatter;
pub mod io;
pub mod paths;
pub mod persona;
pub mod scan;
pub mod skill;

pub use error::{CrewError, Result};
