//! Layered settings: struct defaults, an optional TOML file, then
//! `MIXVID__` environment variables. Command-line flags are applied on top
//! by the caller.

mod load;
mod schema;

pub use load::resolve_config_path;
pub use schema::*;

#[cfg(test)]
mod tests;
