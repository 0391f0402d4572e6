//! Local configuration record.
//!
//! A single `euclid.toml` holds the remote manifest URL, the install root and
//! the installed version of every component.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_config_str, to_toml};
pub use paths::{CONFIG_FILE_NAME, config_path_in, default_cache_dir, default_config_dir, detect_install_root};
pub use schema::{CURRENT_SCHEMA_VERSION, Config, DEFAULT_REMOTE_MANIFEST_URL};
pub use store::ConfigStore;
