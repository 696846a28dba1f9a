//! Client configuration: a TOML file layered with `FABRIC_*` environment
//! variables and command line overrides.

mod defaults;
mod loader;

pub use defaults::{CONFIG_SECTION, ClientConfig};
pub use loader::{get_default_config, load_client_config, load_configuration, write_config_to};
