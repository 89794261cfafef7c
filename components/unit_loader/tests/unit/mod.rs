//! Unit tests for unit_loader
//! Each module exercises one component through the public API.

mod test_config;
mod test_resolver;
