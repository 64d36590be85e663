//! walkandtalk configuration system.
//!
//! TOML-based configuration with validation. All sections use defaults so
//! partial configs work out of the box, and out-of-range values are
//! reported without discarding the rest of the file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wt_config::load_default;
//!
//! let config = load_default().expect("failed to load config");
//! println!("{}", config.server.url);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::WtConfig;
pub use toml_loader::{load_default, load_from_path};
pub use validation::validate;
