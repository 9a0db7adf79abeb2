//! Layered settings resolution.
//!
//! A settings record describes its fields once through [`ConfigRecord`]. The
//! loader walks that table, derives one environment variable per leaf field
//! (`LocalFile` reads `LOCAL_FILE`), reads a config file from a list of search
//! paths and fills the record with environment values layered over the file.
//!
//! ```rust,ignore
//! use layered_settings::{ConfigLoader, settings::Base};
//!
//! let settings: Base = ConfigLoader::new()
//!     .with_search_path(".")
//!     .with_file_name("appsettings")
//!     .load()?;
//! ```

pub mod constants;
mod loader;
mod naming;
pub mod record;
pub mod settings;

pub use loader::{
    ConfigError, ConfigLoader, ErrorKind, FileFormat, OverridePolicy, SUPPORTED_EXTENSIONS,
    ValueOrigin, env_var_if_set, load,
};
pub use naming::to_env_key;
pub use record::{
    ConfigRecord, FieldDescriptor, FieldKind, LeafField, RecordType, ValueKind, enumerate,
    leaf_fields,
};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
