mod loader;
mod paths;
mod stream;
mod types;

pub use loader::{BASE_URL_ENV, PAGE_ORIGIN_ENV};
pub use paths::CONFIG_PATH_ENV;
pub use types::{Config, ReconnectConfig, StreamOrigin};
