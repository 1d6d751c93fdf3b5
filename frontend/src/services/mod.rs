pub mod api;
pub mod config;
pub mod date_utils;
pub mod fixtures;
pub mod gateway;
pub mod logging;
pub mod remote;
pub mod storage;
pub mod upload;

pub use api::{ApiError, ApiResult, DataOrigin, DataSource, Served};
pub use config::{AppConfig, DataSourceMode};
pub use gateway::Gateway;
pub use storage::{ClientStorage, FileClientStorage, MemoryClientStorage};
pub use upload::ImageUpload;
