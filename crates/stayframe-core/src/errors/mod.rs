mod config_error;
pub mod error_code;
mod extract_error;
mod merge_error;
mod stayframe_error;
mod storage_error;

pub use config_error::ConfigError;
pub use error_code::StayframeErrorCode;
pub use extract_error::ExtractError;
pub use merge_error::MergeError;
pub use stayframe_error::{StayframeError, StayframeResult};
pub use storage_error::StorageError;
