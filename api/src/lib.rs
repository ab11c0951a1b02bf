mod backend;
mod client;
mod error;
pub mod model;
mod upload;

pub use backend::PortfolioBackend;
pub use client::{Client, BASE_PATH, USER_ID_HEADER};
pub use error::{ApiError, ContractViolation};
pub use upload::{FileError, UploadFile, REQUIRED_COLUMNS};
