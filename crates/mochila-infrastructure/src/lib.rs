//! Adapters for the mochila ports: storage backends, photo stores, mail
//! transports and configuration loading.

pub mod config;
pub mod mail;
pub mod photo;
pub mod seed;
pub mod storage;

pub use config::{AppConfig, StoreBackend};
pub use mail::{ConsoleMailer, SmtpMailer, build_mailer};
pub use photo::{LocalPhotoStorage, S3PhotoStorage};
pub use storage::{FileStore, MemoryStore};
