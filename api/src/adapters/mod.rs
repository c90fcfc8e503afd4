mod atomic_file;
pub mod export_directory;
pub mod file_subscriber_store;
pub mod subscription_writer;

pub use crate::adapters::export_directory::ExportDirectory;
pub use crate::adapters::file_subscriber_store::FileSubscriberStore;
