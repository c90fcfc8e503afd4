mod data_exports;
mod health_check;
mod storage_status;
mod subscriptions;

pub use data_exports::*;
pub use health_check::*;
pub use storage_status::*;
pub use subscriptions::*;
