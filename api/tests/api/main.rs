mod data_exports;
mod health_check;
mod helpers;
