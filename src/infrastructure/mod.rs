pub mod config;
pub mod language;
pub mod locale;
pub mod network;
pub mod storage;
