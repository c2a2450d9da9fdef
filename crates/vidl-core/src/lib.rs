pub mod config;
pub mod logging;

pub mod convert;
pub mod download;
pub mod error;
pub mod http;
pub mod interrupt;
pub mod naming;
pub mod pipeline;
pub mod search;
