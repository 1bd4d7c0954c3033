//! Core of the NetBeans proxy tests: the download-binaries task and the
//! runner that drives it through whatever proxy the environment names.

pub mod config;
pub mod logging;

pub mod checksum;
pub mod context;
pub mod download_binaries;
pub mod fetch;
pub mod fileset;
pub mod manifest;
pub mod proxy;
pub mod request;
pub mod runner;
pub mod storage;
pub mod task;
