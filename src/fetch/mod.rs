//! Instance download utility.

pub mod downloader;

pub use downloader::{read_instance_list, FetchOptions, InstanceDownloader};
