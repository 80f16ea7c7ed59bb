pub mod client;
pub mod in_cluster;
pub mod proc_loader;
pub mod proc_validator;
pub mod settings;
