// Library for tests to access modules

pub mod config;
pub mod docker_repo;
pub mod error;
pub mod mapping;
pub mod models;
pub mod registry;
pub mod version;
pub mod worker;
