// Domain models

mod backend;
mod snapshot;

pub use backend::{BACKEND_TYPE, Backend, DomainMapping};
pub use snapshot::{ContainerSnapshot, PortBinding};
