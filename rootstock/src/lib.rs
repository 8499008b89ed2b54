use rootstock_core::service::ServiceSet;

pub mod cli;
pub mod commands;

pub struct AppContext {
    pub services: ServiceSet,
}
