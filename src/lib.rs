#![doc = "The `taskdeck` library crate."]
#![doc = ""]
#![doc = "This crate contains the business logic, domain models, authentication"]
#![doc = "mechanisms, persistence layer, routing configuration, and error handling"]
#![doc = "for the taskdeck API. It is used by the main binary (`main.rs`) to"]
#![doc = "construct and run the application."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod tasks;
