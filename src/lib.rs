// #![deny(unused_crate_dependencies)]

pub mod client;
mod client_management;
mod data_provider;
mod generic;

pub use client_management::*;
pub use data_provider::*;
pub use generic::*;
