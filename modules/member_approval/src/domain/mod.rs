pub mod decision;
pub mod error;
pub mod events;
pub mod gateway;
pub mod ports;
pub mod selection;
pub mod service;
pub mod session;
