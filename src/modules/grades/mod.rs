pub mod composite;
pub mod controller;
pub mod model;
pub mod router;
pub mod service;
