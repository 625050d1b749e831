pub mod controller;
pub mod model;
pub mod pdf;
pub mod router;
pub mod service;
