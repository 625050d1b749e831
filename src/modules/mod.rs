pub mod auth;
pub mod classes;
pub mod grades;
pub mod reports;
pub mod subjects;
pub mod users;
