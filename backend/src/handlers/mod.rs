pub mod admin;
pub mod auth;
pub mod catalog;
pub mod courses;
pub mod enrollments;
pub mod lessons;
pub mod sections;
