pub mod admin;
pub mod courses;
pub mod educator;
pub mod users;
pub mod webhooks;
