pub mod changes;
pub mod projects;
