pub mod grade;
pub mod queue;
pub mod ratings;
pub mod settings;
pub mod study;
