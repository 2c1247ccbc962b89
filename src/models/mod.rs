pub mod company;
pub mod job;
pub mod prefs;
pub mod view;
