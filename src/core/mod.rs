pub mod admin;
pub mod approval;
pub mod backup;
pub mod company;
pub mod config;
pub mod hours;
pub mod log;
pub mod punch;
pub mod session;
pub mod sms;
pub mod timesheet;
