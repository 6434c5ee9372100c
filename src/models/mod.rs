pub mod company;
pub mod entry;
pub mod page;
pub mod project;
pub mod role;
pub mod status;
pub mod user;

pub use company::Company;
pub use entry::PunchEntry;
pub use page::Page;
pub use project::{Project, ProjectDraft};
pub use role::Role;
pub use status::EntryStatus;
pub use user::{AppUser, UserDraft};
