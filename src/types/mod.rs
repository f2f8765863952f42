// src/types/mod.rs
pub mod account;
pub mod posting;

pub use account::{Account, Company, EmployeeProfile, JobSeekerProfile, Person, Profile, Role};
pub use posting::{Posting, PostingFilter, SortOrder};
