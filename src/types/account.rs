// src/types/account.rs
//! Account, role and profile records shared by the data layer, the
//! authenticator and the session token.

use serde::{Deserialize, Serialize};

/// Stored account row. `role_code` is the integer discriminator kept in the
/// database; use [`Role::from_code`] to interpret it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub role_code: i64,
}

impl Account {
    pub fn role(&self) -> Option<Role> {
        Role::from_code(self.role_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    JobSeeker,
}

impl Role {
    pub const EMPLOYEE_CODE: i64 = 1;
    pub const JOB_SEEKER_CODE: i64 = 2;

    /// Parse the user type a client declares at login.
    pub fn parse(declared: &str) -> Option<Self> {
        match declared.trim().to_lowercase().as_str() {
            "employee" | "company" => Some(Role::Employee),
            "jobseeker" | "job_seeker" | "job-seeker" => Some(Role::JobSeeker),
            _ => None,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            Self::EMPLOYEE_CODE => Some(Role::Employee),
            Self::JOB_SEEKER_CODE => Some(Role::JobSeeker),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Role::Employee => Self::EMPLOYEE_CODE,
            Role::JobSeeker => Self::JOB_SEEKER_CODE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::JobSeeker => "jobseeker",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::JobSeeker => "Job Seeker",
        }
    }

    /// Where the client lands after a successful login.
    pub fn redirect(self) -> &'static str {
        match self {
            Role::Employee => "/employee/dashboard",
            Role::JobSeeker => "/jobseeker/dashboard",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub industry: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSeekerProfile {
    pub id: i64,
    pub account_id: i64,
    pub headline: Option<String>,
    pub preferred_category_id: Option<i64>,
    pub person: Person,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub id: i64,
    pub account_id: i64,
    pub position: Option<String>,
    pub person: Person,
    pub company: Company,
}

/// Role-specific profile snapshot embedded in the session token at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Profile {
    JobSeeker(JobSeekerProfile),
    Employee(EmployeeProfile),
}
