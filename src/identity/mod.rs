//! Role-scoped identity: roles, the per-role profile shapes, and the per-mount session value.
//! Keep the public surface thin and split implementation across sub-modules.

mod role;
mod profile;
mod principal;
mod session;
mod credentials;

pub use role::{Role, IdentityMethod};
pub use profile::{
    AdminProfile, Approvable, CompanyProfile, CompanyRef, Internship, InternshipStatus, RoleProfile,
    StudentProfile, SupervisorProfile, SupervisorRef,
};
pub use principal::Identity;
pub use session::{Session, SessionState, Resolution};
pub use credentials::{LoginRequest, SignupRequest};
