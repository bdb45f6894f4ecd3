// Applicant profile: the record, its schema keys, the edit-gated store and the
// backend sync client.

pub mod fields;
pub mod models;
pub mod store;
pub mod sync;

pub use fields::ProfileField;
pub use models::{College, Degree, Gender, Profile, ProfileLink, Rating, Specialization};
pub use store::ProfileStore;
pub use sync::{FetchOutcome, ProfileSync};
