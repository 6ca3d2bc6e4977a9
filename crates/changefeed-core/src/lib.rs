pub mod error;
pub mod models;
pub mod pagination;
pub mod traits;

pub use error::{ChangesError, Result};
pub use models::*;
pub use pagination::{fetch_all_changed_issues, for_each_changed_page};
pub use traits::{ChangeSource, FixedProjection, IssueProjection, NoProjection};
