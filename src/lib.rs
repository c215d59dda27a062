pub mod error;
pub mod organization_query;

// Re-export commonly used types
pub use error::{QueryError, Result};
pub use organization_query::{OrganizationQuery, OrganizationQueryBuilder};
