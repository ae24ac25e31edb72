pub mod analytics;
pub mod date_util;
pub mod error;
pub mod http;
pub mod storage;

pub use analytics::{departments_overview, teams_for_department};
pub use analytics::{DepartmentTeams, DepartmentsOverview};
pub use date_util::{Filter, WindowUnit};
pub use error::{Error, Result};
pub use storage::Database;
