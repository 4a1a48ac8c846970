pub mod alert;
pub mod coords;
pub mod observability;
pub mod site;

pub use alert::*;
pub use coords::*;
pub use observability::*;
pub use site::*;
