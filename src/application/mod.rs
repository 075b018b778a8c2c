//! Application layer - turns generation requests into project files

pub mod driver;
pub mod errors;
pub mod locks;
pub mod requests;
pub mod traits;

pub use driver::*;
pub use errors::*;
pub use locks::*;
pub use requests::*;
pub use traits::*;
