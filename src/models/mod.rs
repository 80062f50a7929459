pub mod collection;
pub mod payment;
pub mod store_result;
pub mod user;

pub use collection::*;
pub use payment::*;
pub use store_result::*;
pub use user::*;
