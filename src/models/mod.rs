pub mod meal;
pub mod payment;
pub mod requested;
pub mod user;
pub mod write_result;

pub use meal::*;
pub use payment::*;
pub use requested::*;
pub use user::*;
pub use write_result::*;
