pub mod customer;
pub mod order;
pub mod service_type;
pub mod status;
pub mod subscription;
pub mod usage;

pub use customer::*;
pub use order::*;
pub use service_type::*;
pub use status::*;
pub use subscription::*;
pub use usage::*;
