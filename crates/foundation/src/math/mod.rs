pub mod error;
pub mod geodesy;
pub mod projection;
pub mod vec;

pub use error::*;
pub use geodesy::*;
pub use projection::*;
pub use vec::*;
