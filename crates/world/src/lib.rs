pub mod attribution;
pub mod controls;
pub mod error;
pub mod events;
pub mod layer;
pub mod options;
pub mod origin;
pub mod view;
pub mod world;

pub use attribution::*;
pub use controls::*;
pub use error::*;
pub use events::*;
pub use layer::*;
pub use options::*;
pub use origin::*;
pub use view::*;
pub use world::*;
