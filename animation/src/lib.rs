mod animated;
mod interpolatable;
mod interpolation;

pub use animated::*;
pub use interpolatable::*;
pub use interpolation::*;
