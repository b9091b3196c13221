//! 2-D geometric primitives used to describe a bobbin winding window and the
//! sections, layers and turns wound inside it.
//!
//! Unlike an IC-layout geometry kernel, every coordinate here is a physical
//! length in metres (`f64`), not an integer grid unit: magnetic components
//! are wound from real wire with real insulation thicknesses, so there is no
//! natural manufacturing grid to snap to.
//!
//! # Examples
//!
//! ```
//! use geometry::prelude::*;
//!
//! let rect = Rect::from_dims(Point::new(0.0, 0.0), Dims::new(0.010, 0.004));
//! assert_eq!(rect.width(), 0.010);
//! ```

pub mod circle;
pub mod dims;
pub mod dir;
pub mod point;
pub mod polar;
pub mod rect;

pub mod prelude {
    //! Re-exports of the most commonly used geometry types.
    pub use crate::circle::Circle;
    pub use crate::dims::Dims;
    pub use crate::dir::{Dir, Orientation};
    pub use crate::point::Point;
    pub use crate::polar::PolarPoint;
    pub use crate::rect::Rect;
}
