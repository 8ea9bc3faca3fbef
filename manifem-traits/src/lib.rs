use nalgebra::RealField;

pub use nalgebra;

/// Real scalar type used throughout `manifem`.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}

pub mod allocators;
