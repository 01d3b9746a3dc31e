mod color;
mod spread;
mod transform;

pub use color::Color;
pub use spread::SpreadSampler;
pub use transform::{euler_to_quat, quat_to_euler, Transform};
