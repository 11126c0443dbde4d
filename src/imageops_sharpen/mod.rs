pub mod batch;
pub mod box_blur;
pub mod edge_magnitude;
pub mod loader;
pub mod options;
pub mod process;
pub mod unsharp_mask;
