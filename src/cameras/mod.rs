pub mod orthographic;
pub mod perspective;
