pub mod whitted;
