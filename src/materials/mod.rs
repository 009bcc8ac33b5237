pub mod glass;
pub mod matte;
pub mod mirror;
pub mod mixmat;
pub mod plastic;
