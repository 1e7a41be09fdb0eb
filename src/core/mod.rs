pub mod cost;
pub mod estimator;
pub mod polyfit;
pub mod sampler;
pub mod search;
pub mod speed;
