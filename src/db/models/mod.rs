pub mod sample;

pub use sample::StepSample;
