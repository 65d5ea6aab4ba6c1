pub mod compare;
pub mod run;
pub mod sample;
pub mod validate;
pub mod variant;
