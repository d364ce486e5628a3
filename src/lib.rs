pub mod biomechanics;
pub mod config;
pub mod evaluation;
pub mod logging;
pub mod pipeline;
pub mod pose;
