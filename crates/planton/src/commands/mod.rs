pub mod config;
pub mod init;
pub mod kind;
pub mod plan;
pub mod render;
pub mod run;
pub mod stack_input;
pub mod validate;
