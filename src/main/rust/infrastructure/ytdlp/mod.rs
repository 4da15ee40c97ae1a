mod command_builder;
mod info_json;
mod tokio_process;

pub use command_builder::CommandBuilder;
pub use info_json::{RawFormat, RawInfo};
pub use tokio_process::TokioProcessSpawner;
