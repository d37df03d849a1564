pub mod dynamic_array;
pub mod linked_list;

pub use dynamic_array::DynamicArray;
pub use linked_list::{LinkedList, Position};

use strand_config::StrandGlobalConfigError;
use strand_libs::thiserror::{self, Error};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrandContainerError {
    #[error("global config error: {0}")]
    GlobalConfigError(#[from] StrandGlobalConfigError),
    #[error("container empty for {0}()")]
    ContainerEmpty(&'static str),
}
