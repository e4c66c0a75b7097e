use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("empty strings cannot be stored")]
    EmptyValue,

    #[error("tree is empty")]
    EmptyTree,
}

pub type Result<T> = std::result::Result<T, Error>;
