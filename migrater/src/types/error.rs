use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TypeError {
    #[error("`{0}` is not a canonical migration identifier")]
    InvalidIdentifier(String),
}
