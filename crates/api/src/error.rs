use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PortalError {
    #[error("Internal error")]
    InternalError,
    #[error("Invalid data provided: Error message: `{0}`")]
    BadClientData(String),
}
