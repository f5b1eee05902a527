use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("Unknown account type: {0}")]
    UnknownAccountType(String)
}
