use crate::form::FormError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Plans4YouError {
    #[error("Invalid form: {0}")]
    Form(#[from] FormError),

    #[error("Submission {id} is no longer current")]
    StaleSubmission { id: String },
}

pub type Result<T> = std::result::Result<T, Plans4YouError>;
