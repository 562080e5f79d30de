use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type SignResult<T> = std::result::Result<T, SignError>;
pub type TokenReaderResult<T> = std::result::Result<T, TokenReaderError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("token acquisition failed : {0}")]
    TokenReader(#[from] TokenReaderError),
    #[error("OAuth sign failed : {0}")]
    Signer(#[from] SignError),
    #[error("request failed : {0}")]
    Reqwest(#[from] reqwest::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("invalid token : {0}")]
    InvalidToken(String),
    #[error("unsupported signature method : {0}")]
    UnsupportedSignatureMethod(String),
    #[error("input {input:?} could not be represented in {encoding}")]
    Encoding {
        encoding: &'static str,
        input: String,
    },
    #[error("unsupported string encoding : {0}")]
    UnsupportedEncoding(String),
    #[error("client credential {0} must not be empty")]
    MissingClientCredential(&'static str),
    #[error("invalid url : {0}")]
    InvalidUrl(String),
    #[error("failed to compute time since Unix Epoch, {0}")]
    Clock(String),
}

#[derive(Error, Debug, Clone)]
pub enum TokenReaderError {
    #[error("response has malformed format: not found {0} in {1}")]
    TokenKeyNotFound(&'static str, String),
}
