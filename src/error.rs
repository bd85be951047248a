use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type ParameterResult<T> = std::result::Result<T, ParameterError>;
pub type RequestResult<T> = std::result::Result<T, RequestError>;
pub type SignResult<T> = std::result::Result<T, SignError>;
pub type ResponseResult<T> = std::result::Result<T, ResponseError>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("parameter error : {0}")]
    Parameter(#[from] ParameterError),
    #[error("request error : {0}")]
    Request(#[from] RequestError),
    #[error("OAuth sign failed : {0}")]
    Sign(#[from] SignError),
    #[error("response parsing failed : {0}")]
    Response(#[from] ResponseError),
    #[error("transport failed : {0}")]
    Transport(#[from] reqwest::Error),
    #[error("connector has not been prepared")]
    NotPrepared,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("parameter name must not be empty")]
    EmptyParameterName,
    #[error("parameter value must be a finite scalar, {0} supplied")]
    InvalidValueKind(&'static str),
    #[error("value is not valid in the declared {0} encoding")]
    EncodingConversion(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("malformed URL, scheme and host are required : {0}")]
    MalformedUrl(String),
    #[error("{0} transmission is not supported for {1} requests")]
    UnsupportedTransmission(&'static str, String),
    #[error("form body could not be serialized : {0}")]
    Form(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignError {
    #[error("required oauth parameters are missing : {}", .0.join(", "))]
    MissingRequiredParameters(Vec<String>),
    #[error("no consumer credential has been supplied")]
    MissingCredential,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    #[error("response is missing the {0} parameter : {1}")]
    MissingParameter(&'static str, String),
    #[error("unexpected response status : {0}")]
    UnexpectedStatus(u16),
}
