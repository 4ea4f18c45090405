use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Error codes for the dashboard core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[repr(i32)]
pub enum ErrCode {
    // Parameter errors (0-99)
    #[strum(serialize = "_PARAM_ERR_BEGIN")]
    ParamErrBegin = 0,
    #[strum(serialize = "COMMON_ERROR")]
    CommonError = 1,
    #[strum(serialize = "INVALID_ARGUMENT")]
    InvalidArgument = 2,
    #[strum(serialize = "PARA_ERROR")]
    ParaError = 5,
    #[strum(serialize = "CONFIG_ERROR")]
    ConfigError = 17,
    #[strum(serialize = "CALLBACK_ERROR")]
    CallbackError = 20,
    #[strum(serialize = "_PARAM_ERR_END")]
    ParamErrEnd = 99,

    // Data errors (200-299)
    #[strum(serialize = "_DATA_ERR_BEGIN")]
    DataErrBegin = 200,
    #[strum(serialize = "SRC_DATA_NOT_FOUND")]
    SrcDataNotFound = 201,
    #[strum(serialize = "SRC_DATA_FORMAT_ERROR")]
    SrcDataFormatError = 202,
    #[strum(serialize = "SERIES_NOT_MONOTONOUS")]
    SeriesNotMonotonous = 203,
    #[strum(serialize = "LENGTH_MISMATCH")]
    LengthMismatch = 204,
    #[strum(serialize = "NO_DATA")]
    NoData = 210,
    #[strum(serialize = "_DATA_ERR_END")]
    DataErrEnd = 299,
}

impl ErrCode {
    pub fn is_param_err(&self) -> bool {
        let code = *self as i32;
        code > Self::ParamErrBegin as i32 && code < Self::ParamErrEnd as i32
    }

    pub fn is_data_err(&self) -> bool {
        let code = *self as i32;
        code > Self::DataErrBegin as i32 && code < Self::DataErrEnd as i32
    }
}

#[derive(Debug, Error)]
#[error("{errcode}: {msg}")]
pub struct DashError {
    pub errcode: ErrCode,
    pub msg: String,
}

impl DashError {
    pub fn new(message: impl Into<String>, code: ErrCode) -> Self {
        Self {
            errcode: code,
            msg: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(message, ErrCode::InvalidArgument)
    }

    pub fn is_param_err(&self) -> bool {
        self.errcode.is_param_err()
    }

    pub fn is_data_err(&self) -> bool {
        self.errcode.is_data_err()
    }
}

impl From<std::io::Error> for DashError {
    fn from(err: std::io::Error) -> Self {
        let code = if err.kind() == std::io::ErrorKind::NotFound {
            ErrCode::SrcDataNotFound
        } else {
            ErrCode::CommonError
        };
        Self::new(err.to_string(), code)
    }
}

impl From<csv::Error> for DashError {
    fn from(err: csv::Error) -> Self {
        Self::new(err.to_string(), ErrCode::SrcDataFormatError)
    }
}

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string(), ErrCode::ConfigError)
    }
}

pub type DashResult<T> = Result<T, DashError>;
