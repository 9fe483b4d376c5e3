use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::gma::GmaError;
use crate::tpl::TplError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("malformed GMA archive: {0}")]
    Gma(#[from] GmaError),
    #[error("malformed TPL archive: {0}")]
    Tpl(#[from] TplError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
