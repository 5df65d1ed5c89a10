//! errors.rs
//! Errores tipados de las fuentes de datos (SQL Server / CSV).

use std::io;

use thiserror::Error;

/// Fallos al leer un conjunto desde la BD o desde CSV.
#[derive(Debug, Error)]
pub enum FuenteError {
    #[error("conjunto '{conjunto}': falta la columna '{columna}'")]
    ColumnaFaltante { conjunto: String, columna: String },
    #[error("sql server: {0}")]
    Sql(#[from] tiberius::error::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
