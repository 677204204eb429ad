//! CSV question-bank importer.
//!
//! Production banks are authored by the content team in spreadsheets and
//! exported as CSV with a `Question ID,Phase,Spectrums,Prompt,Options`
//! header. `Spectrums` is `;`-separated; `Options` encodes the answer scale
//! as `label=weight` pairs joined with `|`.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::assessment::{BankError, QuestionBank};

#[derive(Debug)]
pub enum BankImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, message: String },
    Bank(BankError),
}

impl std::fmt::Display for BankImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BankImportError::Io(err) => write!(f, "failed to read bank export: {}", err),
            BankImportError::Csv(err) => write!(f, "invalid bank CSV data: {}", err),
            BankImportError::Row { line, message } => {
                write!(f, "bank CSV line {}: {}", line, message)
            }
            BankImportError::Bank(err) => write!(f, "bank failed validation: {}", err),
        }
    }
}

impl std::error::Error for BankImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BankImportError::Io(err) => Some(err),
            BankImportError::Csv(err) => Some(err),
            BankImportError::Row { .. } => None,
            BankImportError::Bank(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BankImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BankImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<BankError> for BankImportError {
    fn from(err: BankError) -> Self {
        Self::Bank(err)
    }
}

pub struct QuestionBankImporter;

impl QuestionBankImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<QuestionBank, BankImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<QuestionBank, BankImportError> {
        let questions = parser::parse_records(reader)?;
        Ok(QuestionBank::new(questions)?)
    }
}
