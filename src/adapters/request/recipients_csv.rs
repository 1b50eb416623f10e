//! Extra explicit addresses from a CSV export. Uses the `csv` crate.
//!
//! Any cell containing `@` is taken as an address; headers and other columns
//! are ignored. Shape checks happen later, in the resolver.

use crate::domain::DomainError;
use std::io::Read;
use std::path::Path;

pub fn read_addresses<R: Read>(reader: R) -> Result<Vec<String>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for record in rdr.records() {
        let record = record?;
        out.extend(
            record
                .iter()
                .filter(|cell| cell.contains('@'))
                .map(str::to_string),
        );
    }
    Ok(out)
}

pub fn load_addresses(path: impl AsRef<Path>) -> Result<Vec<String>, DomainError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| DomainError::Request(format!("open {}: {}", path.display(), e)))?;
    read_addresses(file)
        .map_err(|e| DomainError::Request(format!("parse {}: {}", path.display(), e)))
}
