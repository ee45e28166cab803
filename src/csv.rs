use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::coins::Denomination;
use crate::{Amount, Command, Product};

/// Errors that can occur when loading csv files
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: {value} is not an accepted coin denomination")]
    UnknownDenomination { line: usize, value: u64 },

    #[error("line {line}: unrecognized action '{action}'")]
    UnrecognizedAction { line: usize, action: String },

    #[error("line {line}: {action} missing argument")]
    MissingArgument { line: usize, action: String },
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    key: Option<String>,
    name: String,
    price: u64,
    stock: u32,
}

#[derive(Debug, Deserialize)]
struct CoinRow {
    denomination: u64,
    count: u32,
}

#[derive(Debug, Deserialize)]
struct SessionRow {
    action: String,
    arg: Option<String>,
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, CsvError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CsvError::Open {
            path: path.display().to_string(),
            source,
        })
}

/// 1-indexed, skip header
fn line_of(idx: usize) -> usize {
    idx + 2
}

/// Read a product catalog (`key,name,price,stock`, price in minor units).
///
/// An empty key is derived from the product name.
pub fn read_catalog(path: impl AsRef<Path>) -> Result<Vec<Product>, CsvError> {
    open(path.as_ref())?
        .into_deserialize::<CatalogRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result.map_err(|source| CsvError::Parse {
                line: line_of(idx),
                source,
            })?;
            let product = Product::new(row.name, Amount::from_minor(row.price), row.stock);
            Ok(match row.key {
                Some(key) => product.with_key(&key),
                None => product,
            })
        })
        .collect()
}

/// Read the initial coin stock (`denomination,count`, denomination in minor units).
///
/// Rows come back in file order, which is also the order change is listed in.
pub fn read_coins(path: impl AsRef<Path>) -> Result<Vec<(Denomination, u32)>, CsvError> {
    open(path.as_ref())?
        .into_deserialize::<CoinRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = line_of(idx);
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            let denomination = Denomination::from_value(Amount::from_minor(row.denomination))
                .ok_or(CsvError::UnknownDenomination {
                    line,
                    value: row.denomination,
                })?;
            Ok((denomination, row.count))
        })
        .collect()
}

/// Read a session script (`action,arg`), one customer command per row
pub fn read_session(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Command, CsvError>>, CsvError> {
    let reader = open(path.as_ref())?;

    Ok(reader
        .into_deserialize::<SessionRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = line_of(idx);
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            let action = row.action.to_lowercase();
            let arg = |action: &str| {
                row.arg.clone().ok_or_else(|| CsvError::MissingArgument {
                    line,
                    action: action.to_string(),
                })
            };
            match action.as_str() {
                "select" => Ok(Command::Select(arg("select")?)),
                "insert" => Ok(Command::Insert(arg("insert")?)),
                "change" => Ok(Command::Change(arg("change")?)),
                "display" => Ok(Command::Display),
                _ => Err(CsvError::UnrecognizedAction {
                    line,
                    action: row.action.clone(),
                }),
            }
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn read_catalog_rows() {
        let file = write_csv(
            "key,name,price,stock\n\
             coca-cola,Coca Cola,100,15\n\
             ,The Cake,400,3\n",
        );
        let products = read_catalog(file.path()).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].key.as_str(), "coca-cola");
        assert_eq!(products[0].price, Amount::from_minor(100));
        assert_eq!(products[1].key.as_str(), "the-cake");
        assert_eq!(products[1].stock, 3);
    }

    #[test]
    fn read_catalog_with_whitespace() {
        let file = write_csv("key, name, price, stock\nbigmac, BigMac, 250, 0\n");
        let products = read_catalog(file.path()).unwrap();
        assert_eq!(products[0].name, "BigMac");
        assert_eq!(products[0].stock, 0);
    }

    #[test]
    fn read_catalog_reports_bad_line() {
        let file = write_csv("key,name,price,stock\nwater,Water,cheap,1\n");
        let err = read_catalog(file.path()).unwrap_err();
        assert!(matches!(err, CsvError::Parse { line: 2, .. }));
    }

    #[test]
    fn read_coins_rows() {
        let file = write_csv("denomination,count\n50,1\n25,2\n25,1\n500,0\n");
        let coins = read_coins(file.path()).unwrap();
        assert_eq!(
            coins,
            [
                (Denomination::Cents50, 1),
                (Denomination::Cents25, 2),
                (Denomination::Cents25, 1),
                (Denomination::Dollar5, 0),
            ]
        );
    }

    #[test]
    fn read_coins_rejects_unknown_denomination() {
        let file = write_csv("denomination,count\n50,1\n10,4\n");
        let err = read_coins(file.path()).unwrap_err();
        assert!(matches!(
            err,
            CsvError::UnknownDenomination { line: 3, value: 10 }
        ));
    }

    #[test]
    fn read_missing_file() {
        let err = read_coins("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, CsvError::Open { .. }));
    }

    #[test]
    fn read_session_commands() {
        let file = write_csv(
            "action,arg\n\
             select,Coca Cola\n\
             insert,$0.5\n\
             change,the-cake\n\
             display,\n",
        );
        let commands: Vec<_> = read_session(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            commands,
            [
                Command::Select("Coca Cola".into()),
                Command::Insert("$0.5".into()),
                Command::Change("the-cake".into()),
                Command::Display,
            ]
        );
    }

    #[test]
    fn read_session_iterator_outlives_path() {
        let file = write_csv("action,arg\nselect,bigmac\ndisplay,\n");
        let path = file.path().to_string_lossy().into_owned();
        let commands = read_session(path).unwrap();

        let count = std::thread::spawn(move || commands.count()).join().unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn read_session_returns_error_for_unknown_action() {
        let file = write_csv("action,arg\nrefund,\n");
        let results: Vec<_> = read_session(file.path()).unwrap().collect();
        assert_eq!(results.len(), 1);
        let err = results[0].as_ref().unwrap_err();
        assert!(matches!(err, CsvError::UnrecognizedAction { line: 2, .. }));
    }

    #[test]
    fn read_session_returns_error_for_missing_argument() {
        let file = write_csv("action,arg\ninsert,\nselect,bigmac\n");
        let results: Vec<_> = read_session(file.path()).unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[0].as_ref().unwrap_err(),
            CsvError::MissingArgument { line: 2, .. }
        ));
        assert!(results[1].is_ok());
    }
}
