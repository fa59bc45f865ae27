// src/process/mod.rs
pub mod convert;
pub mod date_parser;
pub mod raw_table;
pub mod schema;
pub mod utils;

pub use raw_table::RawTable;

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use std::{collections::HashMap, fs::File, io::Read, path::Path};
use tracing::debug;

/// Open `csv_path` and read it into a [`RawTable`].
///
/// The first record is the header row. Every following record must have
/// the same number of fields; a ragged row fails the whole read.
#[tracing::instrument(level = "debug", skip(csv_path), fields(path = %csv_path.as_ref().display()))]
pub fn read_csv<P: AsRef<Path>>(csv_path: P) -> Result<RawTable> {
    let path = csv_path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open CSV file: {:?}", path))?;
    read_csv_from(file).with_context(|| format!("Failed to parse CSV file: {:?}", path))
}

/// Same as [`read_csv`], over any reader.
pub fn read_csv_from<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let header_record = rdr.headers().context("reading header row")?.clone();
    if header_record.is_empty() {
        bail!("no header row");
    }
    let headers = normalize_headers(header_record.iter());

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        // +2: 1-based, and the header is line 1
        let record = result.with_context(|| format!("CSV parse error at row {}", idx + 2))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    debug!(columns = headers.len(), rows = rows.len(), "parsed CSV");

    Ok(RawTable { headers, rows })
}

/// Names are kept as written, minus a leading byte-order mark. Blank names
/// become `Unnamed: <i>`; a repeat of an earlier name gets the next free
/// `.1`, `.2`, ... suffix, left to right.
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for (i, h) in raw.enumerate() {
        let mut name = match h.trim_start_matches('\u{feff}') {
            "" => format!("Unnamed: {}", i),
            n => n.to_string(),
        };
        let mut seen = counts.get(&name).copied().unwrap_or(0);
        while seen > 0 {
            counts.insert(name.clone(), seen + 1);
            name = format!("{}.{}", name, seen);
            seen = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), 1);
        out.push(name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,csvload::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    #[test]
    fn reads_headers_and_rows_in_order() -> Result<()> {
        init_test_logging();
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "a,b,c\n1,2,3\n4,5,6\n")?;

        let table = read_csv(tmp.path())?;
        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(
            table.rows,
            vec![vec!["1", "2", "3"], vec!["4", "5", "6"]]
        );
        Ok(())
    }

    #[test]
    fn header_only_file_has_no_rows() -> Result<()> {
        let table = read_csv_from("Book_ID,Title,Price\n".as_bytes())?;
        assert_eq!(table.headers, vec!["Book_ID", "Title", "Price"]);
        assert_eq!(table.num_rows(), 0);
        Ok(())
    }

    #[test]
    fn quoted_fields_keep_commas() -> Result<()> {
        let table = read_csv_from("id,title\n1,\"Dune, Messiah\"\n".as_bytes())?;
        assert_eq!(table.rows[0][1], "Dune, Messiah");
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_csv("/definitely/not/here/books.csv").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open CSV file"));
    }

    #[test]
    fn empty_file_is_an_error() {
        assert!(read_csv_from("".as_bytes()).is_err());
    }

    #[test]
    fn ragged_row_is_an_error() {
        let err = read_csv_from("a,b\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("row 3"));
    }

    #[test]
    fn duplicate_and_blank_headers_are_renamed() -> Result<()> {
        let table = read_csv_from("id,,id,id.1\n1,2,3,4\n".as_bytes())?;
        assert_eq!(table.headers, vec!["id", "Unnamed: 1", "id.1", "id.1.1"]);

        let table = read_csv_from("a,a,a\n1,2,3\n".as_bytes())?;
        assert_eq!(table.headers, vec!["a", "a.1", "a.2"]);
        Ok(())
    }

    #[test]
    fn header_names_are_kept_verbatim() -> Result<()> {
        let table = read_csv_from("\u{feff}id, Title \n1,Dune\n".as_bytes())?;
        assert_eq!(table.headers, vec!["id", " Title "]);
        Ok(())
    }
}
