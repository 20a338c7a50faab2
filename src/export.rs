/// CSV output for both converters.
///
/// Writes a header row followed by body rows. The output file is owned by
/// the csv writer inside `write_csv`, so it is closed on every return path,
/// including an error halfway through the body. A failure after the header
/// can leave a partial file behind; nothing cleans it up.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::model::ConvertError;

/// Writes `header` and then every row to `writer`. Returns the number of
/// body rows written.
pub fn write_records<W, H, R, F>(
    writer: W,
    header: &[H],
    rows: impl IntoIterator<Item = R>,
) -> Result<usize, ConvertError>
where
    W: Write,
    H: AsRef<[u8]>,
    R: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(header)?;

    let mut count = 0;
    for row in rows {
        wtr.write_record(row)?;
        count += 1;
    }

    wtr.flush()?;
    Ok(count)
}

/// Creates (or truncates) `path` and writes the table to it. The parent
/// directory is created if missing.
pub fn write_csv<P, H, R, F>(
    path: P,
    header: &[H],
    rows: impl IntoIterator<Item = R>,
) -> Result<usize, ConvertError>
where
    P: AsRef<Path>,
    H: AsRef<[u8]>,
    R: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let count = write_records(file, header, rows)?;
    tracing::debug!("Wrote {} rows to {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_records_header_and_rows() {
        let mut buf = Vec::new();
        let count = write_records(
            &mut buf,
            &["date", "state", "max_temp"],
            vec![
                vec!["2001-01-01".to_string(), "Alabama".to_string(), "51.90".to_string()],
                vec!["2001-02-01".to_string(), "Alabama".to_string(), String::new()],
            ],
        )
        .unwrap();

        assert_eq!(count, 2);
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "date,state,max_temp\n2001-01-01,Alabama,51.90\n2001-02-01,Alabama,\n"
        );
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut buf = Vec::new();
        write_records(&mut buf, &["name"], vec![vec!["Phil, the Seer"]]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "name\n\"Phil, the Seer\"\n");
    }

    #[test]
    fn test_header_only_when_no_rows() {
        let mut buf = Vec::new();
        let count = write_records(&mut buf, &["a", "b"], Vec::<Vec<String>>::new()).unwrap();
        assert_eq!(count, 0);
        assert_eq!(String::from_utf8(buf).unwrap(), "a,b\n");
    }

    #[test]
    fn test_write_csv_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gen").join("out.csv");

        let count = write_csv(&path, &["x"], vec![vec!["1"], vec!["2"]]).unwrap();
        assert_eq!(count, 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "x\n1\n2\n");
    }
}
