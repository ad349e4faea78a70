//! Outbound adapter reading the catalogue spreadsheet from disk.
//!
//! The file is decoded as UTF-8 (a leading byte-order mark is honoured) and
//! falls back to Windows-1252, a superset of Latin-1, when the bytes are not
//! valid UTF-8. Rows shorter than the header are accepted; missing cells read
//! as absent.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::domain::catalogue_import::CatalogueRow;
use crate::domain::ports::{CatalogueSource, CatalogueSourceError};

/// Filesystem-backed catalogue source.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCatalogueSource;

#[async_trait]
impl CatalogueSource for CsvCatalogueSource {
    async fn read_rows(&self, path: &Path) -> Result<Vec<CatalogueRow>, CatalogueSourceError> {
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || read_file(&owned))
            .await
            .map_err(|err| {
                CatalogueSourceError::unreadable(path.display().to_string(), err.to_string())
            })?
    }
}

fn read_file(path: &Path) -> Result<Vec<CatalogueRow>, CatalogueSourceError> {
    let bytes = read_bytes(path).map_err(|err| {
        let shown = path.display().to_string();
        if err.kind() == io::ErrorKind::NotFound {
            CatalogueSourceError::not_found(shown)
        } else {
            CatalogueSourceError::unreadable(shown, err.to_string())
        }
    })?;
    parse_rows(&decode(&bytes))
}

fn read_bytes(path: &Path) -> io::Result<Vec<u8>> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path does not name a file")
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(file_name)
}

/// Decode raw file bytes into text.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let body = bytes.get(bom_len..).unwrap_or_default();
        let (text, _) = encoding.decode_without_bom_handling(body);
        return text;
    }
    UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .unwrap_or_else(|| WINDOWS_1252.decode_without_bom_handling(bytes).0)
}

fn parse_rows(text: &str) -> Result<Vec<CatalogueRow>, CatalogueSourceError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| CatalogueSourceError::malformed(err.to_string()))?
        .iter()
        .map(|header| header.trim().to_owned())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(CatalogueSourceError::malformed("no header row"));
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|err| CatalogueSourceError::malformed(err.to_string()))?;
        let fallback_line = u64::try_from(index).map_or(u64::MAX, |index| index + 2);
        let line = record
            .position()
            .map_or(fallback_line, csv::Position::line);
        let cells: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), value.to_owned()))
            .collect();
        rows.push(CatalogueRow::new(line, cells));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalogue_import::columns;
    use crate::test_support::{CatalogueCsvFixture, catalogue_line};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn reads_rows_with_line_numbers() {
        let fixture = CatalogueCsvFixture::from_lines([
            catalogue_line([
                "Tesla", "Model S", "Electric", "", "1,020 hp", "322 km/h", "2.1 sec", "$89,990",
                "Electric", "5", "1390 Nm",
            ]),
            catalogue_line(["Ford", "Focus", "I4", "", "", "", "", "", "", "", ""]),
        ])
        .expect("fixture");

        let rows = CsvCatalogueSource
            .read_rows(fixture.path())
            .await
            .expect("readable");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line(), 2);
        assert_eq!(rows[0].cell(columns::HORSEPOWER), Some("1,020 hp"));
        assert_eq!(rows[1].line(), 3);
        assert_eq!(rows[1].cell(columns::COMPANY), Some("Ford"));
        assert_eq!(rows[1].cell(columns::FUEL_TYPE), None);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_file_is_not_found() {
        let fixture = CatalogueCsvFixture::from_lines(Vec::<String>::new()).expect("fixture");
        let missing = fixture.path().with_file_name("absent.csv");

        let err = CsvCatalogueSource
            .read_rows(&missing)
            .await
            .expect_err("missing file");

        assert!(matches!(err, CatalogueSourceError::NotFound { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn empty_file_is_malformed() {
        let fixture = CatalogueCsvFixture::from_bytes(b"").expect("fixture");

        let err = CsvCatalogueSource
            .read_rows(fixture.path())
            .await
            .expect_err("empty file");

        assert_eq!(err, CatalogueSourceError::malformed("no header row"));
    }

    #[rstest]
    #[case("")]
    #[case("\n")]
    #[case(" , \n")]
    fn blank_header_rows_are_rejected(#[case] text: &str) {
        assert!(matches!(
            parse_rows(text),
            Err(CatalogueSourceError::Malformed { .. })
        ));
    }

    #[rstest]
    fn latin1_bytes_fall_back_to_windows_1252() {
        let text = decode(b"Company Names\nCitro\xebn\n");
        assert_eq!(text, "Company Names\nCitroën\n");
    }

    #[rstest]
    fn utf8_bom_is_stripped() {
        let text = decode(b"\xEF\xBB\xBFCompany Names\nSkoda\n");
        assert_eq!(text, "Company Names\nSkoda\n");
    }

    #[rstest]
    fn headers_are_trimmed_and_short_rows_tolerated() {
        let rows = parse_rows(" Company Names , Cars Names ,Seats\nBMW,M3\n").expect("parses");
        assert_eq!(rows[0].cell(columns::COMPANY), Some("BMW"));
        assert_eq!(rows[0].cell(columns::CAR_NAME), Some("M3"));
        assert_eq!(rows[0].cell(columns::SEATS), None);
    }

    #[rstest]
    fn quoted_multiline_cells_keep_their_starting_line() {
        let rows = parse_rows("Company Names,Cars Names\n\"Alfa\nRomeo\",Giulia\nFiat,Uno\n")
            .expect("parses");
        assert_eq!(rows[0].line(), 2);
        assert_eq!(rows[1].line(), 4);
    }
}
