//! Temporary catalogue CSV files.

use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use tempfile::TempDir;

/// Header line of the catalogue spreadsheet, in the order of
/// [`catalogue_line`]'s fields.
pub const CATALOGUE_HEADER: &str = "Company Names,Cars Names,Engines,CC/Battery Capacity,\
HorsePower,Total Speed,Performance(0 - 100 )KM/H,Cars Prices,Fuel Types,Seats,Torque";

const FILE_NAME: &str = "catalogue.csv";

/// Render one data line, quoting cells that need it.
///
/// Field order: company, car, engine, cc, horsepower, top speed,
/// acceleration, price, fuel type, seats, torque.
pub fn catalogue_line(fields: [&str; 11]) -> String {
    fields
        .iter()
        .map(|field| {
            if field.contains([',', '"', '\n']) {
                format!("\"{}\"", field.replace('"', "\"\""))
            } else {
                (*field).to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// A catalogue file inside its own temporary directory.
#[derive(Debug)]
pub struct CatalogueCsvFixture {
    _dir: TempDir,
    path: PathBuf,
}

impl CatalogueCsvFixture {
    /// Write raw bytes, for encoding tests.
    pub fn from_bytes(contents: &[u8]) -> io::Result<Self> {
        let dir = TempDir::new()?;
        let root = Dir::open_ambient_dir(dir.path(), ambient_authority())?;
        root.write(FILE_NAME, contents)?;
        let path = dir.path().join(FILE_NAME);
        Ok(Self { _dir: dir, path })
    }

    /// Write the standard header followed by `lines`.
    pub fn from_lines<I, S>(lines: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut contents = String::from(CATALOGUE_HEADER);
        contents.push('\n');
        for line in lines {
            contents.push_str(line.as_ref());
            contents.push('\n');
        }
        Self::from_bytes(contents.as_bytes())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_with_commas_are_quoted() {
        let line = catalogue_line([
            "Tesla", "Model S", "Electric", "", "1,020 hp", "", "", "$89,990", "", "5", "",
        ]);
        assert_eq!(line, "Tesla,Model S,Electric,,\"1,020 hp\",,,\"$89,990\",,5,");
    }

    #[test]
    fn fixture_file_starts_with_header() {
        let fixture = CatalogueCsvFixture::from_lines(["a,b"]).expect("fixture");
        let dir = Dir::open_ambient_dir(
            fixture.path().parent().expect("parent"),
            ambient_authority(),
        )
        .expect("open dir");
        let written = dir.read_to_string(FILE_NAME).expect("read back");
        assert!(written.starts_with("Company Names,"));
        assert!(written.ends_with("a,b\n"));
    }
}
