//! Reading the dataset workbook into plain string rows.

use std::collections::HashMap;
use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use tracing::warn;

use super::error::ImportError;

/// Header names of the data sheet, lower-cased.
pub mod columns {
    pub const ID: &str = "id";
    pub const SOURCE: &str = "source";
    pub const PLACENAME: &str = "placename";
    pub const AREA: &str = "area";
    pub const REGION: &str = "province-region";
    pub const PLEIADES: &str = "pleiades";
    pub const PERIOD: &str = "period";
    pub const CATEGORY1: &str = "category 1";
    pub const CATEGORY2: &str = "category 2";
    pub const LANGUAGE: &str = "language";
    pub const SCRIPT: &str = "script";
    pub const CENTURIES: &str = "centuries";
    pub const INSCRIPTIONS_COUNT: &str = "inscriptions-count";
    pub const MENTIONED_PLACENAMES: &str = "mentioned placenames";
    pub const RELIGIOUS_PROFESSION: &str = "mention religious profession";
    pub const SYMBOL: &str = "mention religious symbol";
    pub const COMMENTS: &str = "comments";
    pub const INSCRIPTION: &str = "inscription";
    pub const TRANSCRIPTION: &str = "transcription";
    pub const SEX_DEDICATOR: &str = "sex dedicator";
    pub const SEX_DECEASED: &str = "sex deceased";
}

/// Column of the location sheet holding the latitude text.
pub const LATITUDE_COLUMN: usize = 4;
/// Column of the location sheet holding the longitude text.
pub const LONGITUDE_COLUMN: usize = 5;

/// One data row keyed by header name.
#[derive(Debug, Clone, Default)]
pub struct SheetRow {
    values: HashMap<String, String>,
}

impl SheetRow {
    /// Trimmed cell value, or `""` for absent columns.
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(|v| v.trim()).unwrap_or("")
    }

    pub fn is_blank(&self, column: &str) -> bool {
        self.get(column).is_empty()
    }

    /// Identifier used to look the row up in the location sheet.
    pub fn identifier(&self) -> &str {
        match self.get(columns::ID) {
            "" => self.get(columns::SOURCE),
            id => id,
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SheetRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into().trim().to_lowercase(), v.into()))
                .collect(),
        }
    }
}

/// The data sheet: a header row followed by data rows.
#[derive(Debug, Clone, Default)]
pub struct DataSheet {
    header: Vec<Option<String>>,
    rows: Vec<Vec<String>>,
}

impl DataSheet {
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let header = rows
            .remove(0)
            .into_iter()
            .map(|cell| {
                let name = cell.trim().to_lowercase();
                (!name.is_empty()).then_some(name)
            })
            .collect();
        Self { header, rows }
    }

    /// Data rows in sheet order. Cells under blank header cells are dropped.
    pub fn rows(&self) -> impl Iterator<Item = SheetRow> + '_ {
        self.rows.iter().map(|cells| SheetRow {
            values: self
                .header
                .iter()
                .zip(cells)
                .filter_map(|(name, value)| name.as_ref().map(|n| (n.clone(), value.clone())))
                .collect(),
        })
    }
}

/// Manually entered coordinates, keyed by the first column.
#[derive(Debug, Clone, Default)]
pub struct LocationSheet {
    rows: HashMap<String, Vec<String>>,
}

impl LocationSheet {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let mut by_id = HashMap::new();
        for row in rows {
            let Some(id) = row.first().map(|c| c.trim().to_owned()) else {
                continue;
            };
            if !id.is_empty() {
                by_id.entry(id).or_insert(row);
            }
        }
        Self { rows: by_id }
    }

    pub fn find(&self, identifier: &str) -> Option<&[String]> {
        self.rows.get(identifier.trim()).map(Vec::as_slice)
    }
}

/// Read the data sheet and, if present, the location sheet.
///
/// Blocking; run it off the async runtime.
pub fn read_workbook(
    path: &Path,
    data_sheet: &str,
    location_sheet: &str,
) -> Result<(DataSheet, Option<LocationSheet>), ImportError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| ImportError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;
    let names = workbook.sheet_names();

    if !names.iter().any(|n| n == data_sheet) {
        return Err(ImportError::SheetMissing(data_sheet.to_owned()));
    }
    let data = workbook
        .worksheet_range(data_sheet)
        .map_err(|source| ImportError::Sheet {
            name: data_sheet.to_owned(),
            source,
        })?;

    let locations = if names.iter().any(|n| n == location_sheet) {
        let range = workbook
            .worksheet_range(location_sheet)
            .map_err(|source| ImportError::Sheet {
                name: location_sheet.to_owned(),
                source,
            })?;
        Some(LocationSheet::from_rows(range_rows(&range)))
    } else {
        warn!(sheet = location_sheet, "Location sheet missing, manual coordinates unavailable");
        None
    };

    Ok((DataSheet::from_rows(range_rows(&data)), locations))
}

/// Cell text of every row, aligned so that index 0 is column A.
fn range_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let padding = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    range
        .rows()
        .map(|cells| {
            std::iter::repeat_n(String::new(), padding)
                .chain(cells.iter().map(cell_text))
                .collect()
        })
        .collect()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // Integral numbers come back as floats; keep ids like 48210386 intact.
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
