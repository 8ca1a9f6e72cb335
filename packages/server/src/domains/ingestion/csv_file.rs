//! CSV structure: header normalization, column aliases and raw row extraction.

use csv::{ReaderBuilder, StringRecord, Trim};
use facility_filters::parse_tag_list;

use super::error::IngestError;
use super::report::SkippedRow;

const COMPANY_ALIASES: &[&str] = &["company_name", "company", "companyname"];
const COLOR_ALIASES: &[&str] = &["legend_color", "color", "legendcolor"];
const ADDRESS_ALIASES: &[&str] = &["address", "full_address", "fulladdress"];
const LATITUDE_ALIASES: &[&str] = &["latitude", "lat"];
const LONGITUDE_ALIASES: &[&str] = &["longitude", "lng", "lon", "long"];
const TAGS_ALIASES: &[&str] = &["tags", "tag"];
const NAME_ALIASES: &[&str] = &["facility_name", "facilityname", "name"];
const CITY_ALIASES: &[&str] = &["city"];
const STATE_ALIASES: &[&str] = &["state", "state_code", "province"];
const ZIP_ALIASES: &[&str] = &["zip_code", "zip", "zipcode", "postal_code"];

/// Lowercase, spaces to underscores, drop everything but `[a-z0-9_]`.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    company_name: usize,
    legend_color: usize,
    address: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    tags: Option<usize>,
    name: Option<usize>,
    city: Option<usize>,
    state: Option<usize>,
    zip_code: Option<usize>,
}

fn find(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

impl Columns {
    pub fn resolve(headers: &[String]) -> Result<Self, IngestError> {
        let company_name = find(headers, COMPANY_ALIASES);
        let legend_color = find(headers, COLOR_ALIASES);
        let address = find(headers, ADDRESS_ALIASES);
        let latitude = find(headers, LATITUDE_ALIASES);
        let longitude = find(headers, LONGITUDE_ALIASES);

        let mut missing = Vec::new();
        if company_name.is_none() {
            missing.push("company_name (or company, companyname)".to_string());
        }
        if legend_color.is_none() {
            missing.push("legend_color (or color, legendcolor)".to_string());
        }
        if address.is_none() && (latitude.is_none() || longitude.is_none()) {
            missing.push(
                "address (or full_address), or both latitude (lat) and longitude (lng, lon)"
                    .to_string(),
            );
        }

        match (company_name, legend_color) {
            (Some(company_name), Some(legend_color)) if missing.is_empty() => Ok(Self {
                company_name,
                legend_color,
                address,
                latitude,
                longitude,
                tags: find(headers, TAGS_ALIASES),
                name: find(headers, NAME_ALIASES),
                city: find(headers, CITY_ALIASES),
                state: find(headers, STATE_ALIASES),
                zip_code: find(headers, ZIP_ALIASES),
            }),
            _ => Err(IngestError::MissingColumns(missing)),
        }
    }
}

/// One data row as text, before validation. Blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// Line in the file; the header is row 1
    pub row: usize,
    pub company_name: Option<String>,
    pub legend_color: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub tags: Vec<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

fn cell(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Tags cell as either `a, b` or an array literal like `["a", "b"]`.
pub fn parse_tags_cell(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let inner = raw
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .unwrap_or(raw);

    parse_tag_list(inner)
        .into_iter()
        .map(|t| t.trim_matches(|c| c == '"' || c == '\'').trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

impl Columns {
    fn extract(&self, row: usize, record: &StringRecord) -> RawRow {
        RawRow {
            row,
            company_name: cell(record, Some(self.company_name)),
            legend_color: cell(record, Some(self.legend_color)),
            address: cell(record, self.address),
            latitude: cell(record, self.latitude),
            longitude: cell(record, self.longitude),
            tags: cell(record, self.tags)
                .map(|t| parse_tags_cell(&t))
                .unwrap_or_default(),
            name: cell(record, self.name),
            city: cell(record, self.city),
            state: cell(record, self.state),
            zip_code: cell(record, self.zip_code),
        }
    }
}

/// Rows read from a file, plus the lines that could not be decoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCsv {
    pub rows: Vec<RawRow>,
    pub unreadable: Vec<SkippedRow>,
}

impl ParsedCsv {
    /// Data rows seen, decodable or not.
    pub fn total_rows(&self) -> usize {
        self.rows.len() + self.unreadable.len()
    }
}

/// Parse the whole file. Structural problems fail here, before any row is
/// geocoded or written. Fully blank lines are dropped and a row that is not
/// valid UTF-8 is set aside without touching its neighbours.
pub fn parse_csv(bytes: &[u8]) -> Result<ParsedCsv, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::Unparsable(e.to_string()))?
        .iter()
        .map(normalize_header)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(IngestError::Unparsable("missing header row".into()));
    }

    let columns = Columns::resolve(&headers)?;

    let mut parsed = ParsedCsv::default();
    for (index, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|e| IngestError::Unparsable(e.to_string()))?;
        if record.iter().all(|v| v.trim_ascii().is_empty()) {
            continue;
        }
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 2);

        match StringRecord::from_byte_record(record) {
            Ok(record) => parsed.rows.push(columns.extract(line, &record)),
            Err(e) => parsed.unreadable.push(SkippedRow {
                row: line,
                reason: format!(
                    "Row is not valid UTF-8 (column {})",
                    e.utf8_error().field() + 1
                ),
            }),
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" Company Name "), "company_name");
        assert_eq!(normalize_header("Legend-Color"), "legendcolor");
        assert_eq!(normalize_header("Zip Code (5)"), "zip_code_5");
        assert_eq!(normalize_header("LAT"), "lat");
    }

    #[test]
    fn test_aliases_resolve() {
        let csv = "Company,Color,Lat,Lng,Tags\nAcme,#FF5733,44.9,-93.2,\"cold storage, hazmat\"\n";
        let rows = parse_csv(csv.as_bytes()).unwrap().rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row, 2);
        assert_eq!(rows[0].company_name.as_deref(), Some("Acme"));
        assert_eq!(rows[0].latitude.as_deref(), Some("44.9"));
        assert_eq!(rows[0].tags, vec!["cold storage", "hazmat"]);
        assert!(rows[0].address.is_none());
    }

    #[test]
    fn test_missing_columns_are_listed() {
        let err = parse_csv(b"company_name,latitude\nAcme,44.9\n").unwrap_err();
        match err {
            IngestError::MissingColumns(missing) => {
                assert_eq!(missing.len(), 2);
                assert!(missing[0].starts_with("legend_color"));
                assert!(missing[1].starts_with("address"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_latitude_without_longitude_needs_address() {
        assert!(parse_csv(b"company,color,lat\n").is_err());
        assert!(parse_csv(b"company,color,lat,address\n").is_ok());
    }

    #[test]
    fn test_blank_lines_skipped_and_row_numbers_kept() {
        let csv = "company_name,legend_color,address\nA,#fff,1 Main St\n,,\nB,#000,2 Main St\n";
        let rows = parse_csv(csv.as_bytes()).unwrap().rows;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].row, 4);
        assert_eq!(rows[1].company_name.as_deref(), Some("B"));
    }

    #[test]
    fn test_invalid_utf8_row_is_set_aside() {
        let mut csv = b"company_name,legend_color,address\nA,#fff,1 Main St\n".to_vec();
        csv.extend_from_slice(b"B,#000,\"2 Caf\xE9 St\"\n");
        csv.extend_from_slice(b"C,#123,3 Main St\n");

        let parsed = parse_csv(&csv).unwrap();
        let companies: Vec<_> = parsed
            .rows
            .iter()
            .map(|r| r.company_name.as_deref().unwrap())
            .collect();
        assert_eq!(companies, vec!["A", "C"]);
        assert_eq!(parsed.rows[1].row, 4);
        assert_eq!(parsed.unreadable.len(), 1);
        assert_eq!(parsed.unreadable[0].row, 3);
        assert!(parsed.unreadable[0].reason.contains("column 3"));
        assert_eq!(parsed.total_rows(), 3);
    }

    #[test]
    fn test_empty_file_is_unparsable() {
        assert!(matches!(parse_csv(b""), Err(IngestError::Unparsable(_))));
    }

    #[test]
    fn test_tags_cell_forms() {
        assert_eq!(parse_tags_cell("a, b ,, c"), vec!["a", "b", "c"]);
        assert_eq!(parse_tags_cell(r#"["Cold Storage", 'rail']"#), vec!["Cold Storage", "rail"]);
        assert!(parse_tags_cell("[]").is_empty());
    }
}
