// Primitives for reading CSV files.

use std::fs::File;

use crate::tally::{io_common::make_default_id, *};

pub fn read_csv_sheet(path: &str, cfs: &FileSource) -> BTallyResult<ParsedSheet> {
    let default_id = make_default_id(path);
    let (mut records, header_row) = get_records(path, cfs)?;

    let header_line = match records.next() {
        Some(line_r) => line_r.context(CsvLineParseSnafu {
            lineno: header_row + 1,
        })?,
        None => {
            warn!("read_csv_sheet: {}: no header row", path);
            return Ok(ParsedSheet {
                header: Vec::new(),
                rows: Vec::new(),
            });
        }
    };
    let header: Vec<Option<String>> = header_line.iter().map(|s| Some(s.to_string())).collect();
    debug!("read_csv_sheet: header: {:?}", header);

    let mut rows: Vec<ParsedResponse> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        // Lines are numbered from 1, and the header is on its own line.
        let lineno = idx + header_row + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_sheet: lineno: {:?} row: {:?}", lineno, line);
        rows.push(ParsedResponse {
            id: default_id(lineno),
            cells: line.iter().map(|s| s.to_string()).collect(),
        });
    }
    Ok(ParsedSheet { header, rows })
}

fn get_records(path: &str, cfs: &FileSource) -> BTallyResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let header_row = cfs.header_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    for _ in 0..header_row {
        _ = records.next();
    }
    Ok((records, header_row))
}
