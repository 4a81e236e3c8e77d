use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::tally::{io_common::make_default_id, *};

pub fn read_xlsx_sheet(path: &str, cfs: &FileSource) -> BTallyResult<ParsedSheet> {
    let default_id = make_default_id(path);
    let wrange = get_range(path, cfs)?;

    // The range starts at the first non-empty cell of the worksheet.
    let first_row = wrange.start().map(|(r, _)| r as usize).unwrap_or(0);
    let header_row = cfs.header_row_index()?;
    let mut iter = wrange.rows().skip(header_row.saturating_sub(first_row));

    let header: Vec<Option<String>> = match iter.next() {
        Some(row) => row
            .iter()
            .map(|c| match c {
                DataType::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect(),
        None => {
            return Err(Box::new(TallyError::EmptyExcel {
                path: path.to_string(),
            }))
        }
    };
    debug!("read_xlsx_sheet: header: {:?}", header);

    let mut rows: Vec<ParsedResponse> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = header_row.max(first_row) + idx + 2;
        debug!("read_xlsx_sheet: lineno: {:?} row: {:?}", lineno, row);
        let mut cells: Vec<String> = Vec::new();
        for cell in row.iter() {
            let s = cell_to_string(cell).context(ExcelWrongCellTypeSnafu {
                lineno,
                content: format!("{:?}", row),
            })?;
            cells.push(s);
        }
        rows.push(ParsedResponse {
            id: default_id(lineno),
            cells,
        });
    }
    Ok(ParsedSheet { header, rows })
}

/// The text of a cell. Numbers without a fractional part are written as integers.
fn cell_to_string(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) => Some(s.clone()),
        DataType::Empty => Some(String::new()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        DataType::Float(f) => Some(f.to_string()),
        DataType::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn get_range(path: &str, cfs: &FileSource) -> BTallyResult<calamine::Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => Err(Box::new(TallyError::EmptyExcel {
                path: path.to_string(),
            })),
            [(worksheet_name, wrange)] => {
                debug!("get_range: path: {:?} worksheet: {:?}", &path, &worksheet_name);
                Ok(wrange.clone())
            }
            _ => Err(Box::new(TallyError::AmbiguousWorksheet {
                path: path.to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn source(path: &str, header_row: u32, worksheet: Option<&str>) -> FileSource {
        let js = json!({
            "provider": "xlsx",
            "filePath": path,
            "headerRowIndex": header_row,
            "excelWorksheetName": worksheet,
        });
        serde_json::from_value(js).unwrap()
    }

    // A preamble line, the titles on line 2, then three respondents.
    fn write_feedback(path: &str, first_row: u32, extra_worksheet: bool) {
        let mut workbook = Workbook::new();
        {
            let ws = workbook.add_worksheet();
            ws.set_name("Answers").unwrap();
            if first_row == 0 {
                ws.write_string(0, 0, "Workshop feedback export").unwrap();
            }
            ws.write_string(1, 0, "Rating").unwrap();
            ws.write_string(1, 1, "Topics").unwrap();
            ws.write_number(2, 0, 5.0).unwrap();
            ws.write_string(2, 1, "Async;Macros").unwrap();
            ws.write_number(3, 0, 4.0).unwrap();
            ws.write_number(4, 0, 2.5).unwrap();
            ws.write_string(4, 1, r#"["Traits"]"#).unwrap();
        }
        if extra_worksheet {
            let ws = workbook.add_worksheet();
            ws.set_name("Notes").unwrap();
            ws.write_string(0, 0, "Exported by hand").unwrap();
        }
        workbook.save(path).unwrap();
    }

    fn cells(sheet: &ParsedSheet) -> Vec<Vec<&str>> {
        sheet
            .rows
            .iter()
            .map(|r| r.cells.iter().map(|s| s.as_str()).collect())
            .collect()
    }

    #[test]
    fn reads_below_a_preamble() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.xlsx").display().to_string();
        write_feedback(&path, 0, false);

        let sheet = read_xlsx_sheet(&path, &source(&path, 2, None)).unwrap();
        assert_eq!(
            sheet.header,
            vec![Some("Rating".to_string()), Some("Topics".to_string())]
        );
        assert_eq!(
            cells(&sheet),
            vec![
                vec!["5", "Async;Macros"],
                vec!["4", ""],
                vec!["2.5", r#"["Traits"]"#]
            ]
        );
        assert_eq!(sheet.rows[0].id, "feedback.xlsx-00000003");
    }

    #[test]
    fn range_starting_below_the_first_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.xlsx").display().to_string();
        // Without the preamble, the used range starts on line 2.
        write_feedback(&path, 1, false);

        let sheet = read_xlsx_sheet(&path, &source(&path, 2, None)).unwrap();
        assert_eq!(sheet.header[0], Some("Rating".to_string()));
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[1].cells, vec!["4", ""]);
    }

    #[test]
    fn several_worksheets_need_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.xlsx").display().to_string();
        write_feedback(&path, 0, true);

        let res = read_xlsx_sheet(&path, &source(&path, 2, None));
        assert!(matches!(
            res.map_err(|e| *e),
            Err(TallyError::AmbiguousWorksheet { .. })
        ));

        let sheet = read_xlsx_sheet(&path, &source(&path, 2, Some("Answers"))).unwrap();
        assert_eq!(sheet.rows.len(), 3);

        let res = read_xlsx_sheet(&path, &source(&path, 2, Some("Summary")));
        assert!(matches!(
            res.map_err(|e| *e),
            Err(TallyError::EmptyExcel { .. })
        ));
    }

    #[test]
    fn workbook_to_frequency_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.xlsx").display().to_string();
        write_feedback(&path, 0, false);

        let questions = vec![ConfiguredQuestion {
            title: "Topics".to_string(),
            question_type: QuestionType::Checkbox,
            options: None,
        }];
        let sheet = read_xlsx_sheet(&path, &source(&path, 2, None)).unwrap();
        let data = io_common::sheet_to_analytics(&sheet, &questions, &path).unwrap();
        assert_eq!(data.total_responses, 3);
        assert_eq!(
            data.questions[0].answers,
            vec![r#"["Async","Macros"]"#, r#"["Traits"]"#]
        );
    }

    #[test]
    fn cell_text() {
        assert_eq!(cell_to_string(&DataType::Float(3.0)), Some("3".to_string()));
        assert_eq!(cell_to_string(&DataType::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(cell_to_string(&DataType::Int(7)), Some("7".to_string()));
        assert_eq!(cell_to_string(&DataType::Empty), Some("".to_string()));
        assert_eq!(
            cell_to_string(&DataType::String("Red".to_string())),
            Some("Red".to_string())
        );
        assert_eq!(cell_to_string(&DataType::Bool(true)), Some("true".to_string()));
    }
}
