use importador_redacoes::ingestion::parse_table;
use importador_redacoes::processing::validate_and_normalize;
use importador_redacoes::types::Value;
use importador_redacoes::ImportError;

use rust_xlsxwriter::Workbook;

const HEADERS: [&str; 5] = [
    "Redacao_ID",
    " arquivo_nome_armazenamento ",
    "Tema",
    "Redacao Texto",
    "co_redacao_grade_id",
];

fn write_header(ws: &mut rust_xlsxwriter::Worksheet, row: u32) {
    for (col, h) in HEADERS.iter().enumerate() {
        ws.write_string(row, col as u16, *h).unwrap();
    }
}

fn essays_xlsx() -> Vec<u8> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Redacoes").unwrap();
    write_header(ws, 0);

    // row 1: numeric id and grade
    ws.write_number(1, 0, 1).unwrap();
    ws.write_string(1, 1, "a.png").unwrap();
    ws.write_string(1, 2, "Tema A").unwrap();
    ws.write_string(1, 3, "Texto A").unwrap();
    ws.write_number(1, 4, 10).unwrap();

    // row 2: id stored as text, grade missing
    ws.write_string(2, 0, "2").unwrap();
    ws.write_string(2, 1, "b.png").unwrap();
    ws.write_number(2, 2, 2024).unwrap();
    ws.write_string(2, 3, "Texto B").unwrap();

    // row 3: no id at all
    ws.write_string(3, 1, "c.png").unwrap();
    ws.write_string(3, 3, "Texto C").unwrap();

    // row 4: fractional id
    ws.write_number(4, 0, 3.5).unwrap();
    ws.write_string(4, 3, "Texto D").unwrap();

    wb.save_to_buffer().unwrap()
}

#[test]
fn parse_xlsx_keeps_cell_types() {
    let table = parse_table(&essays_xlsx(), "redacoes.xlsx").unwrap();

    assert_eq!(
        table.columns,
        vec![
            "redacao_id",
            "arquivo_nome_armazenamento",
            "tema",
            "redacao_texto",
            "co_redacao_grade_id",
        ]
    );
    assert_eq!(table.row_count(), 4);
    // Numeric cells may come back as floats or ints depending on how the writer stored them.
    let id = &table.rows[0][0];
    assert!(*id == Value::Int64(1) || *id == Value::Float64(1.0), "{id:?}");
    assert_eq!(table.rows[1][0], Value::Utf8("2".to_string()));
    assert_eq!(table.rows[1][4], Value::Null);
    assert_eq!(table.rows[2][0], Value::Null);
}

#[test]
fn xlsx_rows_validate_like_csv_rows() {
    let table = parse_table(&essays_xlsx(), "redacoes.xlsx").unwrap();
    let batch = validate_and_normalize(&table).unwrap();

    assert_eq!(batch.len(), 2);
    assert_eq!(batch.report.dropped_blank_id, 1);
    assert_eq!(batch.report.dropped_invalid_id, 1);

    assert_eq!(batch.rows[0].redacao_id, 1);
    assert_eq!(batch.rows[0].co_redacao_grade_id, Some(10));
    assert_eq!(batch.rows[1].redacao_id, 2);
    assert_eq!(batch.rows[1].tema, "2024");
    assert_eq!(batch.rows[1].co_redacao_grade_id, None);
}

#[test]
fn header_row_may_follow_blank_rows() {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    write_header(ws, 2);
    ws.write_number(3, 0, 7).unwrap();
    ws.write_string(3, 3, "Texto").unwrap();
    let bytes = wb.save_to_buffer().unwrap();

    let table = parse_table(&bytes, "planilha.xlsx").unwrap();
    assert_eq!(table.columns[0], "redacao_id");
    assert_eq!(table.row_count(), 1);
}

#[test]
fn only_the_first_sheet_is_read() {
    let mut wb = Workbook::new();
    let ws1 = wb.add_worksheet();
    write_header(ws1, 0);
    ws1.write_number(1, 0, 1).unwrap();

    let ws2 = wb.add_worksheet();
    write_header(ws2, 0);
    ws2.write_number(1, 0, 2).unwrap();
    ws2.write_number(2, 0, 3).unwrap();

    let bytes = wb.save_to_buffer().unwrap();
    let table = parse_table(&bytes, "duas_abas.xlsx").unwrap();
    assert_eq!(table.row_count(), 1);
}

#[test]
fn empty_sheet_reports_missing_columns() {
    let mut wb = Workbook::new();
    wb.add_worksheet();
    let bytes = wb.save_to_buffer().unwrap();

    let table = parse_table(&bytes, "vazia.xlsx").unwrap();
    assert!(table.columns.is_empty());

    let err = validate_and_normalize(&table).unwrap_err();
    match err {
        ImportError::MissingColumns { missing } => assert_eq!(missing.len(), 5),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn garbage_bytes_are_malformed() {
    let err = parse_table(b"definitely not a workbook", "lote.xlsx").unwrap_err();
    match err {
        ImportError::MalformedInput { message } => {
            assert!(message.contains("not a readable spreadsheet"), "{message}")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
