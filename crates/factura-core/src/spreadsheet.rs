use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::error::FacturaError;
use crate::model::{ExtractionResult, FieldValue};

/// Sheet names in workbook order, one per schema group.
pub const SHEET_NAMES: [&str; 4] = ["Cliente", "Factura", "Lecturas", "Totales"];

/// Render an extraction result as a four-sheet workbook in memory.
///
/// Each sheet carries its fixed Spanish headers in row 0 and exactly one
/// data row; absent fields become empty cells, never an error.
pub fn render_workbook(result: &ExtractionResult) -> Result<Vec<u8>, FacturaError> {
    build_workbook(result)
        .and_then(|mut wb| wb.save_to_buffer())
        .map_err(|e| FacturaError::Spreadsheet(e.to_string()))
}

fn build_workbook(result: &ExtractionResult) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();

    let customer = &result.customer_info;
    write_sheet(
        workbook.add_worksheet(),
        "Cliente",
        &[
            ("Nombre", field(&customer.customer_name)),
            ("Dirección", field(&customer.supply_address)),
            (
                "Tipo de Tarifa",
                customer.tariff_type.map(|t| t.to_string()).unwrap_or_default(),
            ),
        ],
    )?;

    let billing = &result.billing_info;
    write_sheet(
        workbook.add_worksheet(),
        "Factura",
        &[
            ("Fecha de Emisión", field(&billing.issue_date)),
            ("Fecha de Vencimiento", field(&billing.due_date)),
        ],
    )?;

    write_sheet(
        workbook.add_worksheet(),
        "Lecturas",
        &[(
            "Consumo Total (kWh)",
            field(&result.meter_readings.consumed_kwh),
        )],
    )?;

    write_sheet(
        workbook.add_worksheet(),
        "Totales",
        &[("Total Facturado", field(&result.totals.total_billed))],
    )?;

    Ok(workbook)
}

fn field(value: &Option<FieldValue>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn write_sheet(
    sheet: &mut Worksheet,
    name: &str,
    columns: &[(&str, String)],
) -> Result<(), XlsxError> {
    sheet.set_name(name)?;
    for (col, (header, value)) in columns.iter().enumerate() {
        let col = col as u16;
        sheet.write_string(0, col, *header)?;
        sheet.write_string(1, col, value.as_str())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldValue, TariffType};
    use calamine::{Reader, Xlsx};
    use std::io::Cursor;

    fn open(buf: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        calamine::open_workbook_from_rs(Cursor::new(buf)).unwrap()
    }

    fn cell(workbook: &mut Xlsx<Cursor<Vec<u8>>>, sheet: &str, row: u32, col: u32) -> String {
        let range = workbook.worksheet_range(sheet).unwrap();
        range
            .get_value((row, col))
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    fn sample() -> ExtractionResult {
        let mut result = ExtractionResult::default();
        result.customer_info.customer_name = Some(FieldValue::Text("Juan Pérez".into()));
        result.customer_info.supply_address = Some(FieldValue::Text("Av. Corrientes 1234".into()));
        result.customer_info.tariff_type = Some(TariffType::Residencial);
        result.billing_info.issue_date = Some(FieldValue::Text("01/03/2024".into()));
        result.billing_info.due_date = Some(FieldValue::Text("15/03/2024".into()));
        result.meter_readings.consumed_kwh = Some(FieldValue::Text("350".into()));
        result.totals.total_billed = Some(FieldValue::Text("12.345,67".into()));
        result
    }

    #[test]
    fn four_sheets_in_schema_order() {
        let buf = render_workbook(&sample()).unwrap();
        let workbook = open(buf);
        assert_eq!(workbook.sheet_names(), SHEET_NAMES);
    }

    #[test]
    fn headers_and_values_land_in_place() {
        let buf = render_workbook(&sample()).unwrap();
        let mut workbook = open(buf);
        assert_eq!(cell(&mut workbook, "Cliente", 0, 0), "Nombre");
        assert_eq!(cell(&mut workbook, "Cliente", 0, 2), "Tipo de Tarifa");
        assert_eq!(cell(&mut workbook, "Cliente", 1, 0), "Juan Pérez");
        assert_eq!(cell(&mut workbook, "Cliente", 1, 2), "Residencial");
        assert_eq!(cell(&mut workbook, "Factura", 0, 1), "Fecha de Vencimiento");
        assert_eq!(cell(&mut workbook, "Factura", 1, 1), "15/03/2024");
        assert_eq!(cell(&mut workbook, "Lecturas", 0, 0), "Consumo Total (kWh)");
        assert_eq!(cell(&mut workbook, "Lecturas", 1, 0), "350");
        assert_eq!(cell(&mut workbook, "Totales", 1, 0), "12.345,67");
    }

    #[test]
    fn all_null_result_still_yields_one_data_row_per_sheet() {
        let buf = render_workbook(&ExtractionResult::default()).unwrap();
        let mut workbook = open(buf);
        for name in SHEET_NAMES {
            let range = workbook.worksheet_range(name).unwrap();
            // header row + one (empty) data row
            assert_eq!(range.height(), 2, "sheet {name}");
        }
        assert_eq!(cell(&mut workbook, "Totales", 1, 0), "");
    }

    #[test]
    fn numeric_field_values_render_textually() {
        let mut result = ExtractionResult::default();
        result.meter_readings.consumed_kwh = Some(FieldValue::Number(350.0));
        let buf = render_workbook(&result).unwrap();
        let mut workbook = open(buf);
        assert_eq!(cell(&mut workbook, "Lecturas", 1, 0), "350");
    }
}
