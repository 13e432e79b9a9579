use chrono::{DateTime, TimeZone, Utc};

use super::{Cell, Sheet, Workbook};
use crate::format::{format_date, format_time};
use crate::model::Sale;

const HEADERS: [&str; 9] = [
    "N° Orden",
    "Fecha",
    "Hora",
    "Producto",
    "Precio Unit.",
    "Cantidad",
    "Subtotal",
    "Total Venta",
    "Estado",
];

const WIDTHS: [u16; 9] = [15, 12, 10, 30, 12, 10, 12, 15, 12];

/// Sales without an order number read `N/A`, not their record id.
fn order_cell(sale: &Sale) -> &str {
    sale.order_number
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or("N/A")
}

/// One row per line item; sale-level columns fill only the first row.
///
/// `None` when there is nothing to export.
pub fn sales_workbook<Tz>(sales: &[Sale], tz: &Tz, stem: impl Into<String>) -> Option<Workbook>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if sales.is_empty() {
        return None;
    }

    let mut sheet = Sheet::new("Ventas", &HEADERS).with_widths(&WIDTHS);
    for sale in sales {
        let date = stamp(sale.created_at.as_ref(), |at| format_date(at, tz));
        let time = stamp(sale.created_at.as_ref(), |at| format_time(at, tz));
        let head = [
            Cell::text(order_cell(sale)),
            Cell::text(date),
            Cell::text(time),
        ];
        let tail = [Cell::from(sale.total), Cell::text(sale.status.label())];

        if sale.products.is_empty() {
            let mut row = head.to_vec();
            row.extend([
                Cell::text("Sin productos"),
                Cell::from(0.0),
                Cell::from(0_u32),
                Cell::from(0.0),
            ]);
            row.extend(tail);
            sheet.rows.push(row);
            continue;
        }

        for (i, item) in sale.products.iter().enumerate() {
            let mut row = if i == 0 {
                head.to_vec()
            } else {
                vec![Cell::text(""); 3]
            };
            row.extend([
                Cell::text(item.display_name()),
                Cell::from(item.price),
                Cell::from(item.quantity),
                Cell::from(item.subtotal()),
            ]);
            if i == 0 {
                row.extend(tail.iter().cloned());
            } else {
                row.extend([Cell::text(""), Cell::text("")]);
            }
            sheet.rows.push(row);
        }
    }

    Some(Workbook {
        stem: stem.into(),
        sheets: vec![sheet],
    })
}

pub(super) fn stamp(at: Option<&DateTime<Utc>>, fmt: impl FnOnce(&DateTime<Utc>) -> String) -> String {
    at.map(fmt).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{ProductItem, ProductRef, SaleStatus};

    fn item(name: &str, price: f64, quantity: u32) -> ProductItem {
        ProductItem {
            product_id: ProductRef::Id(format!("id-{name}")),
            name: name.into(),
            price,
            quantity,
            image_url: None,
        }
    }

    fn sale(order: Option<&str>, products: Vec<ProductItem>, status: SaleStatus) -> Sale {
        Sale {
            id: "s-1".into(),
            total: products.iter().map(ProductItem::subtotal).sum(),
            products,
            status,
            order_number: order.map(str::to_owned),
            payment_id: None,
            user_id: None,
            created_at: Some(Utc.with_ymd_and_hms(2026, 3, 5, 15, 4, 9).unwrap()),
            updated_at: None,
        }
    }

    fn rendered(book: &Workbook) -> Vec<Vec<String>> {
        book.sheets[0]
            .rows
            .iter()
            .map(|r| r.iter().map(Cell::render).collect())
            .collect()
    }

    #[test]
    fn empty_input_exports_nothing() {
        assert!(sales_workbook(&[], &Utc, "x").is_none());
    }

    #[test]
    fn sale_fields_only_on_first_line() {
        let sales = [sale(
            Some("ORD-7"),
            vec![item("Mouse", 10.0, 2), item("Pad", 5.0, 1)],
            SaleStatus::Completed,
        )];
        let book = sales_workbook(&sales, &Utc, "ventas_todas_hasta_hoy").unwrap();

        assert_eq!(book.sheets[0].name, "Ventas");
        assert_eq!(book.sheets[0].widths, WIDTHS.to_vec());
        assert_eq!(
            rendered(&book),
            vec![
                vec!["ORD-7", "5/3/2026", "15:04:09", "Mouse", "10", "2", "20", "25", "Completada"],
                vec!["", "", "", "Pad", "5", "1", "5", "", ""],
            ]
        );
    }

    #[test]
    fn sale_without_products_gets_placeholder_row() {
        let sales = [sale(None, Vec::new(), SaleStatus::Pending)];
        let book = sales_workbook(&sales, &Utc, "x").unwrap();
        assert_eq!(
            rendered(&book),
            vec![vec!["N/A", "5/3/2026", "15:04:09", "Sin productos", "0", "0", "0", "0", "Pendiente"]]
        );
    }

    #[test]
    fn missing_or_blank_order_number_exports_as_not_available() {
        let sales = [
            sale(None, vec![item("Mouse", 10.0, 1)], SaleStatus::Completed),
            sale(Some(""), vec![item("Pad", 5.0, 1)], SaleStatus::Completed),
        ];
        let book = sales_workbook(&sales, &Utc, "x").unwrap();
        let orders: Vec<_> = rendered(&book).into_iter().map(|r| r[0].clone()).collect();
        assert_eq!(orders, vec!["N/A", "N/A"]);
    }
}
