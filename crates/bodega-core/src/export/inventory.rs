use chrono::TimeZone;

use super::sales::stamp;
use super::{Cell, Sheet, Workbook};
use crate::format::{format_date, format_time};
use crate::model::{InventoryItem, KardexExportItem};
use crate::ui::StockLevel;

const INVENTORY_HEADERS: [&str; 7] = [
    "Producto",
    "Categoría",
    "Stock Actual",
    "Estado",
    "Precio Unitario",
    "Valor Total",
    "Último Movimiento",
];

const KARDEX_HEADERS: [&str; 7] = [
    "Producto",
    "Categoría",
    "Fecha",
    "Hora",
    "Comentario",
    "Cantidad",
    "Stock Resultante",
];

/// Current stock plus the movement ledger, as two sheets.
pub fn inventory_workbook<Tz>(
    items: &[InventoryItem],
    movements: &[KardexExportItem],
    tz: &Tz,
    stem: impl Into<String>,
) -> Workbook
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut stock = Sheet::new("Inventario", &INVENTORY_HEADERS);
    for item in items {
        let product = &item.product;
        let last = item
            .last_movement
            .as_ref()
            .and_then(|k| k.created_at.as_ref())
            .map_or_else(|| "Sin movimientos".to_owned(), |at| format_date(at, tz));
        let current = Cell::from(item.current_stock);
        let value = current.as_number() * product.price;
        stock.rows.push(vec![
            Cell::text(&product.name),
            Cell::text(product.category_id.label()),
            current,
            Cell::text(StockLevel::for_stock(item.current_stock).label()),
            Cell::from(product.price),
            Cell::from(value),
            Cell::text(last),
        ]);
    }

    let mut ledger = Sheet::new("Movimientos Kardex", &KARDEX_HEADERS);
    for row in movements {
        let at = row.created_at.as_ref().or(row.kardex.created_at.as_ref());
        ledger.rows.push(vec![
            Cell::text(&row.product.name),
            Cell::text(row.product.category_id.label()),
            Cell::text(stamp(at, |t| format_date(t, tz))),
            Cell::text(stamp(at, |t| format_time(t, tz))),
            Cell::text(&row.kardex.comment),
            Cell::from(row.kardex.quantity),
            Cell::from(row.kardex.stock),
        ]);
    }

    Workbook {
        stem: stem.into(),
        sheets: vec![stock, ledger],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{CategoryRef, Kardex, Product};

    fn product() -> Product {
        Product {
            id: "p1".into(),
            name: "Teclado".into(),
            description: String::new(),
            image_url: String::new(),
            cost: 0.0,
            price: 1500.0,
            stock: 4,
            discount: 0.0,
            status: true,
            category_id: CategoryRef::Populated {
                id: "c1".into(),
                name: "Periféricos".into(),
            },
            created_at: None,
            updated_at: None,
        }
    }

    fn movement() -> Kardex {
        Kardex {
            id: "k1".into(),
            comment: "Compra".into(),
            quantity: 4,
            stock: 4,
            product_id: None,
            created_at: Some(Utc.with_ymd_and_hms(2026, 1, 2, 8, 0, 0).unwrap()),
            updated_at: None,
        }
    }

    #[test]
    fn builds_both_sheets() {
        let items = [
            InventoryItem {
                product: product(),
                current_stock: 4,
                last_movement: Some(movement()),
            },
            InventoryItem {
                product: product(),
                current_stock: 0,
                last_movement: None,
            },
        ];
        let ledger = [KardexExportItem {
            product: product(),
            kardex: movement(),
            created_at: None,
        }];

        let book = inventory_workbook(&items, &ledger, &Utc, "inventario_completo_todos_hasta_hoy");
        let names: Vec<_> = book.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Inventario", "Movimientos Kardex"]);

        let first: Vec<String> = book.sheets[0].rows[0].iter().map(Cell::render).collect();
        assert_eq!(
            first,
            ["Teclado", "Periféricos", "4", "Stock Bajo", "1500", "6000", "2/1/2026"]
        );
        assert_eq!(book.sheets[0].rows[1][3].render(), "Sin Stock");
        assert_eq!(book.sheets[0].rows[1][6].render(), "Sin movimientos");

        let kardex: Vec<String> = book.sheets[1].rows[0].iter().map(Cell::render).collect();
        assert_eq!(
            kardex,
            ["Teclado", "Periféricos", "2/1/2026", "8:00:00", "Compra", "4", "4"]
        );
        assert_eq!(book.row_count(), 3);
    }
}
