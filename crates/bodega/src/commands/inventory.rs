//! Inventory and kardex command handlers.

use bodega_core::export::{
    Cell, CsvWorkbookWriter, SpreadsheetWriter, inventory_file_stem, inventory_workbook,
};
use bodega_core::guard::Route;
use bodega_core::ui::{KardexDraft, StockLevel};
use bodega_core::{
    InventoryItem, InventoryStats, KARDEX_PAGE_LIMIT, Kardex, KardexFilters, format_date,
    format_price, format_time,
};
use chrono::Local;
use tabled::Tabled;

use crate::cli::{GlobalOpts, InventoryArgs, InventoryCommand};
use crate::config::Context;
use crate::error::{ActionResultExt, CliError};
use crate::output::{self, Tone};

const LIST: &str = "inventory list";

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct StockRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Producto")]
    name: String,
    #[tabled(rename = "Categoría")]
    category: String,
    #[tabled(rename = "Stock")]
    stock: i64,
    #[tabled(rename = "Estado")]
    level: String,
    #[tabled(rename = "Valor")]
    value: String,
    #[tabled(rename = "Último Movimiento")]
    last: String,
}

impl StockRow {
    fn new(item: &InventoryItem, color: bool) -> Self {
        let level = StockLevel::for_stock(item.current_stock);
        let tone = match level {
            StockLevel::Out => Tone::Bad,
            StockLevel::Low => Tone::Warn,
            StockLevel::Ok => Tone::Good,
        };
        Self {
            id: item.product.id.clone(),
            name: item.product.name.clone(),
            category: item.product.category_id.label().to_owned(),
            stock: item.current_stock,
            level: output::paint(level.label(), tone, color),
            value: format_price(Cell::from(item.current_stock).as_number() * item.product.price),
            last: item
                .last_movement
                .as_ref()
                .and_then(|k| k.created_at.as_ref())
                .map_or_else(|| "Sin movimientos".to_owned(), |at| format_date(at, &Local)),
        }
    }
}

#[derive(Tabled)]
struct MovementRow {
    #[tabled(rename = "Fecha")]
    date: String,
    #[tabled(rename = "Hora")]
    time: String,
    #[tabled(rename = "Comentario")]
    comment: String,
    #[tabled(rename = "Cantidad")]
    quantity: String,
    #[tabled(rename = "Stock")]
    stock: i64,
}

impl From<&Kardex> for MovementRow {
    fn from(k: &Kardex) -> Self {
        let at = k.created_at.as_ref();
        Self {
            date: at.map(|t| format_date(t, &Local)).unwrap_or_default(),
            time: at.map(|t| format_time(t, &Local)).unwrap_or_default(),
            comment: k.comment.clone(),
            quantity: format!("{:+}", k.quantity),
            stock: k.stock,
        }
    }
}

fn stats_detail(s: &InventoryStats) -> String {
    [
        format!("Productos:          {}", s.total_products),
        format!("Unidades en stock:  {}", s.total_stock),
        format!("Stock bajo:         {}", s.low_stock),
        format!("Sin stock:          {}", s.out_of_stock),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &Context,
    args: InventoryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ctx.require(Route::Inventory)?;
    let fail = ctx.failure(LIST);
    let color = output::should_color(&global.color);

    match args.command {
        InventoryCommand::List => {
            let items = ctx.actions.inventory().await.or_fail(&fail)?;
            let out = output::render_list(
                &global.output,
                &items,
                "No hay productos en inventario",
                |i| StockRow::new(i, color),
                |i| i.product.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InventoryCommand::Stats => {
            let stats = ctx.actions.inventory_stats().await.or_fail(&fail)?;
            let out = output::render_single(&global.output, &stats, stats_detail, |s| {
                s.total_products.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InventoryCommand::Movements {
            product_id,
            page,
            range,
        } => {
            let filters = KardexFilters {
                start_date: range.from,
                end_date: range.to,
            };
            let resp = ctx
                .actions
                .kardex_by_product(
                    &product_id,
                    page.page,
                    page.limit.unwrap_or(KARDEX_PAGE_LIMIT),
                    &filters,
                )
                .await
                .or_fail(&fail)?;
            let movements = resp.data.unwrap_or_default();
            let out = output::render_list(
                &global.output,
                &movements,
                "No hay movimientos registrados",
                |m| MovementRow::from(m),
                |k| k.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            if let Some(footer) = output::page_footer(&global.output, resp.meta.as_ref()) {
                output::print_output(&footer, global.quiet);
            }
            Ok(())
        }

        InventoryCommand::Adjust {
            product_id,
            quantity,
            comment,
        } => {
            let items = ctx.actions.inventory().await.or_fail(&fail)?;
            let item = items
                .iter()
                .find(|i| i.product.id == product_id)
                .ok_or_else(|| CliError::NotFound {
                    message: format!("Producto '{product_id}' no está en el inventario"),
                    list_command: LIST.into(),
                })?;
            let draft = KardexDraft {
                quantity,
                comment,
                ..KardexDraft::for_item(item)
            };
            let data = draft.to_create()?;
            let movement = ctx.actions.create_kardex(&data).await.or_fail(&fail)?;
            output::notify(
                &format!(
                    "Movimiento registrado: {} → stock {}",
                    item.product.name, movement.stock
                ),
                global.quiet,
            );
            Ok(())
        }

        InventoryCommand::Export { range, dir } => {
            let progress = output::spinner("Obteniendo inventario y movimientos…", global.quiet);
            let (items, movements) = tokio::join!(
                ctx.actions.inventory(),
                ctx.actions.kardex_for_export(range.from, range.to)
            );
            progress.finish_and_clear();
            let items = items.or_fail(&fail)?;
            let movements = movements.or_fail(&fail)?;
            let stem = inventory_file_stem(range.from, range.to);
            let workbook = inventory_workbook(&items, &movements, &Local, stem);
            let paths = CsvWorkbookWriter::new(dir).write(&workbook)?;
            output::notify(
                &format!(
                    "Archivo descargado exitosamente con {} hojas",
                    workbook.sheets.len()
                ),
                global.quiet,
            );
            for path in paths {
                output::print_output(&path.display().to_string(), global.quiet);
            }
            Ok(())
        }
    }
}
