//! Sale command handlers.

use bodega_core::export::{CsvWorkbookWriter, SpreadsheetWriter, sales_file_stem, sales_workbook};
use bodega_core::guard::Route;
use bodega_core::ui::{DashboardMetrics, PageSalesStats, SaleDraft};
use bodega_core::{
    SALES_PAGE_LIMIT, Sale, SaleFilters, SaleStatus, format_date, format_percent, format_price,
    format_time,
};
use chrono::Local;
use tabled::Tabled;

use crate::cli::{GlobalOpts, OutputFormat, SalesArgs, SalesCommand};
use crate::config::Context;
use crate::error::{ActionResultExt, CliError};
use crate::output::{self, Tone};

use super::util;

const LIST: &str = "sales list";

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SaleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "N° Orden")]
    order: String,
    #[tabled(rename = "Fecha")]
    date: String,
    #[tabled(rename = "Productos")]
    items: u32,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Estado")]
    status: String,
}

impl SaleRow {
    fn new(s: &Sale, color: bool) -> Self {
        Self {
            id: s.id.clone(),
            order: s.order_label().to_owned(),
            date: s
                .created_at
                .as_ref()
                .map(|at| format_date(at, &Local))
                .unwrap_or_default(),
            items: s.item_count(),
            total: format_price(s.total),
            status: status_label(s.status, color),
        }
    }
}

fn status_label(status: SaleStatus, color: bool) -> String {
    let tone = match status {
        SaleStatus::Completed => Tone::Good,
        SaleStatus::Pending | SaleStatus::Other => Tone::Warn,
        SaleStatus::Cancelled => Tone::Bad,
    };
    output::paint(status.label(), tone, color)
}

fn detail(s: &Sale) -> String {
    let mut lines = vec![
        format!("ID:        {}", s.id),
        format!("N° Orden:  {}", s.order_label()),
        format!("Estado:    {}", s.status.label()),
    ];
    if let Some(at) = &s.created_at {
        lines.push(format!(
            "Fecha:     {} {}",
            format_date(at, &Local),
            format_time(at, &Local)
        ));
    }
    if s.products.is_empty() {
        lines.push("Sin productos".into());
    }
    for item in &s.products {
        lines.push(format!(
            "  {} x{}  {}  = {}",
            item.display_name(),
            item.quantity,
            format_price(item.price),
            format_price(item.subtotal())
        ));
    }
    lines.push(format!("Total:     {}", format_price(s.total)));
    lines.join("\n")
}

fn page_summary(stats: &PageSalesStats) -> String {
    format!(
        "{} ventas en la página · {} pendientes · {} completadas · ingresos {}",
        stats.total,
        stats.pending,
        stats.completed,
        format_price(stats.revenue)
    )
}

fn stats_detail(m: &DashboardMetrics) -> String {
    [
        format!("Total ventas:      {}", m.total_sales),
        format!(
            "Completadas:       {} ({})",
            m.completed,
            format_percent(m.completion_rate)
        ),
        format!(
            "Pendientes:        {} ({})",
            m.pending,
            format_percent(m.pending_share)
        ),
        format!("Ingresos:          {}", format_price(m.revenue)),
        format!("Venta promedio:    {}", format_price(m.average_sale)),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: SalesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.require(Route::Sales)?;
    let fail = ctx.failure(LIST);
    let color = output::should_color(&global.color);

    match args.command {
        SalesCommand::List {
            page,
            status,
            range,
        } => {
            let filters = SaleFilters {
                status: status.map(util::sale_status),
                start_date: range.from,
                end_date: range.to,
            };
            let resp = ctx
                .actions
                .list_sales(page.page, page.limit.unwrap_or(SALES_PAGE_LIMIT), &filters)
                .await
                .or_fail(&fail)?;
            let sales = resp.data.unwrap_or_default();
            let out = output::render_list(
                &global.output,
                &sales,
                "No hay ventas registradas",
                |s| SaleRow::new(s, color),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            if matches!(global.output, OutputFormat::Table) && !sales.is_empty() {
                let summary = page_summary(&PageSalesStats::from_sales(&sales));
                output::print_output(&summary, global.quiet);
            }
            if let Some(footer) = output::page_footer(&global.output, resp.meta.as_ref()) {
                output::print_output(&footer, global.quiet);
            }
            Ok(())
        }

        SalesCommand::Get { id } => {
            let sale = ctx.actions.get_sale(&id).await.or_fail(&fail)?;
            let out = output::render_single(&global.output, &sale, detail, |s| s.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SalesCommand::Create { items } => {
            let mut draft = SaleDraft::default();
            for raw in &items {
                let (product_id, quantity) = util::parse_item(raw)?;
                let product = ctx
                    .actions
                    .get_product(&product_id)
                    .await
                    .or_fail(&ctx.failure("products list"))?;
                draft.add(product.id.clone(), product.final_price(), quantity);
            }
            let data = draft.to_create()?;
            let sale = ctx.actions.create_sale(&data).await.or_fail(&fail)?;
            output::notify(
                &format!("¡Venta registrada exitosamente! Total {}", format_price(sale.total)),
                global.quiet,
            );
            output::print_output(&sale.id, global.quiet);
            Ok(())
        }

        SalesCommand::Status { id, status } => {
            let status = util::sale_status(status);
            if status == SaleStatus::Completed
                && !util::confirm("¿Marcar esta venta como completada?", global.yes)?
            {
                return Ok(());
            }
            ctx.actions
                .update_sale_status(&id, status)
                .await
                .or_fail(&fail)?;
            let message = if status == SaleStatus::Completed {
                "¡Venta marcada como completada exitosamente!".to_owned()
            } else {
                format!("Venta marcada como {}", status.label().to_lowercase())
            };
            output::notify(&message, global.quiet);
            Ok(())
        }

        SalesCommand::Stats => {
            let stats = ctx.actions.sales_stats().await.or_fail(&fail)?;
            let metrics = DashboardMetrics::from_stats(&stats);
            let out = output::render_single(&global.output, &metrics, stats_detail, |m| {
                m.total_sales.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SalesCommand::Export { range, dir } => {
            let progress = output::spinner("Obteniendo ventas…", global.quiet);
            let sales = ctx.actions.sales_for_export(range.from, range.to).await;
            progress.finish_and_clear();
            let sales = sales.or_fail(&fail)?;
            let stem = sales_file_stem(range.from, range.to);
            let Some(workbook) = sales_workbook(&sales, &Local, stem) else {
                eprintln!("⚠ No hay ventas para exportar con los filtros seleccionados");
                return Ok(());
            };
            let paths = CsvWorkbookWriter::new(dir).write(&workbook)?;
            output::notify(
                &format!(
                    "Archivo descargado: {} filas exportadas",
                    workbook.row_count()
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_page_revenue() {
        let stats = PageSalesStats {
            total: 3,
            pending: 1,
            completed: 2,
            revenue: 1_500_000.0,
        };
        assert_eq!(
            page_summary(&stats),
            "3 ventas en la página · 1 pendientes · 2 completadas · ingresos $ 1.500.000"
        );
    }

    #[test]
    fn status_label_without_color_is_plain() {
        assert_eq!(status_label(SaleStatus::Pending, false), "Pendiente");
        assert_eq!(status_label(SaleStatus::Completed, false), "Completada");
    }
}
