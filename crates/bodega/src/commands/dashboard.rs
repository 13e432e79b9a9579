//! Home overview: sales and inventory stats side by side.

use bodega_core::guard::Route;
use bodega_core::ui::DashboardMetrics;
use bodega_core::{InventoryStats, format_percent, format_price};
use serde::Serialize;

use crate::cli::GlobalOpts;
use crate::config::Context;
use crate::error::{ActionResultExt, CliError};
use crate::output;

#[derive(Debug, Serialize)]
struct Overview {
    sales: DashboardMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    inventory: Option<InventoryStats>,
}

fn detail(o: &Overview) -> String {
    let s = &o.sales;
    let mut lines = vec![
        "── Ventas ──".to_owned(),
        format!("Total ventas:       {}", s.total_sales),
        format!("Ingresos:           {}", format_price(s.revenue)),
        format!("Venta promedio:     {}", format_price(s.average_sale)),
        format!(
            "Completadas:        {} ({})",
            s.completed,
            format_percent(s.completion_rate)
        ),
        format!(
            "Pendientes:         {} ({})",
            s.pending,
            format_percent(s.pending_share)
        ),
    ];
    if let Some(inv) = &o.inventory {
        lines.extend([
            String::new(),
            "── Inventario ──".to_owned(),
            format!("Productos:          {}", inv.total_products),
            format!("Unidades en stock:  {}", inv.total_stock),
            format!("Stock bajo:         {}", inv.low_stock),
            format!("Sin stock:          {}", inv.out_of_stock),
        ]);
    }
    lines.join("\n")
}

pub async fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.require(Route::Home)?;
    let fail = ctx.failure("dashboard");

    // Customers may open Home but not the stock screens.
    let sees_inventory = ctx.user().is_some_and(|u| Route::Inventory.allows(u.role));

    let (sales, inventory) = if sees_inventory {
        let (sales, inventory) =
            tokio::join!(ctx.actions.sales_stats(), ctx.actions.inventory_stats());
        (sales, Some(inventory))
    } else {
        (ctx.actions.sales_stats().await, None)
    };

    let overview = Overview {
        sales: DashboardMetrics::from_stats(&sales.or_fail(&fail)?),
        inventory: inventory.map(|r| r.or_fail(&fail)).transpose()?,
    };
    let out = output::render_single(&global.output, &overview, detail, |o| {
        o.sales.total_sales.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
