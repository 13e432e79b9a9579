//! Product command handlers.

use bodega_core::guard::Route;
use bodega_core::ui::{FormDraft, ProductDraft, StockLevel, normalize_search};
use bodega_core::{PRODUCT_PAGE_LIMIT, Product, ProductFilters, UpdateProduct, format_price};
use tabled::Tabled;

use crate::cli::{GlobalOpts, ProductFields, ProductUpdateFields, ProductsArgs, ProductsCommand};
use crate::config::Context;
use crate::error::{ActionResultExt, CliError};
use crate::output::{self, Tone};

use super::util;

const LIST: &str = "products list";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Nombre")]
    name: String,
    #[tabled(rename = "Categoría")]
    category: String,
    #[tabled(rename = "Precio")]
    price: String,
    #[tabled(rename = "Desc.")]
    discount: String,
    #[tabled(rename = "Stock")]
    stock: String,
    #[tabled(rename = "Estado")]
    status: String,
}

impl ProductRow {
    fn new(p: &Product, color: bool) -> Self {
        let level = StockLevel::for_stock(p.stock);
        let tone = match level {
            StockLevel::Out => Tone::Bad,
            StockLevel::Low => Tone::Warn,
            StockLevel::Ok => Tone::Good,
        };
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            category: p.category_id.label().to_owned(),
            price: format_price(p.price),
            discount: format!("{}%", p.discount),
            stock: output::paint(&p.stock.to_string(), tone, color),
            status: status_label(p.status, color),
        }
    }
}

fn status_label(active: bool, color: bool) -> String {
    if active {
        output::paint("Activo", Tone::Good, color)
    } else {
        output::paint("Inactivo", Tone::Bad, color)
    }
}

fn detail(p: &Product) -> String {
    let mut lines = vec![
        format!("ID:           {}", p.id),
        format!("Nombre:       {}", p.name),
        format!("Categoría:    {}", p.category_id.label()),
        format!("Precio:       {}", format_price(p.price)),
        format!("Costo:        {}", format_price(p.cost)),
        format!("Descuento:    {}%", p.discount),
        format!("Precio final: {}", format_price(p.final_price())),
        format!(
            "Stock:        {} ({})",
            p.stock,
            StockLevel::for_stock(p.stock).label()
        ),
        format!("Activo:       {}", util::yes_no(p.status)),
    ];
    if !p.description.is_empty() {
        lines.push(format!("Descripción:  {}", p.description));
    }
    if !p.image_url.is_empty() {
        lines.push(format!("Imagen:       {}", p.image_url));
    }
    lines.join("\n")
}

fn draft_from_fields(fields: ProductFields) -> ProductDraft {
    ProductDraft {
        name: fields.name,
        description: fields.description,
        image_url: fields.image_url,
        cost: fields.cost,
        price: fields.price,
        stock: fields.stock,
        discount: fields.discount,
        status: !fields.inactive,
        category_id: fields.category,
    }
}

fn update_from_fields(fields: ProductUpdateFields) -> Result<UpdateProduct, CliError> {
    if fields.discount.is_some_and(|d| !(0.0..=100.0).contains(&d)) {
        return Err(CliError::Validation {
            message: "El descuento debe estar entre 0 y 100".into(),
        });
    }
    if fields.stock.is_some_and(|s| s < 0) {
        return Err(CliError::Validation {
            message: "El stock no puede ser negativo".into(),
        });
    }
    let data = UpdateProduct {
        name: fields.name,
        description: fields.description,
        image_url: fields.image_url,
        cost: fields.cost,
        price: fields.price,
        stock: fields.stock,
        discount: fields.discount,
        status: None,
        category_id: fields.category,
    };
    if data == UpdateProduct::default() {
        return Err(CliError::Validation {
            message: "No hay cambios para guardar".into(),
        });
    }
    Ok(data)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &Context,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ctx.require(Route::Products)?;
    let fail = ctx.failure(LIST);
    let color = output::should_color(&global.color);

    match args.command {
        ProductsCommand::List {
            page,
            search,
            category,
            active,
            min_price,
            max_price,
        } => {
            let filters = ProductFilters {
                search: search.as_deref().and_then(normalize_search),
                category_id: category,
                status: active,
                min_price,
                max_price,
            };
            let resp = ctx
                .actions
                .list_products(page.page, page.limit.unwrap_or(PRODUCT_PAGE_LIMIT), &filters)
                .await
                .or_fail(&fail)?;
            let products = resp.data.unwrap_or_default();
            let out = output::render_list(
                &global.output,
                &products,
                "No se encontraron productos",
                |p| ProductRow::new(p, color),
                |p| p.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            if let Some(footer) = output::page_footer(&global.output, resp.meta.as_ref()) {
                output::print_output(&footer, global.quiet);
            }
            Ok(())
        }

        ProductsCommand::Mine { page } => {
            let resp = ctx
                .actions
                .my_products(page.page, page.limit.unwrap_or(PRODUCT_PAGE_LIMIT))
                .await
                .or_fail(&fail)?;
            let products = resp.data.unwrap_or_default();
            let out = output::render_list(
                &global.output,
                &products,
                "No tienes productos registrados",
                |p| ProductRow::new(p, color),
                |p| p.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            if let Some(footer) = output::page_footer(&global.output, resp.meta.as_ref()) {
                output::print_output(&footer, global.quiet);
            }
            Ok(())
        }

        ProductsCommand::Get { id } => {
            let product = ctx.actions.get_product(&id).await.or_fail(&fail)?;
            let out = output::render_single(&global.output, &product, detail, |p| p.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Create { fields } => {
            let data = draft_from_fields(fields).to_create()?;
            let product = ctx.actions.create_product(&data).await.or_fail(&fail)?;
            output::notify("¡Producto creado exitosamente!", global.quiet);
            output::print_output(&product.id, global.quiet);
            Ok(())
        }

        ProductsCommand::Update { id, fields } => {
            let data = update_from_fields(fields)?;
            ctx.actions
                .update_product(&id, &data)
                .await
                .or_fail(&fail)?;
            output::notify("¡Producto actualizado exitosamente!", global.quiet);
            Ok(())
        }

        ProductsCommand::Toggle { id } => {
            let product = ctx.actions.get_product(&id).await.or_fail(&fail)?;
            let activate = !product.status;
            let updated = ctx
                .actions
                .toggle_product_status(&id, activate)
                .await
                .or_fail(&fail)?;
            let verb = if activate { "activado" } else { "desactivado" };
            output::notify(&format!("Producto {verb} exitosamente"), global.quiet);
            let out = output::render_single(&global.output, &updated, detail, |p| p.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn update(discount: Option<f64>, stock: Option<i64>) -> ProductUpdateFields {
        ProductUpdateFields {
            name: None,
            category: None,
            price: None,
            cost: None,
            stock,
            discount,
            description: None,
            image_url: None,
        }
    }

    #[test]
    fn update_needs_at_least_one_field() {
        assert!(update_from_fields(update(None, None)).is_err());
        let data = update_from_fields(update(Some(15.0), None)).unwrap();
        assert!(data.discount.is_some_and(|d| (d - 15.0).abs() < f64::EPSILON));
        assert_eq!(data.status, None);
    }

    #[test]
    fn update_checks_ranges() {
        assert!(update_from_fields(update(Some(120.0), None)).is_err());
        assert!(update_from_fields(update(None, Some(-1))).is_err());
    }

    #[test]
    fn inactive_flag_creates_disabled_product() {
        let fields = ProductFields {
            name: "Mouse".into(),
            category: "c1".into(),
            price: "25000".into(),
            cost: "0".into(),
            stock: "4".into(),
            discount: "0".into(),
            description: String::new(),
            image_url: String::new(),
            inactive: true,
        };
        let data = draft_from_fields(fields).to_create().unwrap();
        assert!(!data.status);
        assert_eq!(data.stock, 4);
    }
}
