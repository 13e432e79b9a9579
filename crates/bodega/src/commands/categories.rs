//! Category command handlers.

use bodega_core::guard::Route;
use bodega_core::ui::{CategoryDraft, FormDraft, normalize_search};
use bodega_core::{CATEGORY_PAGE_LIMIT, Category, CategoryFilters, UpdateCategory, format_date};
use chrono::Local;
use tabled::Tabled;

use crate::cli::{CategoriesArgs, CategoriesCommand, GlobalOpts};
use crate::config::Context;
use crate::error::{ActionResultExt, CliError};
use crate::output;

use super::util;

const LIST: &str = "categories list";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Nombre")]
    name: String,
    #[tabled(rename = "Descripción")]
    description: String,
    #[tabled(rename = "Creada")]
    created: String,
}

impl From<&Category> for CategoryRow {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            description: c.description.clone(),
            created: c
                .created_at
                .as_ref()
                .map(|at| format_date(at, &Local))
                .unwrap_or_default(),
        }
    }
}

fn detail(c: &Category) -> String {
    [
        format!("ID:           {}", c.id),
        format!("Nombre:       {}", c.name),
        format!("Descripción:  {}", c.description),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &Context,
    args: CategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ctx.require(Route::Categories)?;
    let fail = ctx.failure(LIST);

    match args.command {
        CategoriesCommand::List { page, search } => {
            let filters = CategoryFilters {
                search: search.as_deref().and_then(normalize_search),
            };
            let resp = ctx
                .actions
                .list_categories(page.page, page.limit.unwrap_or(CATEGORY_PAGE_LIMIT), &filters)
                .await
                .or_fail(&fail)?;
            let categories = resp.data.unwrap_or_default();
            let out = output::render_list(
                &global.output,
                &categories,
                "No se encontraron categorías",
                |c| CategoryRow::from(c),
                |c| c.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            if let Some(footer) = output::page_footer(&global.output, resp.meta.as_ref()) {
                output::print_output(&footer, global.quiet);
            }
            Ok(())
        }

        CategoriesCommand::Get { id } => {
            let category = ctx.actions.get_category(&id).await.or_fail(&fail)?;
            let out = output::render_single(&global.output, &category, detail, |c| c.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CategoriesCommand::Create { name, description } => {
            let data = CategoryDraft { name, description }.to_create()?;
            let category = ctx.actions.create_category(&data).await.or_fail(&fail)?;
            output::notify("¡Categoría creada exitosamente!", global.quiet);
            output::print_output(&category.id, global.quiet);
            Ok(())
        }

        CategoriesCommand::Update {
            id,
            name,
            description,
        } => {
            let data = UpdateCategory { name, description };
            if data == UpdateCategory::default() {
                return Err(CliError::Validation {
                    message: "No hay cambios para guardar".into(),
                });
            }
            ctx.actions
                .update_category(&id, &data)
                .await
                .or_fail(&fail)?;
            output::notify("¡Categoría actualizada exitosamente!", global.quiet);
            Ok(())
        }

        CategoriesCommand::Delete { id } => {
            let category = ctx.actions.get_category(&id).await.or_fail(&fail)?;
            let prompt = format!(
                "¿Estás seguro de eliminar la categoría \"{}\"?",
                category.name
            );
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
            ctx.actions.delete_category(&id).await.or_fail(&fail)?;
            output::notify("Categoría eliminada exitosamente", global.quiet);
            Ok(())
        }
    }
}
