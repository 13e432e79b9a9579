//! User command handlers (admin only).

use bodega_core::guard::Route;
use bodega_core::ui::{FormDraft, PasswordDraft, UserDraft};
use bodega_core::model::UserStats;
use bodega_core::ui::normalize_search;
use bodega_core::{Role, USER_PAGE_LIMIT, UpdateUser, User, UserFilters, format_date};
use chrono::Local;
use tabled::Tabled;

use crate::cli::{GlobalOpts, UserFields, UsersArgs, UsersCommand};
use crate::config::Context;
use crate::error::{ActionResultExt, CliError};
use crate::output;

use super::util;

const LIST: &str = "users list";

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Nombre")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Documento")]
    document: String,
    #[tabled(rename = "Rol")]
    role: &'static str,
    #[tabled(rename = "Activo")]
    active: &'static str,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.full_name(),
            email: u.email.clone(),
            document: format!("{} {}", u.type_document.to_string().to_uppercase(), u.id_number),
            role: u.role.label(),
            active: util::yes_no(u.status),
        }
    }
}

pub(super) fn detail(u: &User) -> String {
    let mut lines = vec![
        format!("ID:         {}", u.id),
        format!("Nombre:     {}", u.full_name()),
        format!("Email:      {}", u.email),
        format!("Documento:  {} {}", u.type_document.label(), u.id_number),
        format!("Teléfono:   {}", u.phone),
        format!("Rol:        {}", u.role.label()),
        format!("Activo:     {}", util::yes_no(u.status)),
    ];
    if let Some(at) = &u.created_at {
        lines.push(format!("Creado:     {}", format_date(at, &Local)));
    }
    lines.join("\n")
}

fn stats_detail(s: &UserStats) -> String {
    let mut lines = vec![
        format!("Total:          {}", s.total),
        format!("Activos:        {}", s.active),
        format!("Inactivos:      {}", s.inactive),
    ];
    for role in [Role::Admin, Role::Seller, Role::Customer] {
        lines.push(format!("{:<15} {}", format!("{}:", role.label()), s.count_for(role)));
    }
    lines.join("\n")
}

/// Seed a user draft from command-line fields.
pub(super) fn draft_from_fields(fields: UserFields) -> UserDraft {
    UserDraft {
        name: fields.name,
        last_name: fields.last_name,
        id_number: fields.id_number,
        type_document: util::document(fields.document),
        phone: fields.phone,
        email: fields.email,
        role: util::role(fields.role),
        ..UserDraft::default()
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.require(Route::Users)?;
    let fail = ctx.failure(LIST);

    match args.command {
        UsersCommand::List {
            page,
            search,
            role,
            active,
        } => {
            let filters = UserFilters {
                search: search.as_deref().and_then(normalize_search),
                role: role.map(util::role),
                status: active,
            };
            let resp = ctx
                .actions
                .list_users(page.page, page.limit.unwrap_or(USER_PAGE_LIMIT), &filters)
                .await
                .or_fail(&fail)?;
            let users = resp.data.unwrap_or_default();
            let out = output::render_list(
                &global.output,
                &users,
                "No se encontraron usuarios",
                |u| UserRow::from(u),
                |u| u.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            if let Some(footer) = output::page_footer(&global.output, resp.meta.as_ref()) {
                output::print_output(&footer, global.quiet);
            }
            Ok(())
        }

        UsersCommand::Get { id } => {
            let user = ctx.actions.get_user(&id).await.or_fail(&fail)?;
            let out = output::render_single(&global.output, &user, detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Create(fields) => {
            let passwords = PasswordDraft {
                current: String::new(),
                new: util::prompt_secret("Contraseña: ")?,
                confirm: util::prompt_secret("Confirmar contraseña: ")?,
            };
            passwords.validate()?;
            let mut draft = draft_from_fields(fields);
            draft.password = passwords.new;
            let data = draft.to_create()?;

            let user = ctx.actions.create_user(&data).await.or_fail(&fail)?;
            output::notify("¡Usuario creado exitosamente!", global.quiet);
            let out = output::render_single(&global.output, &user, detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Update {
            id,
            name,
            last_name,
            phone,
            email,
            role,
            active,
        } => {
            let data = UpdateUser {
                name,
                last_name,
                phone,
                email,
                role: role.map(util::role),
                status: active,
                ..UpdateUser::default()
            };
            if data == UpdateUser::default() {
                return Err(CliError::Validation {
                    message: "No hay cambios para guardar".into(),
                });
            }
            let user = ctx.actions.update_user(&id, &data).await.or_fail(&fail)?;
            output::notify("¡Usuario actualizado exitosamente!", global.quiet);
            let out = output::render_single(&global.output, &user, detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Deactivate { id } => {
            if !util::confirm("¿Estás seguro de desactivar este usuario?", global.yes)? {
                return Ok(());
            }
            ctx.actions.deactivate_user(&id).await.or_fail(&fail)?;
            output::notify("Usuario desactivado exitosamente", global.quiet);
            Ok(())
        }

        UsersCommand::Delete { id } => {
            if !util::confirm(
                "¿Estás seguro de eliminar permanentemente este usuario?",
                global.yes,
            )? {
                return Ok(());
            }
            ctx.actions.delete_user(&id).await.or_fail(&fail)?;
            output::notify("Usuario eliminado exitosamente", global.quiet);
            Ok(())
        }

        UsersCommand::Stats => {
            let stats = ctx.actions.user_stats().await.or_fail(&fail)?;
            let out =
                output::render_single(&global.output, &stats, stats_detail, |s| s.total.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
