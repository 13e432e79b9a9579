//! Login, logout, whoami and self-registration.

use bodega_core::ui::{FormDraft, PasswordDraft, UserDraft};
use bodega_core::{LoginCredentials, RegisterData};
use secrecy::SecretString;

use crate::cli::{GlobalOpts, UserFields};
use crate::config::{Context, resolve_email, resolve_password};
use crate::error::{ActionResultExt, CliError};
use crate::output;

use super::{users, util};

pub async fn login(
    ctx: &Context,
    email: Option<String>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = match email.or_else(|| resolve_email(&ctx.profile)) {
        Some(email) => email,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password = match resolve_password(&ctx.profile, &ctx.profile_name) {
        Some(pw) => pw,
        None => SecretString::from(util::prompt_secret("Contraseña: ")?),
    };

    let credentials = LoginCredentials { email, password };
    let user = ctx
        .actions
        .login(&credentials)
        .await
        .or_fail(&ctx.failure("login"))?;

    output::notify("¡Bienvenido al panel de administración!", global.quiet);
    let out = output::render_single(&global.output, &user, users::detail, |u| u.id.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn logout(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    if !ctx.actions.session().is_authenticated() {
        output::notify("No hay una sesión activa", global.quiet);
        return Ok(());
    }
    if !util::confirm("¿Estás seguro de cerrar sesión?", global.yes)? {
        return Ok(());
    }
    ctx.actions.logout().or_fail(&ctx.failure("login"))?;
    output::notify("Sesión cerrada", global.quiet);
    Ok(())
}

pub fn whoami(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let user = ctx.actions.user_data().or_fail(&ctx.failure("login"))?;
    let out = output::render_single(&global.output, &user, users::detail, |u| u.email.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn register(
    ctx: &Context,
    fields: UserFields,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let passwords = PasswordDraft {
        current: String::new(),
        new: util::prompt_secret("Contraseña: ")?,
        confirm: util::prompt_secret("Confirmar contraseña: ")?,
    };
    passwords.validate()?;

    let mut draft = users::draft_from_fields(fields);
    draft.password = passwords.new;
    let data = registration(&draft)?;

    let user = ctx
        .actions
        .register(&data)
        .await
        .or_fail(&ctx.failure("login"))?;
    output::notify("Cuenta creada exitosamente", global.quiet);
    let out = output::render_single(&global.output, &user, users::detail, |u| u.id.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Registration carries the same fields as an admin-created user.
fn registration(draft: &UserDraft) -> Result<RegisterData, CliError> {
    let user = draft.to_create()?;
    Ok(RegisterData {
        name: user.name,
        last_name: user.last_name,
        id_number: user.id_number,
        type_document: user.type_document,
        phone: user.phone,
        email: user.email,
        password: user.password,
        role: user.role,
        status: user.status.unwrap_or(true),
    })
}
