//! The logged-in user's own account.

use bodega_core::UpdateUser;
use bodega_core::guard::Route;
use bodega_core::ui::PasswordDraft;

use crate::cli::{GlobalOpts, ProfileArgs, ProfileCommand};
use crate::config::Context;
use crate::error::{ActionResultExt, CliError};
use crate::output;

use super::{users, util};

pub async fn handle(
    ctx: &Context,
    args: ProfileArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ctx.require(Route::Profile)?;
    let fail = ctx.failure("profile show");
    let me = ctx.actions.user_data().or_fail(&fail)?;

    match args.command {
        ProfileCommand::Show => {
            let user = ctx.actions.profile().await.or_fail(&fail)?;
            let out = output::render_single(&global.output, &user, users::detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfileCommand::Update {
            name,
            last_name,
            phone,
            email,
        } => {
            let data = UpdateUser {
                name,
                last_name,
                phone,
                email,
                ..UpdateUser::default()
            };
            if data == UpdateUser::default() {
                return Err(CliError::Validation {
                    message: "No hay cambios para guardar".into(),
                });
            }
            let user = ctx
                .actions
                .update_profile(&me.id, &data)
                .await
                .or_fail(&fail)?;
            output::notify("¡Perfil actualizado exitosamente!", global.quiet);
            let out = output::render_single(&global.output, &user, users::detail, |u| u.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfileCommand::Password => {
            let draft = PasswordDraft {
                current: util::prompt_secret("Contraseña actual: ")?,
                new: util::prompt_secret("Nueva contraseña: ")?,
                confirm: util::prompt_secret("Confirmar nueva contraseña: ")?,
            };
            draft.validate()?;
            ctx.actions
                .change_password(&me.id, &draft.current, &draft.new)
                .await
                .or_fail(&fail)?;
            output::notify("¡Contraseña actualizada exitosamente!", global.quiet);
            Ok(())
        }
    }
}
