//! Field layouts of the back-office forms.

use bodega_core::ui::{CategoryDraft, KardexDraft, PasswordDraft, ProductDraft, UserDraft};

use crate::widgets::field::{DraftFields, FieldSpec, step, yes_no};

impl DraftFields for CategoryDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("Nombre"),
        FieldSpec::text("Descripción"),
    ];

    fn text(&self, idx: usize) -> String {
        match idx {
            0 => self.name.clone(),
            _ => self.description.clone(),
        }
    }

    fn set_text(&mut self, idx: usize, value: String) {
        match idx {
            0 => self.name = value,
            _ => self.description = value,
        }
    }
}

/// Index of the category picker in the product form.
pub const PRODUCT_CATEGORY_FIELD: usize = 8;

impl DraftFields for ProductDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("Nombre"),
        FieldSpec::text("Descripción"),
        FieldSpec::text("URL de imagen"),
        FieldSpec::text("Costo"),
        FieldSpec::text("Precio"),
        FieldSpec::text("Stock"),
        FieldSpec::text("Descuento (%)"),
        FieldSpec::flag("Activo"),
        FieldSpec::choice("Categoría"),
    ];

    fn text(&self, idx: usize) -> String {
        match idx {
            0 => self.name.clone(),
            1 => self.description.clone(),
            2 => self.image_url.clone(),
            3 => self.cost.clone(),
            4 => self.price.clone(),
            5 => self.stock.clone(),
            6 => self.discount.clone(),
            7 => yes_no(self.status),
            _ => self.category_id.clone(),
        }
    }

    fn set_text(&mut self, idx: usize, value: String) {
        match idx {
            0 => self.name = value,
            1 => self.description = value,
            2 => self.image_url = value,
            3 => self.cost = value,
            4 => self.price = value,
            5 => self.stock = value,
            6 => self.discount = value,
            PRODUCT_CATEGORY_FIELD => self.category_id = value,
            _ => {}
        }
    }

    fn cycle(&mut self, idx: usize, _forward: bool) {
        if idx == 7 {
            self.status = !self.status;
        }
    }
}

impl DraftFields for UserDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("Nombre"),
        FieldSpec::text("Apellido"),
        FieldSpec::choice("Tipo de documento"),
        FieldSpec::text("Número de documento"),
        FieldSpec::text("Teléfono"),
        FieldSpec::text("Email"),
        FieldSpec::secret("Contraseña"),
        FieldSpec::choice("Rol"),
        FieldSpec::flag("Activo"),
    ];

    fn text(&self, idx: usize) -> String {
        match idx {
            0 => self.name.clone(),
            1 => self.last_name.clone(),
            2 => self.type_document.label().to_owned(),
            3 => self.id_number.clone(),
            4 => self.phone.clone(),
            5 => self.email.clone(),
            6 => self.password.clone(),
            7 => self.role.label().to_owned(),
            _ => yes_no(self.status),
        }
    }

    fn set_text(&mut self, idx: usize, value: String) {
        match idx {
            0 => self.name = value,
            1 => self.last_name = value,
            3 => self.id_number = value,
            4 => self.phone = value,
            5 => self.email = value,
            6 => self.password = value,
            _ => {}
        }
    }

    fn cycle(&mut self, idx: usize, forward: bool) {
        match idx {
            2 => self.type_document = step(self.type_document, forward),
            7 => self.role = step(self.role, forward),
            8 => self.status = !self.status,
            _ => {}
        }
    }
}

impl DraftFields for KardexDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("Cantidad (+/-)"),
        FieldSpec::text("Comentario"),
    ];

    fn text(&self, idx: usize) -> String {
        match idx {
            0 => self.quantity.clone(),
            _ => self.comment.clone(),
        }
    }

    fn set_text(&mut self, idx: usize, value: String) {
        match idx {
            0 => self.quantity = value,
            _ => self.comment = value,
        }
    }
}

impl DraftFields for PasswordDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::secret("Contraseña actual"),
        FieldSpec::secret("Nueva contraseña"),
        FieldSpec::secret("Confirmar contraseña"),
    ];

    fn text(&self, idx: usize) -> String {
        match idx {
            0 => self.current.clone(),
            1 => self.new.clone(),
            _ => self.confirm.clone(),
        }
    }

    fn set_text(&mut self, idx: usize, value: String) {
        match idx {
            0 => self.current = value,
            1 => self.new = value,
            _ => self.confirm = value,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bodega_core::ui::FormDraft;
    use bodega_core::{DocumentType, Role};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::widgets::field::FieldEditor;

    fn type_into<D: DraftFields>(editor: &mut FieldEditor, draft: &mut D, keys: &[KeyCode]) {
        for code in keys {
            editor.handle_key(KeyEvent::new(*code, KeyModifiers::NONE), draft);
        }
    }

    #[test]
    fn product_fields_line_up_with_the_draft() {
        let mut draft = ProductDraft::default();
        draft.set_text(PRODUCT_CATEGORY_FIELD, "c1".into());
        draft.set_text(4, "25.5".into());
        draft.cycle(7, true);

        assert_eq!(draft.category_id, "c1");
        assert_eq!(draft.text(7), "No");
        let created = draft.to_create();
        // Nombre is still empty.
        assert!(created.is_err());

        draft.set_text(0, "Mouse".into());
        let created = draft.to_create().unwrap();
        assert!((created.price - 25.5).abs() < f64::EPSILON);
        assert!(!created.status);
    }

    #[test]
    fn user_choices_step_through_enums() {
        let mut draft = UserDraft::default();
        let mut editor = FieldEditor::default();
        editor.reset(&draft);
        // Tab to the document type, then step forward once.
        type_into(&mut editor, &mut draft, &[KeyCode::Tab, KeyCode::Tab, KeyCode::Right]);
        assert_eq!(draft.type_document, DocumentType::Ce);

        for _ in 0..5 {
            type_into(&mut editor, &mut draft, &[KeyCode::Tab]);
        }
        type_into(&mut editor, &mut draft, &[KeyCode::Left]);
        assert_eq!(draft.role, Role::Seller);
    }

    #[test]
    fn password_form_fills_all_three() {
        let mut draft = PasswordDraft::default();
        let mut editor = FieldEditor::default();
        editor.reset(&draft);
        type_into(
            &mut editor,
            &mut draft,
            &[
                KeyCode::Char('a'),
                KeyCode::Tab,
                KeyCode::Char('b'),
                KeyCode::Tab,
                KeyCode::Char('c'),
            ],
        );
        assert_eq!((draft.current.as_str(), draft.new.as_str(), draft.confirm.as_str()), ("a", "b", "c"));
        assert!(draft.validate().is_err());
    }
}
