// ── Create/edit dialogs ──
//
// Opening with a record seeds the draft from it; opening without one
// resets to defaults. A successful submit closes the dialog and tells the
// parent to refetch; a failure keeps it open with the error inline.

use crate::error::CoreError;
use crate::model::{
    Category, CreateCategory, CreateKardex, CreateProduct, CreateSale, CreateUser, DocumentType,
    InventoryItem, Product, Role, SaleLine, UpdateCategory, UpdateProduct, UpdateUser, User,
};
use crate::result::ActionResult;

/// Editable form state for one record type.
pub trait FormDraft: Default + Clone {
    type Record;
    type Create;
    type Update;

    fn from_record(record: &Self::Record) -> Self;

    fn to_create(&self) -> Result<Self::Create, CoreError>;

    fn to_update(&self) -> Result<Self::Update, CoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// Validated payload ready for the matching action.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<C, U> {
    Create(C),
    Update { id: String, data: U },
}

#[derive(Debug, Clone)]
pub struct FormDialog<D> {
    open: bool,
    mode: FormMode,
    draft: D,
    submitting: bool,
    error: Option<String>,
}

impl<D: FormDraft> Default for FormDialog<D> {
    fn default() -> Self {
        Self {
            open: false,
            mode: FormMode::Create,
            draft: D::default(),
            submitting: false,
            error: None,
        }
    }
}

impl<D: FormDraft> FormDialog<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_create(&mut self) {
        self.draft = D::default();
        self.mode = FormMode::Create;
        self.error = None;
        self.submitting = false;
        self.open = true;
    }

    pub fn open_edit(&mut self, id: impl Into<String>, record: &D::Record) {
        self.draft = D::from_record(record);
        self.mode = FormMode::Edit { id: id.into() };
        self.error = None;
        self.submitting = false;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.submitting = false;
        self.error = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validate the draft and mark the dialog as submitting.
    ///
    /// A validation failure is stored inline and nothing is returned.
    pub fn begin_submit(&mut self) -> Option<Submission<D::Create, D::Update>> {
        if self.submitting {
            return None;
        }
        let built = match &self.mode {
            FormMode::Create => self.draft.to_create().map(Submission::Create),
            FormMode::Edit { id } => self.draft.to_update().map(|data| Submission::Update {
                id: id.clone(),
                data,
            }),
        };
        match built {
            Ok(submission) => {
                self.submitting = true;
                self.error = None;
                Some(submission)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                None
            }
        }
    }

    /// Apply the action's outcome. Returns `true` when the parent should refetch.
    pub fn submit_result<T>(&mut self, result: &ActionResult<T>) -> bool {
        self.submitting = false;
        match result.error() {
            None => {
                self.close();
                true
            }
            Some(error) => {
                self.error = Some(error.to_owned());
                false
            }
        }
    }
}

// ── Field parsing ────────────────────────────────────────────────────

fn required(value: &str, label: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CoreError::validation(format!("{label} es requerido")))
    } else {
        Ok(trimmed.to_owned())
    }
}

fn parse_amount(value: &str, label: &str) -> Result<f64, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(CoreError::validation(format!(
            "{label} debe ser un número mayor o igual a 0"
        ))),
    }
}

fn parse_count(value: &str, label: &str) -> Result<i64, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| CoreError::validation(format!("{label} debe ser un número entero")))
}

// ── Category ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
}

impl FormDraft for CategoryDraft {
    type Record = Category;
    type Create = CreateCategory;
    type Update = UpdateCategory;

    fn from_record(record: &Category) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone(),
        }
    }

    fn to_create(&self) -> Result<CreateCategory, CoreError> {
        Ok(CreateCategory {
            name: required(&self.name, "El nombre")?,
            description: required(&self.description, "La descripción")?,
        })
    }

    fn to_update(&self) -> Result<UpdateCategory, CoreError> {
        let create = self.to_create()?;
        Ok(UpdateCategory {
            name: Some(create.name),
            description: Some(create.description),
        })
    }
}

// ── Product ──────────────────────────────────────────────────────────

/// Numeric fields stay text until submit so partial input can be edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub cost: String,
    pub price: String,
    pub stock: String,
    pub discount: String,
    pub status: bool,
    pub category_id: String,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            image_url: String::new(),
            cost: "0".into(),
            price: "0".into(),
            stock: "0".into(),
            discount: "0".into(),
            status: true,
            category_id: String::new(),
        }
    }
}

impl FormDraft for ProductDraft {
    type Record = Product;
    type Create = CreateProduct;
    type Update = UpdateProduct;

    fn from_record(record: &Product) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone(),
            image_url: record.image_url.clone(),
            cost: record.cost.to_string(),
            price: record.price.to_string(),
            stock: record.stock.to_string(),
            discount: record.discount.to_string(),
            status: record.status,
            category_id: record.category_id.id().to_owned(),
        }
    }

    fn to_create(&self) -> Result<CreateProduct, CoreError> {
        let name = required(&self.name, "El nombre")?;
        let category_id = required(&self.category_id, "La categoría")?;
        let discount = parse_amount(&self.discount, "El descuento")?;
        if discount > 100.0 {
            return Err(CoreError::validation("El descuento debe estar entre 0 y 100"));
        }
        let stock = parse_count(&self.stock, "El stock")?;
        if stock < 0 {
            return Err(CoreError::validation("El stock no puede ser negativo"));
        }
        Ok(CreateProduct {
            name,
            description: self.description.trim().to_owned(),
            image_url: self.image_url.trim().to_owned(),
            cost: parse_amount(&self.cost, "El costo")?,
            price: parse_amount(&self.price, "El precio")?,
            stock,
            discount,
            status: self.status,
            category_id,
        })
    }

    fn to_update(&self) -> Result<UpdateProduct, CoreError> {
        let c = self.to_create()?;
        Ok(UpdateProduct {
            name: Some(c.name),
            description: Some(c.description),
            image_url: Some(c.image_url),
            cost: Some(c.cost),
            price: Some(c.price),
            stock: Some(c.stock),
            discount: Some(c.discount),
            status: Some(c.status),
            category_id: Some(c.category_id),
        })
    }
}

// ── User ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub last_name: String,
    pub id_number: String,
    pub type_document: DocumentType,
    pub phone: String,
    pub email: String,
    /// Required on create; blank on edit keeps the current password.
    pub password: String,
    pub role: Role,
    pub status: bool,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            last_name: String::new(),
            id_number: String::new(),
            type_document: DocumentType::Cc,
            phone: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Customer,
            status: true,
        }
    }
}

impl UserDraft {
    fn checked_email(&self) -> Result<String, CoreError> {
        let email = required(&self.email, "El email")?;
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
            _ => Err(CoreError::validation("El email no es válido")),
        }
    }

    /// Sent exactly as typed; login does not trim either.
    fn typed_password(&self) -> Result<String, CoreError> {
        required(&self.password, "La contraseña")?;
        Ok(self.password.clone())
    }
}

impl FormDraft for UserDraft {
    type Record = User;
    type Create = CreateUser;
    type Update = UpdateUser;

    fn from_record(record: &User) -> Self {
        Self {
            name: record.name.clone(),
            last_name: record.last_name.clone(),
            id_number: record.id_number.clone(),
            type_document: record.type_document,
            phone: record.phone.clone(),
            email: record.email.clone(),
            password: String::new(),
            role: record.role,
            status: record.status,
        }
    }

    fn to_create(&self) -> Result<CreateUser, CoreError> {
        Ok(CreateUser {
            name: required(&self.name, "El nombre")?,
            last_name: required(&self.last_name, "El apellido")?,
            id_number: required(&self.id_number, "El número de documento")?,
            type_document: self.type_document,
            phone: required(&self.phone, "El teléfono")?,
            email: self.checked_email()?,
            password: self.typed_password()?,
            role: self.role,
            status: Some(self.status),
        })
    }

    fn to_update(&self) -> Result<UpdateUser, CoreError> {
        Ok(UpdateUser {
            name: Some(required(&self.name, "El nombre")?),
            last_name: Some(required(&self.last_name, "El apellido")?),
            id_number: Some(required(&self.id_number, "El número de documento")?),
            type_document: Some(self.type_document),
            phone: Some(required(&self.phone, "El teléfono")?),
            email: Some(self.checked_email()?),
            password: (!self.password.trim().is_empty()).then(|| self.password.clone()),
            role: Some(self.role),
            status: Some(self.status),
        })
    }
}

// ── Sale ─────────────────────────────────────────────────────────────

/// Cart for a new sale. Adding a product twice merges the quantities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleDraft {
    lines: Vec<SaleLine>,
}

impl SaleDraft {
    pub fn add(&mut self, product_id: impl Into<String>, price: f64, quantity: u32) {
        let product_id = product_id.into();
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = line.quantity.saturating_add(quantity);
            line.price = price;
        } else {
            self.lines.push(SaleLine {
                product_id,
                price,
                quantity,
            });
        }
    }

    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    pub fn total(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| l.price * f64::from(l.quantity))
            .sum()
    }

    pub fn to_create(&self) -> Result<CreateSale, CoreError> {
        if self.lines.is_empty() {
            return Err(CoreError::validation("La venta debe tener al menos un producto"));
        }
        Ok(CreateSale::from_lines(self.lines.clone()))
    }
}

// ── Kardex ───────────────────────────────────────────────────────────

/// Stock adjustment for one inventory item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KardexDraft {
    pub product_id: String,
    pub current_stock: i64,
    /// Signed delta as typed: `5` adds, `-3` removes.
    pub quantity: String,
    pub comment: String,
}

impl KardexDraft {
    pub fn for_item(item: &InventoryItem) -> Self {
        Self {
            product_id: item.product.id.clone(),
            current_stock: item.current_stock,
            quantity: String::new(),
            comment: String::new(),
        }
    }

    pub fn to_create(&self) -> Result<CreateKardex, CoreError> {
        let product_id = required(&self.product_id, "El producto")?;
        let quantity = parse_count(&self.quantity, "La cantidad")?;
        if quantity == 0 {
            return Err(CoreError::validation("La cantidad no puede ser 0"));
        }
        let stock = self
            .current_stock
            .checked_add(quantity)
            .ok_or_else(|| CoreError::validation("La cantidad está fuera de rango"))?;
        if stock < 0 {
            return Err(CoreError::validation(format!(
                "Stock insuficiente: disponible {}",
                self.current_stock
            )));
        }
        Ok(CreateKardex {
            product_id,
            comment: required(&self.comment, "El comentario")?,
            quantity,
            stock,
        })
    }
}

// ── Password ─────────────────────────────────────────────────────────

/// Shortest password the profile screen accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Own-password change: current, new and its confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordDraft {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl PasswordDraft {
    /// Checks the confirmation and length; the current password is checked by the action.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.new != self.confirm {
            return Err(CoreError::validation(
                "Las contraseñas no coinciden. Por favor verifica e inténtalo nuevamente.",
            ));
        }
        if self.new.chars().count() < MIN_PASSWORD_LEN {
            return Err(CoreError::validation(
                "La contraseña debe tener al menos 6 caracteres.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn category() -> Category {
        Category {
            id: "c1".into(),
            name: "Aseo".into(),
            description: "Limpieza".into(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn open_edit_seeds_and_open_create_resets() {
        let mut dialog: FormDialog<CategoryDraft> = FormDialog::new();
        dialog.open_edit("c1", &category());
        assert!(dialog.is_open());
        assert_eq!(dialog.draft().name, "Aseo");

        dialog.open_create();
        assert_eq!(dialog.draft(), &CategoryDraft::default());
        assert_eq!(dialog.mode(), &FormMode::Create);
    }

    #[test]
    fn edit_submission_targets_the_record() {
        let mut dialog: FormDialog<CategoryDraft> = FormDialog::new();
        dialog.open_edit("c1", &category());
        dialog.draft_mut().name = "Aseo hogar".into();

        match dialog.begin_submit().unwrap() {
            Submission::Update { id, data } => {
                assert_eq!(id, "c1");
                assert_eq!(data.name.as_deref(), Some("Aseo hogar"));
            }
            Submission::Create(_) => panic!("expected update"),
        }
        assert!(dialog.is_submitting());
    }

    #[test]
    fn validation_error_stays_inline() {
        let mut dialog: FormDialog<CategoryDraft> = FormDialog::new();
        dialog.open_create();
        assert!(dialog.begin_submit().is_none());
        assert_eq!(dialog.error(), Some("El nombre es requerido"));
        assert!(dialog.is_open());
    }

    #[test]
    fn failed_submit_keeps_dialog_open() {
        let mut dialog: FormDialog<CategoryDraft> = FormDialog::new();
        dialog.open_create();
        dialog.draft_mut().name = "A".into();
        dialog.draft_mut().description = "B".into();
        dialog.begin_submit().unwrap();

        let failed: ActionResult<Category> =
            ActionResult::failure(&CoreError::validation("Error 409 en la API: duplicado"));
        assert!(!dialog.submit_result(&failed));
        assert!(dialog.is_open());
        assert_eq!(dialog.error(), Some("Error 409 en la API: duplicado"));

        dialog.begin_submit().unwrap();
        assert!(dialog.submit_result(&ActionResult::success(category())));
        assert!(!dialog.is_open());
    }

    #[test]
    fn product_draft_rejects_bad_numbers() {
        let mut draft = ProductDraft {
            name: "Mouse".into(),
            category_id: "c1".into(),
            price: "abc".into(),
            ..ProductDraft::default()
        };
        assert!(draft.to_create().is_err());

        draft.price = "25000".into();
        draft.discount = "150".into();
        assert!(draft.to_create().is_err());

        draft.discount = "10".into();
        let data = draft.to_create().unwrap();
        assert!((data.price - 25000.0).abs() < f64::EPSILON);
        assert!(data.status);
    }

    #[test]
    fn user_edit_omits_blank_password() {
        let draft = UserDraft {
            name: "Ana".into(),
            last_name: "Pérez".into(),
            id_number: "1".into(),
            phone: "300".into(),
            email: "ana@example.com".into(),
            ..UserDraft::default()
        };
        assert!(draft.to_create().is_err());
        assert_eq!(draft.to_update().unwrap().password, None);
    }

    #[test]
    fn user_password_keeps_surrounding_spaces() {
        let draft = UserDraft {
            name: "Ana".into(),
            last_name: "Pérez".into(),
            id_number: "1".into(),
            phone: "300".into(),
            email: "ana@example.com".into(),
            password: "  secreta  ".into(),
            ..UserDraft::default()
        };
        assert_eq!(draft.to_create().unwrap().password, "  secreta  ");
        assert_eq!(draft.to_update().unwrap().password.as_deref(), Some("  secreta  "));

        let blank = UserDraft {
            password: "   ".into(),
            ..draft
        };
        assert!(blank.to_create().is_err());
        assert_eq!(blank.to_update().unwrap().password, None);
    }

    #[test]
    fn sale_draft_merges_lines() {
        let mut draft = SaleDraft::default();
        draft.add("p1", 10.0, 1);
        draft.add("p1", 10.0, 2);
        draft.add("p2", 5.0, 1);
        assert_eq!(draft.lines().len(), 2);
        assert!((draft.total() - 35.0).abs() < f64::EPSILON);

        draft.remove("p1");
        draft.remove("p2");
        assert!(draft.to_create().is_err());
    }

    #[test]
    fn sale_draft_quantity_saturates() {
        let mut draft = SaleDraft::default();
        draft.add("p1", 1.0, u32::MAX);
        draft.add("p1", 1.0, u32::MAX);
        assert_eq!(draft.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn kardex_draft_computes_resulting_stock() {
        let draft = KardexDraft {
            product_id: "p1".into(),
            current_stock: 4,
            quantity: "-3".into(),
            comment: "Venta mostrador".into(),
        };
        let data = draft.to_create().unwrap();
        assert_eq!(data.stock, 1);

        let over = KardexDraft {
            quantity: "-5".into(),
            ..draft.clone()
        };
        assert!(over.to_create().is_err());
    }

    #[test]
    fn kardex_draft_rejects_out_of_range_quantity() {
        let draft = KardexDraft {
            product_id: "p1".into(),
            current_stock: 5,
            quantity: i64::MAX.to_string(),
            comment: "Carga".into(),
        };
        assert_eq!(
            draft.to_create().unwrap_err().to_string(),
            "La cantidad está fuera de rango"
        );
    }

    #[test]
    fn password_change_needs_matching_confirmation() {
        let mut draft = PasswordDraft {
            current: "vieja".into(),
            new: "secreta1".into(),
            confirm: "secreta2".into(),
        };
        let err = draft.validate().unwrap_err();
        assert!(err.to_string().starts_with("Las contraseñas no coinciden"));

        draft.confirm = "secreta1".into();
        assert!(draft.validate().is_ok());

        draft.new = "corta".into();
        draft.confirm = "corta".into();
        assert_eq!(
            draft.validate().unwrap_err().to_string(),
            "La contraseña debe tener al menos 6 caracteres."
        );
    }
}
