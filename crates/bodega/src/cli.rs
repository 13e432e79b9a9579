//! Clap derive structures for the `bodega` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only clap types appear here so `build.rs` can include this file.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bodega -- back-office administration for the bodega store API
#[derive(Debug, Parser)]
#[command(
    name = "bodega",
    version,
    about = "Administer a bodega store from the command line",
    long_about = "Manage categories, products, users, sales and inventory of a \
        bodega store through its REST API.\n\n\
        Log in once with `bodega login`; the session is kept per profile.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "BODEGA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "BODEGA_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BODEGA_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, env = "BODEGA_COLOR", default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', env = "BODEGA_QUIET", global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', env = "BODEGA_YES", global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "BODEGA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Domain value enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Seller,
    Customer,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DocumentArg {
    Cc,
    Ce,
    Ti,
    Nit,
    Passport,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SaleStatusArg {
    Pending,
    Completed,
    Cancelled,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session for the active profile
    Login {
        /// Account email (defaults to the profile's email)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },

    /// Drop the stored session
    Logout,

    /// Show the logged-in user from the stored session
    Whoami,

    /// Create a new account
    Register(UserFields),

    /// Sales and inventory overview
    #[command(alias = "home")]
    Dashboard,

    /// Manage product categories
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Manage products
    #[command(alias = "prod")]
    Products(ProductsArgs),

    /// Manage user accounts
    Users(UsersArgs),

    /// Manage sales
    Sales(SalesArgs),

    /// Stock levels and kardex movements
    #[command(alias = "inv")]
    Inventory(InventoryArgs),

    /// Your own account
    Profile(ProfileArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Pagination for list commands.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Rows per page (defaults to the screen's page size)
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,
}

/// Date range shared by sales and kardex queries.
#[derive(Debug, Args)]
pub struct DateRange {
    /// First day included (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day included (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

/// Account fields shared by `register` and `users create`.
#[derive(Debug, Args)]
pub struct UserFields {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub last_name: String,

    /// Document number
    #[arg(long)]
    pub id_number: String,

    #[arg(long, value_enum, default_value = "cc")]
    pub document: DocumentArg,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, value_enum, default_value = "customer")]
    pub role: RoleArg,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CATEGORIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub command: CategoriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List categories
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Search by name
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show one category
    Get { id: String },

    /// Create a category
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: String,
    },

    /// Update a category
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a category
    #[command(alias = "rm")]
    Delete { id: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products with optional filters
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Search by name
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Category id
        #[arg(long)]
        category: Option<String>,

        /// Only active (true) or inactive (false) products
        #[arg(long)]
        active: Option<bool>,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,
    },

    /// List your own products
    Mine {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one product
    Get { id: String },

    /// Create a product
    Create {
        #[command(flatten)]
        fields: ProductFields,
    },

    /// Update a product
    Update {
        id: String,

        #[command(flatten)]
        fields: ProductUpdateFields,
    },

    /// Activate or deactivate a product
    Toggle { id: String },
}

#[derive(Debug, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub category: String,

    #[arg(long)]
    pub price: String,

    #[arg(long, default_value = "0")]
    pub cost: String,

    #[arg(long, default_value = "0")]
    pub stock: String,

    /// Discount percentage, 0-100
    #[arg(long, default_value = "0")]
    pub discount: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Create the product inactive
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Debug, Args)]
pub struct ProductUpdateFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub cost: Option<f64>,

    #[arg(long)]
    pub stock: Option<i64>,

    #[arg(long)]
    pub discount: Option<f64>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        /// Search by name, email or document
        #[arg(long, short = 's')]
        search: Option<String>,

        #[arg(long, value_enum)]
        role: Option<RoleArg>,

        /// Only active (true) or inactive (false) users
        #[arg(long)]
        active: Option<bool>,
    },

    /// Show one user
    Get { id: String },

    /// Create a user (prompts for the password)
    Create(UserFields),

    /// Update a user
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long, value_enum)]
        role: Option<RoleArg>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Deactivate a user (soft delete)
    Deactivate { id: String },

    /// Permanently delete a user
    #[command(alias = "rm")]
    Delete { id: String },

    /// Counts by status and role
    Stats,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SALES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SalesArgs {
    #[command(subcommand)]
    pub command: SalesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SalesCommand {
    /// List sales
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,

        #[arg(long, value_enum)]
        status: Option<SaleStatusArg>,

        #[command(flatten)]
        range: DateRange,
    },

    /// Show one sale with its lines
    Get { id: String },

    /// Record a sale; each item is PRODUCT_ID:QUANTITY
    Create {
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Change a sale's status
    Status {
        id: String,

        #[arg(value_enum)]
        status: SaleStatusArg,
    },

    /// Totals by status and revenue
    Stats,

    /// Export sales to CSV
    Export {
        #[command(flatten)]
        range: DateRange,

        /// Output directory
        #[arg(long, short = 'd', default_value = ".")]
        dir: std::path::PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INVENTORY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub command: InventoryCommand,
}

#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// Current stock per product
    #[command(alias = "ls")]
    List,

    /// Totals, low stock and out of stock counts
    Stats,

    /// Kardex movements of one product
    Movements {
        product_id: String,

        #[command(flatten)]
        page: PageArgs,

        #[command(flatten)]
        range: DateRange,
    },

    /// Add or remove stock (negative quantity removes)
    Adjust {
        product_id: String,

        #[arg(long, allow_hyphen_values = true)]
        quantity: String,

        #[arg(long, short = 'm')]
        comment: String,
    },

    /// Export stock and movements to CSV
    Export {
        #[command(flatten)]
        range: DateRange,

        /// Output directory
        #[arg(long, short = 'd', default_value = ".")]
        dir: std::path::PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROFILE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show your profile as the API knows it
    Show,

    /// Update your own profile
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// Change your password (prompts for current and new)
    Password,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile (api_url, email, timeout)
    Set {
        /// Config key
        key: String,

        /// Value to set
        value: String,
    },

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the active profile's password in the system keyring
    SetPassword,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
