//! `fieldvisit admin ...`: account, client, and catalog management.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use api::types::{ClientInput, NewCategory, NewUser, ProductInput, UserRole, UserUpdate};
use clap::{Args, Subcommand};

use crate::{CliContext, CliError, print_json};

#[derive(Args, Debug)]
pub struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    Users(UsersCommand),
    Clients(ClientsCommand),
    Products(ProductsCommand),
    Categories(CategoriesCommand),
    Roles,
    Supervisors,
    Stats,
    Activity {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    Validated,
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List {
        #[arg(long, default_value = "")]
        query: String,
    },
    Create(NewUserArgs),
    Update {
        user_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        role_id: Option<i64>,
        #[arg(long)]
        active: Option<bool>,
    },
    ToggleActive {
        user_id: i64,
    },
    Delete {
        user_id: i64,
    },
}

#[derive(Args, Debug, Clone)]
struct NewUserArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long, help = "Role name: administrateur, superviseur, or merchandiser")]
    role: String,
    #[arg(long, help = "Geographic zone (merchandiser only)")]
    zone: Option<String>,
    #[arg(long, help = "Supervising manager id (merchandiser only)")]
    manager_id: Option<i64>,
}

#[derive(Args, Debug)]
struct ClientsCommand {
    #[command(subcommand)]
    command: ClientsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ClientsSubcommand {
    List {
        #[arg(long, default_value = "")]
        query: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        fields: ClientFields,
    },
    Update {
        client_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: ClientFields,
    },
    Delete {
        client_id: i64,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct ClientFields {
    #[arg(long)]
    contact: Option<String>,
    #[arg(long, help = "Store typology")]
    kind: Option<String>,
    #[arg(long)]
    location: Option<String>,
}

impl ClientFields {
    fn into_input(self, name: Option<String>) -> ClientInput {
        ClientInput { name, contact: self.contact, kind: self.kind, location: self.location }
    }
}

#[derive(Args, Debug)]
struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProductsSubcommand {
    List {
        #[arg(long, default_value = "")]
        query: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        category_id: i64,
    },
    Update {
        product_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        category_id: Option<i64>,
    },
    Delete {
        product_id: i64,
    },
}

#[derive(Args, Debug)]
struct CategoriesCommand {
    #[command(subcommand)]
    command: CategoriesSubcommand,
}

#[derive(Subcommand, Debug)]
enum CategoriesSubcommand {
    List,
    Create {
        #[arg(long)]
        name: String,
    },
}

/// Build the account-creation body.
///
/// A merchandiser account carries a profile, so both a non-blank zone and a
/// manager are required; other roles never send those fields.
fn new_user(args: NewUserArgs) -> Result<NewUser, CliError> {
    let (zone, manager_id) = if UserRole::from_name(&args.role) == UserRole::Merchandiser {
        let zone = args.zone.filter(|zone| !zone.trim().is_empty());
        match (zone, args.manager_id) {
            (Some(zone), Some(manager_id)) => (Some(zone), Some(manager_id)),
            _ => return Err(CliError::IncompleteMerchandiser),
        }
    } else {
        (None, None)
    };

    Ok(NewUser {
        name: args.name,
        email: args.email,
        password: args.password,
        role_name: args.role,
        zone,
        manager_id,
    })
}

pub async fn run(ctx: &CliContext, admin: AdminCommand) -> Result<(), CliError> {
    match admin.command {
        AdminSubcommand::Users(users) => run_users(ctx, users).await,
        AdminSubcommand::Clients(clients) => run_clients(ctx, clients).await,
        AdminSubcommand::Products(products) => run_products(ctx, products).await,
        AdminSubcommand::Categories(categories) => run_categories(ctx, categories).await,
        AdminSubcommand::Roles => print_json(&ctx.client()?.roles().await?),
        AdminSubcommand::Supervisors => print_json(&ctx.client()?.supervisors().await?),
        AdminSubcommand::Stats => print_json(&ctx.client()?.admin_stats().await?),
        AdminSubcommand::Activity { limit } => print_json(&ctx.client()?.activity_logs(limit).await?),
        AdminSubcommand::Validated => print_json(&ctx.client()?.validated_visits().await?),
    }
}

async fn run_users(ctx: &CliContext, users: UsersCommand) -> Result<(), CliError> {
    let client = ctx.client()?;
    match users.command {
        UsersSubcommand::List { query } => print_json(&client.search_users(&query).await?),
        UsersSubcommand::Create(args) => {
            let body = new_user(args)?;
            let user = client.create_user(&body).await?;
            tracing::info!(user_id = user.id, role = %body.role_name, "user created");
            print_json(&user)
        }
        UsersSubcommand::Update {
            user_id,
            name,
            email,
            role_id,
            active,
        } => {
            let update = UserUpdate { name, email, role_id, is_active: active };
            print_json(&client.update_user(user_id, &update).await?)
        }
        UsersSubcommand::ToggleActive { user_id } => {
            let current = client
                .search_users("")
                .await?
                .into_iter()
                .find(|user| user.id == user_id)
                .ok_or(CliError::UnknownUser(user_id))?;
            let update = UserUpdate { is_active: Some(!current.is_active), ..UserUpdate::default() };
            print_json(&client.update_user(user_id, &update).await?)
        }
        UsersSubcommand::Delete { user_id } => {
            client.delete_user(user_id).await?;
            print_json(&serde_json::json!({ "deleted": user_id }))
        }
    }
}

async fn run_clients(ctx: &CliContext, clients: ClientsCommand) -> Result<(), CliError> {
    let client = ctx.client()?;
    match clients.command {
        ClientsSubcommand::List { query } => print_json(&client.search_clients(&query).await?),
        ClientsSubcommand::Create { name, fields } => {
            print_json(&client.create_client(&fields.into_input(Some(name))).await?)
        }
        ClientsSubcommand::Update { client_id, name, fields } => {
            print_json(&client.update_client(client_id, &fields.into_input(name)).await?)
        }
        ClientsSubcommand::Delete { client_id } => {
            client.delete_client(client_id).await?;
            print_json(&serde_json::json!({ "deleted": client_id }))
        }
    }
}

async fn run_products(ctx: &CliContext, products: ProductsCommand) -> Result<(), CliError> {
    let client = ctx.client()?;
    match products.command {
        ProductsSubcommand::List { query } => print_json(&client.search_products(&query).await?),
        ProductsSubcommand::Create { name, brand, category_id } => {
            let input = ProductInput { name: Some(name), brand, category_id: Some(category_id) };
            print_json(&client.create_product(&input).await?)
        }
        ProductsSubcommand::Update {
            product_id,
            name,
            brand,
            category_id,
        } => {
            let input = ProductInput { name, brand, category_id };
            print_json(&client.update_product(product_id, &input).await?)
        }
        ProductsSubcommand::Delete { product_id } => {
            client.delete_product(product_id).await?;
            print_json(&serde_json::json!({ "deleted": product_id }))
        }
    }
}

async fn run_categories(ctx: &CliContext, categories: CategoriesCommand) -> Result<(), CliError> {
    let client = ctx.client()?;
    match categories.command {
        CategoriesSubcommand::List => print_json(&client.categories().await?),
        CategoriesSubcommand::Create { name } => print_json(&client.create_category(&NewCategory { name }).await?),
    }
}
