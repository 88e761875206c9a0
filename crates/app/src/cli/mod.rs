use clap::{Parser, Subcommand};
use trolley_app::{carts::models::Cart, context::AppContext};

mod carts;
mod db;

#[derive(Debug, Parser)]
#[command(name = "trolley-app", about = "Trolley operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Carts(carts::CartsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Carts(command) => carts::run(command).await,
        }
    }
}

async fn connect(database_url: &str) -> Result<AppContext, String> {
    AppContext::from_database_url(database_url, false)
        .await
        .map_err(|error| format!("failed to initialise services: {error}"))
}

fn print_cart(cart: &Cart) {
    println!("cart_uuid: {}", cart.uuid);
    println!("user_uuid: {}", cart.user_uuid);
    println!("version: {}", cart.version);
    println!("items: {}", cart.items.len());

    for item in &cart.items {
        println!("  {} x{} ({})", item.product_uuid, item.quantity, item.uuid);
    }

    println!("created_at: {}", cart.created_at);
    println!("last_activity_at: {}", cart.last_activity_at);
    println!("expires_at: {}", cart.expires_at);
    println!(
        "deleted_at: {}",
        cart.deleted_at
            .map_or_else(|| "active".to_string(), |value| value.to_string())
    );
}
