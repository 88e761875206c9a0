use clap::Args;
use trolley_app::carts::CartsAdminService;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct RestoreCartArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Soft-deleted cart to restore
    #[arg(long)]
    cart_uuid: Uuid,
}

pub(crate) async fn run(args: RestoreCartArgs) -> Result<(), String> {
    let context = crate::cli::connect(&args.database_url).await?;

    let cart = context
        .admin
        .restore_cart(args.cart_uuid.into())
        .await
        .map_err(|error| format!("failed to restore cart {}: {error}", args.cart_uuid))?;

    crate::cli::print_cart(&cart);

    Ok(())
}
