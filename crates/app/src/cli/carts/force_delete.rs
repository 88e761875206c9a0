use clap::Args;
use trolley_app::carts::CartsAdminService;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ForceDeleteCartArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[arg(long)]
    cart_uuid: Uuid,
}

pub(crate) async fn run(args: ForceDeleteCartArgs) -> Result<(), String> {
    let context = crate::cli::connect(&args.database_url).await?;

    context
        .admin
        .force_delete_cart(args.cart_uuid.into())
        .await
        .map_err(|error| format!("failed to delete cart {}: {error}", args.cart_uuid))?;

    println!("deleted cart {}", args.cart_uuid);

    Ok(())
}
