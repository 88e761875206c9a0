use clap::Args;
use trolley_app::carts::CartsAdminService;

use super::SelectionArgs;

#[derive(Debug, Args)]
pub(crate) struct ListCartsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[command(flatten)]
    selection: SelectionArgs,
}

pub(crate) async fn run(args: ListCartsArgs) -> Result<(), String> {
    let context = crate::cli::connect(&args.database_url).await?;

    let page = context
        .admin
        .list_carts(args.selection.filter(), args.selection.pagination())
        .await
        .map_err(|error| format!("failed to list carts: {error}"))?;

    if page.carts.is_empty() {
        println!("no carts found (total {})", page.total);
        return Ok(());
    }

    for cart in &page.carts {
        crate::cli::print_cart(cart);
        println!();
    }

    println!("showing {} of {} carts", page.carts.len(), page.total);

    Ok(())
}
