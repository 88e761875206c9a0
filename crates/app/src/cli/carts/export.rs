use clap::Args;
use futures::TryStreamExt;
use trolley_app::carts::CartsAdminService;

use super::SelectionArgs;

#[derive(Debug, Args)]
pub(crate) struct ExportCartsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[command(flatten)]
    selection: SelectionArgs,
}

pub(crate) async fn run(args: ExportCartsArgs) -> Result<(), String> {
    let context = crate::cli::connect(&args.database_url).await?;

    let mut carts = context
        .admin
        .export_carts(args.selection.filter(), args.selection.pagination());

    let mut exported = 0_u64;

    while let Some(cart) = carts
        .try_next()
        .await
        .map_err(|error| format!("export failed after {exported} carts: {error}"))?
    {
        crate::cli::print_cart(&cart);
        println!();

        exported += 1;
    }

    println!("exported {exported} carts");

    Ok(())
}
