use clap::{Args, Subcommand};
use trolley_app::carts::data::{CartsFilter, Pagination};
use uuid::Uuid;

mod export;
mod force_delete;
mod list;
mod restore;

#[derive(Debug, Args)]
pub(crate) struct CartsCommand {
    #[command(subcommand)]
    command: CartsSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartsSubcommand {
    /// List carts, including expired ones
    List(list::ListCartsArgs),
    /// Stream every matching cart with its items
    Export(export::ExportCartsArgs),
    /// Undo a soft delete
    Restore(restore::RestoreCartArgs),
    /// Permanently delete a cart and its items
    ForceDelete(force_delete::ForceDeleteCartArgs),
}

/// Selection flags shared by `list` and `export`.
#[derive(Debug, Args)]
pub(crate) struct SelectionArgs {
    /// Only carts owned by this user
    #[arg(long)]
    user_uuid: Option<Uuid>,

    /// Include soft-deleted carts
    #[arg(long)]
    include_deleted: bool,

    #[arg(long)]
    limit: Option<u32>,

    #[arg(long, default_value_t = 0)]
    offset: u64,
}

impl SelectionArgs {
    fn filter(&self) -> CartsFilter {
        CartsFilter {
            user_uuid: self.user_uuid.map(Into::into),
            include_deleted: self.include_deleted,
        }
    }

    fn pagination(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

pub(crate) async fn run(command: CartsCommand) -> Result<(), String> {
    match command.command {
        CartsSubcommand::List(args) => list::run(args).await,
        CartsSubcommand::Export(args) => export::run(args).await,
        CartsSubcommand::Restore(args) => restore::run(args).await,
        CartsSubcommand::ForceDelete(args) => force_delete::run(args).await,
    }
}
