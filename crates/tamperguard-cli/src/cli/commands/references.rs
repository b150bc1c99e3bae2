//! `tamperguard references` - Load and show reference values.

use anyhow::Result;
use tamperguard::{CheckKind, CheckPreset, ReferenceKey};

use super::Context;
use crate::cli::args::ReferencesArgs;
use crate::output;

pub async fn execute(ctx: Context, args: ReferencesArgs) -> Result<()> {
    let module = ctx.module(args.module);
    let keys: Vec<ReferenceKey> = CheckPreset::All
        .checks(&module)
        .iter()
        .map(CheckKind::reference_key)
        .collect();

    let (store, summary) = ctx.load_references(&keys).await?;
    tracing::debug!(complete = summary.is_complete(), "references command");

    output::print_references(&store.snapshot(), ctx.output_format)
}
