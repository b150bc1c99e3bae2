//! `tamperguard check` - Run integrity checks.

use anyhow::Result;
use tamperguard::{CheckKind, CheckPreset, ReferenceKey};

use super::Context;
use crate::cli::args::CheckArgs;
use crate::output;

pub async fn execute(ctx: Context, args: CheckArgs) -> Result<()> {
    let module = ctx.module(args.module);
    let checks = CheckPreset::from(args.preset).checks(&module);
    let keys: Vec<ReferenceKey> = checks.iter().map(CheckKind::reference_key).collect();

    let (store, _) = ctx.load_references(&keys).await?;
    let report = ctx.evaluator().evaluate_report(&checks, &store).await;

    output::print_report(&report, ctx.output_format)?;

    // Non-zero exit for anything other than a clean pass
    if let Some(error) = report.error {
        anyhow::bail!("integrity check could not run: {error}");
    }
    if report.is_tampered() {
        anyhow::bail!("integrity check failed");
    }
    Ok(())
}
