//! Single measurements: `bundle-id`, `provision-hash`, `image-hash`, `hash-file`.

use anyhow::{Context as _, Result};
use tamperguard::{AppBundle, BinaryImageRef, IntegrityError};

use super::Context;
use crate::cli::args::{HashFileArgs, ImageHashArgs, ProvisionHashArgs};
use crate::output;

pub fn bundle_id(ctx: &Context) -> Result<()> {
    let id = ctx
        .bundle()
        .identifier()
        .ok_or(IntegrityError::BundleIdentityUnavailable)?;
    output::print_value("bundle_id", &id, ctx.output_format)
}

pub async fn provision_hash(ctx: &Context, args: ProvisionHashArgs) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => ctx
            .bundle()
            .provisioning_profile()
            .context("no provisioning artifact configured (set bundle.directory)")?,
    };
    let hash = ctx.hasher().hash_file(&path).await?;
    let file = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    output::print_values(
        &[("file", file.as_str()), ("provision_hash", hash.digest_hex.as_str())],
        ctx.output_format,
    )
}

pub async fn image_hash(ctx: &Context, args: ImageHashArgs) -> Result<()> {
    let image = args.module.map_or(BinaryImageRef::Main, BinaryImageRef::Named);
    let hash = ctx.hasher().hash_image(&image).await?;
    output::print_value("image_hash", &hash.digest_hex, ctx.output_format)
}

pub async fn hash_file(ctx: &Context, args: HashFileArgs) -> Result<()> {
    let hash = ctx.hasher().hash_file(&args.path).await?;
    output::print_value("sha256", &hash.digest_hex, ctx.output_format)
}
