use std::path::Path;

use tracing::instrument;

use super::Context;
use crate::{sync::word_list, wordle::WordsList, Result};

/// Replaces the shared word list. Admins only.
#[instrument(skip(ctx))]
pub async fn push(ctx: &mut Context, file: &Path) -> Result<()> {
    ctx.require_admin().await?;

    let list = WordsList::load(file)?;
    let gist_id = ctx.config().github.word_list_gist_id().map(str::to_owned);
    let github = ctx.github().clone();

    word_list::push(ctx.store_mut(), &github, gist_id.as_deref(), &list).await?;

    println!("Uploaded {} words.", list.len());

    Ok(())
}
