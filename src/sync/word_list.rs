use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::{
    github::{GistWrite, GithubClient},
    SyncError,
};
use crate::{
    storage::{LocalStore, Storage},
    wordle::WordsList,
};

pub const FILE_NAME: &str = "wordwave-words.json";
pub const DESCRIPTION: &str = "Word Wave - Word List";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WordListFile {
    words: Vec<String>,
}

/// Fetches the list from its gist, without touching any cache.
#[instrument(skip(client))]
pub async fn fetch(client: &GithubClient, gist_id: &str) -> Result<WordsList, SyncError> {
    let content = client
        .gist(gist_id)
        .await?
        .and_then(|gist| gist.content(FILE_NAME).map(str::to_owned))
        .ok_or_else(|| SyncError::missing_gist("word list"))?;

    let file: WordListFile = serde_json::from_str(&content)?;
    let list = WordsList::new(file.words)?;

    debug!(words = list.len(), "fetched word list");

    Ok(list)
}

/// The list to pick today's word from: a cache younger than an hour, then
/// the gist, then the built-in list. Never fails.
#[instrument(skip_all)]
pub async fn load<S: Storage>(
    store: &mut LocalStore<S>,
    client: &GithubClient,
    gist_id: Option<&str>,
    now: DateTime<Utc>,
) -> WordsList {
    if let Some(words) = store.word_list_cache(now) {
        match WordsList::new(&words) {
            Ok(list) => {
                debug!(words = list.len(), "using cached word list");
                return list;
            }
            Err(err) => warn!(%err, "cached word list is invalid"),
        }
    }

    let Some(gist_id) = gist_id else {
        debug!("no word list gist configured, using built-in list");
        return WordsList::builtin();
    };

    match fetch(client, gist_id).await {
        Ok(list) => {
            if let Err(err) = store.set_word_list_cache(list.to_strings(), now) {
                warn!(%err, "couldn't cache word list");
            }

            list
        }
        Err(err) => {
            warn!(%err, "couldn't load word list, using built-in list");
            WordsList::builtin()
        }
    }
}

/// Replaces the list in the gist and drops the local cache.
#[instrument(skip_all, fields(words = list.len()))]
pub async fn push<S: Storage>(
    store: &mut LocalStore<S>,
    client: &GithubClient,
    gist_id: Option<&str>,
    list: &WordsList,
) -> Result<(), SyncError> {
    let gist_id = gist_id.ok_or_else(|| SyncError::missing_gist("word list"))?;

    let content = serde_json::to_string_pretty(&WordListFile {
        words: list.to_strings(),
    })?;
    let body = GistWrite::single_file(DESCRIPTION, FILE_NAME, content);

    client.update_gist(gist_id, &body, None).await?;
    store.clear_word_list_cache()?;

    info!("word list updated");

    Ok(())
}
