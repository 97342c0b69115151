//! Trash listing.

use std::collections::HashMap;

use tracing::warn;

use snipvault_core::result::AppResult;
use snipvault_core::types::FolderId;
use snipvault_entity::snippet::TrashedSnippet;

use super::service::SnippetService;
use crate::context::RequestContext;

impl SnippetService {
    /// Lists trashed snippets, each annotated with its folder's current name.
    ///
    /// A failed or empty folder lookup degrades to a placeholder name for
    /// that item instead of failing the listing.
    pub async fn list_trash(&self, ctx: &RequestContext) -> AppResult<Vec<TrashedSnippet>> {
        let trashed = self.snippets().find_trashed(&ctx.owner_id).await?;
        let mut names: HashMap<FolderId, String> = HashMap::new();
        let mut listing = Vec::with_capacity(trashed.len());

        for snippet in trashed {
            let folder_name = match snippet.folder_id {
                None => TrashedSnippet::ROOT_FOLDER_NAME.to_string(),
                Some(folder_id) => {
                    if let Some(name) = names.get(&folder_id) {
                        name.clone()
                    } else {
                        let name = match self.folders().find_by_id(&ctx.owner_id, folder_id).await {
                            Ok(Some(folder)) => folder.value.name,
                            Ok(None) => TrashedSnippet::UNKNOWN_FOLDER_NAME.to_string(),
                            Err(e) => {
                                warn!(
                                    folder_id = %folder_id,
                                    error = %e,
                                    "Folder lookup failed while listing trash"
                                );
                                TrashedSnippet::UNKNOWN_FOLDER_NAME.to_string()
                            }
                        };
                        names.insert(folder_id, name.clone());
                        name
                    }
                }
            };
            listing.push(TrashedSnippet {
                snippet,
                folder_name,
            });
        }

        Ok(listing)
    }
}
