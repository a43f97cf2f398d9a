/*!
 * Document Provider - Command Line Driver
 *
 * Runs one provider operation against the directory named by
 * DOC_PROVIDER_ROOT and prints the result as JSON:
 * - roots, ls <id>, stat <id>
 * - mkdir <parent> <name>, touch <parent> <name>
 * - rm <id>, mv <id> <name>
 * - search <query>, recent
 */

use miette::{bail, IntoDiagnostic, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{info, warn};

use doc_provider::core::limits::{MIME_TYPE_DIR, MIME_TYPE_OCTET_STREAM, ROOT_ID};
use doc_provider::provider::uri::document_id_from_uri;
use doc_provider::{init_tracing, EnvRoot, EventBroadcaster, LocalDocumentProvider, ProviderConfig};

const USAGE: &str = "usage: doc-provider <roots | ls <id> | stat <id> | mkdir <parent> <name> | \
touch <parent> <name> | rm <id> | mv <id> <name> | search <query> | recent>";

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

fn arg(args: &[String], index: usize) -> Result<&str> {
    match args.get(index) {
        Some(value) => Ok(value.as_str()),
        None => bail!("{}", USAGE),
    }
}

/// Document id argument, given either bare or as a content URI
fn id_arg(args: &[String], index: usize) -> Result<String> {
    let raw = arg(args, index)?;
    if !raw.starts_with("content://") {
        return Ok(raw.to_string());
    }
    match document_id_from_uri(raw) {
        Some(id) => Ok(id),
        None => bail!("not a document URI: {}", raw),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = arg(&args, 0)?;

    let config = ProviderConfig::from_env();
    let broadcaster = EventBroadcaster::new(config.notify_capacity);
    let mut events = broadcaster.subscribe();

    let provider = LocalDocumentProvider::builder()
        .with_config(config)
        .with_root_source(EnvRoot::default())
        .with_notifier(Arc::new(broadcaster))
        .build();

    match provider.root() {
        Some(root) => info!(root = %root.display(), command, "Provider ready"),
        None => warn!(command, "No root directory configured"),
    }

    match command {
        "roots" => print_json(&provider.list_roots())?,
        "ls" => print_json(&provider.list_children(&id_arg(&args, 1)?)?)?,
        "stat" => print_json(&provider.describe(&id_arg(&args, 1)?)?)?,
        "mkdir" => print_json(&provider.create(
            &id_arg(&args, 1)?,
            MIME_TYPE_DIR,
            arg(&args, 2)?,
        )?)?,
        "touch" => print_json(&provider.create(
            &id_arg(&args, 1)?,
            MIME_TYPE_OCTET_STREAM,
            arg(&args, 2)?,
        )?)?,
        "rm" => {
            let id = id_arg(&args, 1)?;
            provider.delete(&id)?;
            print_json(&id)?
        }
        "mv" => print_json(&provider.rename(&id_arg(&args, 1)?, arg(&args, 2)?)?)?,
        "search" => print_json(&provider.search(ROOT_ID, arg(&args, 1)?)?)?,
        "recent" => print_json(&provider.recent(ROOT_ID)?)?,
        other => bail!("unknown command {}\n{}", other, USAGE),
    }

    loop {
        match events.try_recv() {
            Ok(event) => info!(
                uri = %event.uri,
                document_id = %event.document_id,
                kind = ?event.kind,
                "Change published"
            ),
            Err(TryRecvError::Lagged(missed)) => warn!(missed, "Change events dropped"),
            Err(_) => break,
        }
    }

    Ok(())
}
