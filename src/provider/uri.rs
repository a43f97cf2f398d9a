/*!
 * Content URIs
 * Host-facing URIs for roots, documents, and child listings
 */

use crate::core::limits::SEPARATOR;

const SCHEME: &str = "content://";

/// `content://<authority>/root/<root id>`
pub fn root_uri(authority: &str, root_id: &str) -> String {
    format!("{}{}/root/{}", SCHEME, authority, urlencoding::encode(root_id))
}

/// `content://<authority>/document/<document id>`
pub fn document_uri(authority: &str, document_id: &str) -> String {
    format!(
        "{}{}/document/{}",
        SCHEME,
        authority,
        urlencoding::encode(document_id)
    )
}

/// `content://<authority>/document/<parent id>/children`
///
/// This is the key change notifications are published under.
pub fn child_documents_uri(authority: &str, parent_document_id: &str) -> String {
    format!("{}/children", document_uri(authority, parent_document_id))
}

/// `content://<authority>/root/<root id>/search?query=<query>`
pub fn search_uri(authority: &str, root_id: &str, query: &str) -> String {
    format!(
        "{}/search?query={}",
        root_uri(authority, root_id),
        urlencoding::encode(query)
    )
}

/// `content://<authority>/root/<root id>/recent`
pub fn recent_uri(authority: &str, root_id: &str) -> String {
    format!("{}/recent", root_uri(authority, root_id))
}

/// Extract the document id from a document or children URI
pub fn document_id_from_uri(uri: &str) -> Option<String> {
    let rest = uri.strip_prefix(SCHEME)?;
    let mut parts = rest.split(SEPARATOR);
    let _authority = parts.next()?;
    if parts.next()? != "document" {
        return None;
    }
    let encoded = parts.next()?;
    urlencoding::decode(encoded).ok().map(|id| id.into_owned())
}
