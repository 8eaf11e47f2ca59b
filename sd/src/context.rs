//! AI context assembly
//!
//! Builds the ordered document context that accompanies a generation
//! request. The output is deterministic for a fixed store state, so the
//! prompt preview shows exactly what a real call would send.

use draftstore::{to_plain_text, DocumentKind, DocumentStore};

/// One document's contribution to the assembled context
#[derive(Debug, Clone, PartialEq)]
pub struct ContextEntry {
    pub kind: DocumentKind,
    pub title: String,
    pub plain_text: String,
}

/// Collect the enabled documents of a project, excluding one id
///
/// Entries come back in ascending document order; disabled documents
/// and the excluded id are dropped. A project with no qualifying
/// documents yields an empty sequence, not an error.
pub fn assemble(store: &mut DocumentStore, project_id: &str, exclude_doc_id: Option<&str>) -> Vec<ContextEntry> {
    store
        .list_documents(project_id)
        .into_iter()
        .filter(|doc| doc.enabled)
        .filter(|doc| Some(doc.id.as_str()) != exclude_doc_id)
        .map(|doc| ContextEntry {
            kind: doc.kind,
            title: doc.title.clone(),
            plain_text: to_plain_text(&doc.content),
        })
        .collect()
}

/// Render assembled entries as the `{DOCUMENTS_CONTEXT}` block
///
/// Entries whose text stripped down to nothing are left out of the
/// rendered block; they would only waste prompt budget.
pub fn render(entries: &[ContextEntry]) -> String {
    let mut out = String::new();
    for entry in entries.iter().filter(|e| !e.plain_text.is_empty()) {
        out.push_str(&format!("=== {} : {} ===\n", entry.kind.label(), entry.title));
        out.push_str(&entry.plain_text);
        out.push_str("\n\n");
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftstore::DocumentKind;

    fn seeded_store() -> (DocumentStore, String, String, String, String) {
        let mut store = DocumentStore::new();
        let project = store.create_project("Novel", "", "", None).unwrap();
        let a = store.create_document(&project, "A", DocumentKind::Synopsis).unwrap();
        let b = store.create_document(&project, "B", DocumentKind::Characters).unwrap();
        let c = store.create_document(&project, "C", DocumentKind::Chapter).unwrap();
        store.update_content(&a, "<p>alpha text</p>").unwrap();
        store.update_content(&b, "<p>beta text</p>").unwrap();
        store.update_content(&c, "<p>gamma text</p>").unwrap();
        (store, project, a, b, c)
    }

    #[test]
    fn test_assemble_filters_disabled_and_excluded() {
        // A(order 0, enabled), B(order 1, disabled), C(order 2, enabled),
        // active document C excluded: only A qualifies.
        let (mut store, project, _a, b, c) = seeded_store();
        store.toggle_enabled(&b).unwrap();

        let entries = assemble(&mut store, &project, Some(&c));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "A");
        assert_eq!(entries[0].kind, DocumentKind::Synopsis);
        assert_eq!(entries[0].plain_text, "alpha text");
    }

    #[test]
    fn test_assemble_follows_document_order() {
        let (mut store, project, a, _b, c) = seeded_store();
        store.reorder(&project, &c, &a, true).unwrap();

        let titles: Vec<String> = assemble(&mut store, &project, None)
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_assemble_empty_project_yields_empty() {
        let mut store = DocumentStore::new();
        let project = store.create_project("Empty", "", "", None).unwrap();
        assert!(assemble(&mut store, &project, None).is_empty());
    }

    #[test]
    fn test_blank_documents_assemble_but_render_empty() {
        let (mut store, project, a, b, _c) = seeded_store();
        store.update_content(&a, "").unwrap();
        store.update_content(&b, "<p>   </p>").unwrap();

        let entries = assemble(&mut store, &project, None);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].plain_text, "");

        let block = render(&entries);
        assert!(!block.contains("=== Synopsis : A ==="));
        assert!(block.contains("=== Chapter : C ==="));
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let (mut store, project, _a, _b, c) = seeded_store();

        let first = assemble(&mut store, &project, Some(&c));
        let second = assemble(&mut store, &project, Some(&c));
        assert_eq!(first, second);
        assert_eq!(render(&first), render(&second));
    }

    #[test]
    fn test_render_block_format() {
        let entries = vec![
            ContextEntry {
                kind: DocumentKind::Synopsis,
                title: "A".to_string(),
                plain_text: "alpha".to_string(),
            },
            ContextEntry {
                kind: DocumentKind::Chapter,
                title: "C".to_string(),
                plain_text: "gamma".to_string(),
            },
        ];

        let block = render(&entries);
        assert!(block.starts_with("=== Synopsis : A ==="));
        assert!(block.contains("alpha"));
        assert!(block.contains("=== Chapter : C ==="));
        assert!(block.ends_with("gamma"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "");
    }
}
