//! Core DocumentStore implementation
//!
//! In-memory owner of all projects and documents for one session, plus
//! the two cursor fields: the current project and the active document.
//! The active document's project always equals the current project.

use tracing::{debug, info};

use crate::error::StoreError;
use crate::gateway::{Snapshot, SNAPSHOT_VERSION};
use crate::markup;
use crate::record::{now_ms, Document, DocumentKind, Project, Settings};

/// The main document store
#[derive(Debug, Default)]
pub struct DocumentStore {
    projects: Vec<Project>,
    documents: Vec<Document>,
    settings: Settings,
    current_project: Option<String>,
    active_document: Option<String>,
}

impl DocumentStore {
    /// Create an empty store (first-run state)
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted snapshot
    pub fn restore(snapshot: Snapshot) -> Self {
        let mut store = Self {
            projects: snapshot.projects,
            documents: snapshot.documents,
            settings: snapshot.settings,
            current_project: None,
            active_document: None,
        };

        // Re-open where the user left off, if those records still exist
        if let Some(project_id) = store.settings.last_project_id.clone()
            && store.get_project(&project_id).is_some()
        {
            store.current_project = Some(project_id);
        }
        if let Some(doc_id) = store.settings.last_document_id.clone()
            && store.set_active_document(&doc_id).is_err()
        {
            store.active_document = None;
        }

        store
    }

    /// Capture the full state as a snapshot for persistence
    ///
    /// The snapshot is a by-value copy; the gateway never holds a
    /// reference into the store.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            timestamp: now_ms(),
            projects: self.projects.clone(),
            documents: self.documents.clone(),
            settings: self.settings.clone(),
        }
    }

    // === Projects ===

    /// Create a project and return its id
    pub fn create_project(
        &mut self,
        title: &str,
        genre: &str,
        description: &str,
        target_word_count: Option<u32>,
    ) -> Result<String, StoreError> {
        if title.trim().is_empty() {
            return Err(StoreError::Validation("project title must not be empty".to_string()));
        }
        let project = Project::new(title.trim())
            .with_genre(genre)
            .with_description(description)
            .with_target(target_word_count);
        let id = project.id.clone();
        info!(project_id = %id, title = %project.title, "Created project");
        self.projects.push(project);
        Ok(id)
    }

    /// List all projects in creation order
    pub fn list_projects(&self) -> &[Project] {
        &self.projects
    }

    /// Look up a project by id
    pub fn get_project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    /// Look up a project mutably by id
    pub fn get_project_mut(&mut self, project_id: &str) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == project_id)
    }

    /// Delete a project, cascading to every document that references it
    pub fn delete_project(&mut self, project_id: &str) -> Result<(), StoreError> {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != project_id);
        if self.projects.len() == before {
            return Err(StoreError::NotFound(format!("project {}", project_id)));
        }

        let removed: Vec<String> = self
            .documents
            .iter()
            .filter(|d| d.project_id == project_id)
            .map(|d| d.id.clone())
            .collect();
        self.documents.retain(|d| d.project_id != project_id);

        if self.current_project.as_deref() == Some(project_id) {
            self.current_project = None;
        }
        if let Some(active) = &self.active_document
            && removed.iter().any(|id| id == active)
        {
            self.active_document = None;
        }
        if self.settings.last_project_id.as_deref() == Some(project_id) {
            self.settings.last_project_id = None;
        }
        if let Some(last) = &self.settings.last_document_id
            && removed.iter().any(|id| id == last)
        {
            self.settings.last_document_id = None;
        }

        info!(project_id, doc_count = removed.len(), "Deleted project with documents");
        Ok(())
    }

    /// Sum of the word-count caches of a project's documents
    pub fn project_word_count(&self, project_id: &str) -> u32 {
        self.documents
            .iter()
            .filter(|d| d.project_id == project_id)
            .map(|d| d.word_count)
            .sum()
    }

    // === Documents ===

    /// Create a document at the end of a project and return its id
    pub fn create_document(
        &mut self,
        project_id: &str,
        title: &str,
        kind: DocumentKind,
    ) -> Result<String, StoreError> {
        if title.trim().is_empty() {
            return Err(StoreError::Validation("document title must not be empty".to_string()));
        }
        if self.get_project(project_id).is_none() {
            return Err(StoreError::NotFound(format!("project {}", project_id)));
        }

        let position = self.documents.iter().filter(|d| d.project_id == project_id).count() as u32;
        let doc = Document::new(project_id, title.trim(), kind).with_order(position);
        let id = doc.id.clone();
        info!(doc_id = %id, project_id, %kind, "Created document");
        self.documents.push(doc);
        Ok(id)
    }

    /// Look up a document by id
    pub fn get_document(&self, doc_id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == doc_id)
    }

    fn get_document_mut(&mut self, doc_id: &str) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == doc_id)
    }

    /// List a project's documents in ascending order
    ///
    /// Documents missing an order value are first assigned their index
    /// in insertion order as a repair step. Ties are broken by insertion
    /// order (stable sort).
    pub fn list_documents(&mut self, project_id: &str) -> Vec<&Document> {
        self.repair_orders(project_id);
        let mut docs: Vec<&Document> = self
            .documents
            .iter()
            .filter(|d| d.project_id == project_id)
            .collect();
        docs.sort_by_key(|d| d.order);
        docs
    }

    /// Assign an order to any of the project's documents lacking one
    fn repair_orders(&mut self, project_id: &str) {
        let mut index = 0u32;
        let mut repaired = 0usize;
        for doc in self.documents.iter_mut().filter(|d| d.project_id == project_id) {
            if doc.order.is_none() {
                doc.order = Some(index);
                repaired += 1;
            }
            index += 1;
        }
        if repaired > 0 {
            debug!(project_id, repaired, "Repaired missing document orders");
        }
    }

    /// Move a document before or after another within the same project
    ///
    /// After a successful move, every document in the project carries a
    /// dense 0-based order equal to its new index. Returns `false`
    /// (a reported no-op) when either id is missing or the two
    /// documents belong to different projects.
    pub fn reorder(
        &mut self,
        project_id: &str,
        moved_id: &str,
        target_id: &str,
        insert_before: bool,
    ) -> Result<bool, StoreError> {
        if moved_id == target_id {
            return Ok(false);
        }
        let in_project = |id: &str| {
            self.documents
                .iter()
                .any(|d| d.id == id && d.project_id == project_id)
        };
        if !in_project(moved_id) || !in_project(target_id) {
            debug!(project_id, moved_id, target_id, "reorder: no-op (missing or cross-project)");
            return Ok(false);
        }

        self.repair_orders(project_id);

        let mut ids: Vec<String> = {
            let mut docs: Vec<&Document> = self
                .documents
                .iter()
                .filter(|d| d.project_id == project_id)
                .collect();
            docs.sort_by_key(|d| d.order);
            docs.iter().map(|d| d.id.clone()).collect()
        };

        ids.retain(|id| id != moved_id);
        let target_index = ids.iter().position(|id| id == target_id).ok_or_else(|| {
            StoreError::NotFound(format!("document {}", target_id))
        })?;
        let insert_at = if insert_before { target_index } else { target_index + 1 };
        ids.insert(insert_at, moved_id.to_string());

        let now = now_ms();
        for (index, id) in ids.iter().enumerate() {
            if let Some(doc) = self.documents.iter_mut().find(|d| d.id == *id) {
                doc.order = Some(index as u32);
                doc.updated_at = now;
            }
        }

        debug!(project_id, moved_id, target_id, insert_before, "reorder: applied");
        Ok(true)
    }

    /// Flip a document's enabled flag, returning the new value
    ///
    /// Has no ordering side effects.
    pub fn toggle_enabled(&mut self, doc_id: &str) -> Result<bool, StoreError> {
        let doc = self
            .get_document_mut(doc_id)
            .ok_or_else(|| StoreError::NotFound(format!("document {}", doc_id)))?;
        doc.enabled = !doc.enabled;
        doc.updated_at = now_ms();
        Ok(doc.enabled)
    }

    /// Replace a document's content, recomputing the word-count cache
    pub fn update_content(&mut self, doc_id: &str, content: &str) -> Result<(), StoreError> {
        let doc = self
            .get_document_mut(doc_id)
            .ok_or_else(|| StoreError::NotFound(format!("document {}", doc_id)))?;
        doc.content = content.to_string();
        doc.word_count = markup::word_count(&markup::to_plain_text(content)) as u32;
        doc.updated_at = now_ms();
        Ok(())
    }

    /// Rename a document
    pub fn rename_document(&mut self, doc_id: &str, title: &str) -> Result<(), StoreError> {
        if title.trim().is_empty() {
            return Err(StoreError::Validation("document title must not be empty".to_string()));
        }
        let doc = self
            .get_document_mut(doc_id)
            .ok_or_else(|| StoreError::NotFound(format!("document {}", doc_id)))?;
        doc.set_title(title.trim());
        Ok(())
    }

    /// Change a document's kind
    pub fn set_document_kind(&mut self, doc_id: &str, kind: DocumentKind) -> Result<(), StoreError> {
        let doc = self
            .get_document_mut(doc_id)
            .ok_or_else(|| StoreError::NotFound(format!("document {}", doc_id)))?;
        doc.set_kind(kind);
        Ok(())
    }

    /// Delete a document; clears the active-document cursor if it was open
    pub fn delete_document(&mut self, doc_id: &str) -> Result<(), StoreError> {
        let before = self.documents.len();
        self.documents.retain(|d| d.id != doc_id);
        if self.documents.len() == before {
            return Err(StoreError::NotFound(format!("document {}", doc_id)));
        }
        if self.active_document.as_deref() == Some(doc_id) {
            self.active_document = None;
        }
        if self.settings.last_document_id.as_deref() == Some(doc_id) {
            self.settings.last_document_id = None;
        }
        info!(doc_id, "Deleted document");
        Ok(())
    }

    // === Cursors ===

    /// Select the current project; switching clears the active document
    pub fn set_current_project(&mut self, project_id: &str) -> Result<(), StoreError> {
        if self.get_project(project_id).is_none() {
            return Err(StoreError::NotFound(format!("project {}", project_id)));
        }
        if self.current_project.as_deref() != Some(project_id) {
            self.active_document = None;
            self.settings.last_document_id = None;
        }
        self.current_project = Some(project_id.to_string());
        self.settings.last_project_id = Some(project_id.to_string());
        Ok(())
    }

    /// Open a document in the editor
    ///
    /// The document's project must be the current project; if no project
    /// is selected yet, the document's project becomes current.
    pub fn set_active_document(&mut self, doc_id: &str) -> Result<(), StoreError> {
        let project_id = self
            .get_document(doc_id)
            .map(|d| d.project_id.clone())
            .ok_or_else(|| StoreError::NotFound(format!("document {}", doc_id)))?;

        match &self.current_project {
            Some(current) if *current != project_id => {
                return Err(StoreError::Validation(format!(
                    "document {} belongs to project {}, not the current project",
                    doc_id, project_id
                )));
            }
            Some(_) => {}
            None => {
                self.current_project = Some(project_id.clone());
                self.settings.last_project_id = Some(project_id);
            }
        }

        self.active_document = Some(doc_id.to_string());
        self.settings.last_document_id = Some(doc_id.to_string());
        Ok(())
    }

    /// The document currently open in the editor, if any
    pub fn active_document(&self) -> Option<&Document> {
        self.active_document
            .as_deref()
            .and_then(|id| self.get_document(id))
    }

    /// The currently selected project id, if any
    pub fn current_project(&self) -> Option<&str> {
        self.current_project.as_deref()
    }

    // === Settings ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Iterate all documents (persistence and assembly use this)
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_project() -> (DocumentStore, String) {
        let mut store = DocumentStore::new();
        let project = store.create_project("Novel", "fantasy", "", None).unwrap();
        (store, project)
    }

    fn orders(store: &mut DocumentStore, project: &str) -> Vec<(String, u32)> {
        store
            .list_documents(project)
            .iter()
            .map(|d| (d.title.clone(), d.order.unwrap()))
            .collect()
    }

    #[test]
    fn test_create_project_rejects_empty_title() {
        let mut store = DocumentStore::new();
        assert!(matches!(
            store.create_project("  ", "", "", None),
            Err(StoreError::Validation(_))
        ));
        assert!(store.list_projects().is_empty());
    }

    #[test]
    fn test_create_document_requires_project() {
        let mut store = DocumentStore::new();
        assert!(matches!(
            store.create_document("no-such-project", "Ch 1", DocumentKind::Chapter),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_documents_ordered_by_creation() {
        let (mut store, project) = store_with_project();
        store.create_document(&project, "A", DocumentKind::Chapter).unwrap();
        store.create_document(&project, "B", DocumentKind::Chapter).unwrap();
        store.create_document(&project, "C", DocumentKind::Notes).unwrap();

        assert_eq!(
            orders(&mut store, &project),
            vec![
                ("A".to_string(), 0),
                ("B".to_string(), 1),
                ("C".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_cascade_delete_removes_only_own_documents() {
        let mut store = DocumentStore::new();
        let p1 = store.create_project("One", "", "", None).unwrap();
        let p2 = store.create_project("Two", "", "", None).unwrap();
        store.create_document(&p1, "A", DocumentKind::Chapter).unwrap();
        store.create_document(&p1, "B", DocumentKind::Chapter).unwrap();
        let keep = store.create_document(&p2, "C", DocumentKind::Chapter).unwrap();

        store.delete_project(&p1).unwrap();

        assert!(store.get_project(&p1).is_none());
        assert_eq!(store.documents().len(), 1);
        assert_eq!(store.documents()[0].id, keep);
    }

    #[test]
    fn test_delete_project_clears_cursors() {
        let (mut store, project) = store_with_project();
        let doc = store.create_document(&project, "A", DocumentKind::Chapter).unwrap();
        store.set_current_project(&project).unwrap();
        store.set_active_document(&doc).unwrap();

        store.delete_project(&project).unwrap();

        assert!(store.current_project().is_none());
        assert!(store.active_document().is_none());
        assert!(store.settings().last_project_id.is_none());
        assert!(store.settings().last_document_id.is_none());
    }

    #[test]
    fn test_reorder_move_to_front() {
        // Moving the order-2 document before order-0 shifts the rest down
        let (mut store, project) = store_with_project();
        let a = store.create_document(&project, "A", DocumentKind::Chapter).unwrap();
        store.create_document(&project, "B", DocumentKind::Chapter).unwrap();
        let c = store.create_document(&project, "C", DocumentKind::Chapter).unwrap();

        let moved = store.reorder(&project, &c, &a, true).unwrap();
        assert!(moved);
        assert_eq!(
            orders(&mut store, &project),
            vec![
                ("C".to_string(), 0),
                ("A".to_string(), 1),
                ("B".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_reorder_insert_after() {
        let (mut store, project) = store_with_project();
        let a = store.create_document(&project, "A", DocumentKind::Chapter).unwrap();
        let b = store.create_document(&project, "B", DocumentKind::Chapter).unwrap();
        store.create_document(&project, "C", DocumentKind::Chapter).unwrap();

        assert!(store.reorder(&project, &a, &b, false).unwrap());
        assert_eq!(
            orders(&mut store, &project),
            vec![
                ("B".to_string(), 0),
                ("A".to_string(), 1),
                ("C".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_reorder_cross_project_is_noop() {
        let mut store = DocumentStore::new();
        let p1 = store.create_project("One", "", "", None).unwrap();
        let p2 = store.create_project("Two", "", "", None).unwrap();
        let a = store.create_document(&p1, "A", DocumentKind::Chapter).unwrap();
        let b = store.create_document(&p2, "B", DocumentKind::Chapter).unwrap();

        assert!(!store.reorder(&p1, &a, &b, true).unwrap());
        assert_eq!(orders(&mut store, &p1), vec![("A".to_string(), 0)]);
    }

    #[test]
    fn test_reorder_missing_document_is_noop() {
        let (mut store, project) = store_with_project();
        let a = store.create_document(&project, "A", DocumentKind::Chapter).unwrap();
        assert!(!store.reorder(&project, &a, "ghost", true).unwrap());
        assert!(!store.reorder(&project, "ghost", &a, true).unwrap());
    }

    #[test]
    fn test_reorder_normalizes_sparse_orders() {
        let (mut store, project) = store_with_project();
        let a = store.create_document(&project, "A", DocumentKind::Chapter).unwrap();
        let b = store.create_document(&project, "B", DocumentKind::Chapter).unwrap();
        let c = store.create_document(&project, "C", DocumentKind::Chapter).unwrap();

        // Simulate imported data with sparse, duplicated orders
        store.get_document_mut(&a).unwrap().order = Some(5);
        store.get_document_mut(&b).unwrap().order = Some(5);
        store.get_document_mut(&c).unwrap().order = None;

        assert!(store.reorder(&project, &b, &c, false).unwrap());

        let mut got: Vec<u32> = store
            .list_documents(&project)
            .iter()
            .map(|d| d.order.unwrap())
            .collect();
        got.sort_unstable();
        assert_eq!(got, vec![0, 1, 2]);
    }

    #[test]
    fn test_list_documents_repairs_missing_orders() {
        let (mut store, project) = store_with_project();
        let a = store.create_document(&project, "A", DocumentKind::Chapter).unwrap();
        store.get_document_mut(&a).unwrap().order = None;

        let docs = store.list_documents(&project);
        assert!(docs.iter().all(|d| d.order.is_some()));
    }

    #[test]
    fn test_toggle_enabled_no_ordering_side_effects() {
        let (mut store, project) = store_with_project();
        let a = store.create_document(&project, "A", DocumentKind::Chapter).unwrap();
        store.create_document(&project, "B", DocumentKind::Chapter).unwrap();

        let before: Vec<_> = orders(&mut store, &project);
        assert!(!store.toggle_enabled(&a).unwrap());
        assert!(store.toggle_enabled(&a).unwrap());
        assert_eq!(orders(&mut store, &project), before);
    }

    #[test]
    fn test_delete_active_document_clears_cursor() {
        let (mut store, project) = store_with_project();
        let a = store.create_document(&project, "A", DocumentKind::Chapter).unwrap();
        store.set_current_project(&project).unwrap();
        store.set_active_document(&a).unwrap();

        store.delete_document(&a).unwrap();
        assert!(store.active_document().is_none());
    }

    #[test]
    fn test_active_document_must_match_current_project() {
        let mut store = DocumentStore::new();
        let p1 = store.create_project("One", "", "", None).unwrap();
        let p2 = store.create_project("Two", "", "", None).unwrap();
        let doc = store.create_document(&p2, "B", DocumentKind::Chapter).unwrap();

        store.set_current_project(&p1).unwrap();
        assert!(matches!(
            store.set_active_document(&doc),
            Err(StoreError::Validation(_))
        ));

        store.set_current_project(&p2).unwrap();
        store.set_active_document(&doc).unwrap();
        assert_eq!(store.active_document().unwrap().id, doc);
    }

    #[test]
    fn test_switching_project_clears_active_document() {
        let mut store = DocumentStore::new();
        let p1 = store.create_project("One", "", "", None).unwrap();
        let p2 = store.create_project("Two", "", "", None).unwrap();
        let doc = store.create_document(&p1, "A", DocumentKind::Chapter).unwrap();

        store.set_current_project(&p1).unwrap();
        store.set_active_document(&doc).unwrap();
        store.set_current_project(&p2).unwrap();

        assert!(store.active_document().is_none());
    }

    #[test]
    fn test_update_content_recomputes_word_count() {
        let (mut store, project) = store_with_project();
        let doc = store.create_document(&project, "A", DocumentKind::Chapter).unwrap();

        store
            .update_content(&doc, "<p>Five words are in here.</p>")
            .unwrap();
        assert_eq!(store.get_document(&doc).unwrap().word_count, 5);

        store.update_content(&doc, "").unwrap();
        assert_eq!(store.get_document(&doc).unwrap().word_count, 0);
    }

    #[test]
    fn test_project_word_count_is_derived() {
        let (mut store, project) = store_with_project();
        let a = store.create_document(&project, "A", DocumentKind::Chapter).unwrap();
        let b = store.create_document(&project, "B", DocumentKind::Chapter).unwrap();
        store.update_content(&a, "<p>one two three</p>").unwrap();
        store.update_content(&b, "<p>four five</p>").unwrap();

        assert_eq!(store.project_word_count(&project), 5);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let (mut store, project) = store_with_project();
        let doc = store.create_document(&project, "A", DocumentKind::Chapter).unwrap();
        store.update_content(&doc, "<p>hello world</p>").unwrap();
        store.set_current_project(&project).unwrap();
        store.set_active_document(&doc).unwrap();

        let snapshot = store.snapshot();
        let restored = DocumentStore::restore(snapshot);

        assert_eq!(restored.list_projects(), store.list_projects());
        assert_eq!(restored.documents(), store.documents());
        assert_eq!(restored.settings(), store.settings());
        assert_eq!(restored.current_project(), Some(project.as_str()));
        assert_eq!(restored.active_document().unwrap().id, doc);
    }
}
