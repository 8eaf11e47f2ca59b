//! SessionController - actor that owns the document store
//!
//! One spawned task owns the DocumentStore, the PersistenceGateway and
//! the LLM client, and processes commands strictly one at a time. The
//! long-running pieces (completion calls, the autosave delay) run as
//! separate tasks and re-enter the queue as internal messages, so the
//! actor never blocks and handlers never interleave.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use draftstore::{
    Document, DocumentKind, DocumentStore, PersistenceGateway, Project, PromptTemplates, Settings,
};

use crate::config::Config;
use crate::context;
use crate::llm::{CompletionRequest, LlmClient, LlmError};
use crate::prompts::{
    self, build_system_prompt, build_user_prompt, recent_window, RECENT_WINDOW_BRAINSTORM,
    RECENT_WINDOW_CONTINUE,
};

use super::messages::{
    GenerationKind, GenerationOutcome, GenerationParams, PromptPreview, SessionCommand,
    SessionError, SessionResponse, SettingsPatch,
};

/// A generation that has been sent but whose response has not arrived
///
/// The ticket pins the target document: a response is applied only if
/// that document is still the active one when it comes back.
struct PendingGeneration {
    request_id: Uuid,
    document_id: String,
    kind: GenerationKind,
    reply: oneshot::Sender<SessionResponse<GenerationOutcome>>,
}

/// Handle to send commands to the session actor
#[derive(Clone)]
pub struct SessionController {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionController {
    /// Spawn the session actor
    ///
    /// Loads the persisted snapshot (an unreadable or absent snapshot
    /// degrades to an empty store) and starts the command loop.
    pub fn spawn(gateway: PersistenceGateway, llm: Arc<dyn LlmClient>, config: Config) -> Self {
        let mut store = match gateway.load() {
            Some(snapshot) => DocumentStore::restore(snapshot),
            None => {
                let mut store = DocumentStore::new();
                // First run: seed user preferences from config defaults
                store.settings_mut().autosave_interval_ms = config.autosave.debounce_ms;
                store
            }
        };
        if store.settings().last_max_tokens == 0 {
            store.settings_mut().last_max_tokens = config.llm.max_tokens;
        }

        let (tx, rx) = mpsc::channel(256);

        let actor = SessionActor {
            store,
            gateway,
            llm,
            config,
            // Weak: the actor must not keep its own channel alive, or it
            // would never observe every handle being dropped
            tx: tx.downgrade(),
            pending: None,
            autosave_epoch: 0,
        };
        tokio::spawn(actor_loop(actor, rx));

        info!("SessionController spawned");
        Self { tx }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<SessionResponse<T>>) -> SessionCommand,
    ) -> SessionResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| SessionError::ChannelError)?;
        reply_rx.await.map_err(|_| SessionError::ChannelError)?
    }

    // === Project operations ===

    pub async fn create_project(
        &self,
        title: &str,
        genre: &str,
        description: &str,
        target_word_count: Option<u32>,
    ) -> SessionResponse<String> {
        let (title, genre, description) = (title.to_string(), genre.to_string(), description.to_string());
        self.request(|reply| SessionCommand::CreateProject {
            title,
            genre,
            description,
            target_word_count,
            reply,
        })
        .await
    }

    pub async fn list_projects(&self) -> SessionResponse<Vec<Project>> {
        self.request(|reply| SessionCommand::ListProjects { reply }).await
    }

    pub async fn select_project(&self, project_id: &str) -> SessionResponse<()> {
        let project_id = project_id.to_string();
        self.request(|reply| SessionCommand::SelectProject { project_id, reply })
            .await
    }

    pub async fn delete_project(&self, project_id: &str) -> SessionResponse<()> {
        let project_id = project_id.to_string();
        self.request(|reply| SessionCommand::DeleteProject { project_id, reply })
            .await
    }

    // === Document operations ===

    pub async fn create_document(&self, title: &str, kind: DocumentKind) -> SessionResponse<String> {
        let title = title.to_string();
        self.request(|reply| SessionCommand::CreateDocument { title, kind, reply })
            .await
    }

    pub async fn list_documents(&self, project_id: Option<&str>) -> SessionResponse<Vec<Document>> {
        let project_id = project_id.map(str::to_string);
        self.request(|reply| SessionCommand::ListDocuments { project_id, reply })
            .await
    }

    pub async fn open_document(&self, doc_id: &str) -> SessionResponse<Document> {
        let doc_id = doc_id.to_string();
        self.request(|reply| SessionCommand::OpenDocument { doc_id, reply })
            .await
    }

    pub async fn edit_content(&self, doc_id: &str, content: &str) -> SessionResponse<()> {
        let (doc_id, content) = (doc_id.to_string(), content.to_string());
        self.request(|reply| SessionCommand::EditContent { doc_id, content, reply })
            .await
    }

    pub async fn rename_document(&self, doc_id: &str, title: &str) -> SessionResponse<()> {
        let (doc_id, title) = (doc_id.to_string(), title.to_string());
        self.request(|reply| SessionCommand::RenameDocument { doc_id, title, reply })
            .await
    }

    pub async fn set_document_kind(&self, doc_id: &str, kind: DocumentKind) -> SessionResponse<()> {
        let doc_id = doc_id.to_string();
        self.request(|reply| SessionCommand::SetDocumentKind { doc_id, kind, reply })
            .await
    }

    pub async fn reorder(
        &self,
        moved_id: &str,
        target_id: &str,
        insert_before: bool,
    ) -> SessionResponse<bool> {
        let (moved_id, target_id) = (moved_id.to_string(), target_id.to_string());
        self.request(|reply| SessionCommand::Reorder {
            moved_id,
            target_id,
            insert_before,
            reply,
        })
        .await
    }

    pub async fn toggle_enabled(&self, doc_id: &str) -> SessionResponse<bool> {
        let doc_id = doc_id.to_string();
        self.request(|reply| SessionCommand::ToggleEnabled { doc_id, reply })
            .await
    }

    pub async fn delete_document(&self, doc_id: &str) -> SessionResponse<()> {
        let doc_id = doc_id.to_string();
        self.request(|reply| SessionCommand::DeleteDocument { doc_id, reply })
            .await
    }

    // === Settings operations ===

    pub async fn get_settings(&self) -> SessionResponse<Settings> {
        self.request(|reply| SessionCommand::GetSettings { reply }).await
    }

    pub async fn update_settings(&self, patch: SettingsPatch) -> SessionResponse<()> {
        self.request(|reply| SessionCommand::UpdateSettings { patch, reply })
            .await
    }

    pub async fn set_prompt_overrides(&self, overrides: Option<PromptTemplates>) -> SessionResponse<()> {
        self.request(|reply| SessionCommand::SetPromptOverrides { overrides, reply })
            .await
    }

    pub async fn toggle_favorite_model(&self, model_id: &str) -> SessionResponse<bool> {
        let model_id = model_id.to_string();
        self.request(|reply| SessionCommand::ToggleFavoriteModel { model_id, reply })
            .await
    }

    // === Generation ===

    pub async fn preview_prompt(
        &self,
        kind: GenerationKind,
        params: GenerationParams,
    ) -> SessionResponse<PromptPreview> {
        self.request(|reply| SessionCommand::PreviewPrompt { kind, params, reply })
            .await
    }

    /// Run one generation; resolves when the response has been applied
    /// (or discarded as stale)
    pub async fn generate(
        &self,
        kind: GenerationKind,
        params: GenerationParams,
    ) -> SessionResponse<GenerationOutcome> {
        self.request(|reply| SessionCommand::Generate { kind, params, reply })
            .await
    }

    // === Persistence ===

    pub async fn save(&self) -> SessionResponse<()> {
        self.request(|reply| SessionCommand::Save { reply }).await
    }

    pub async fn export_backup(&self) -> SessionResponse<String> {
        self.request(|reply| SessionCommand::ExportBackup { reply }).await
    }

    pub async fn import_backup(&self, text: &str) -> SessionResponse<()> {
        let text = text.to_string();
        self.request(|reply| SessionCommand::ImportBackup { text, reply })
            .await
    }

    /// Flush state and stop the actor
    pub async fn shutdown(&self) {
        let _ = self.tx.send(SessionCommand::Shutdown).await;
    }
}

/// The actor state: exclusive owner of the store for the session
struct SessionActor {
    store: DocumentStore,
    gateway: PersistenceGateway,
    llm: Arc<dyn LlmClient>,
    config: Config,
    /// Sender for internal messages (completions, autosave timers)
    tx: mpsc::WeakSender<SessionCommand>,
    /// The single in-flight generation, if any
    pending: Option<PendingGeneration>,
    /// Bumped on every edit; only the latest autosave timer may fire
    autosave_epoch: u64,
}

async fn actor_loop(mut actor: SessionActor, mut rx: mpsc::Receiver<SessionCommand>) {
    while let Some(command) = rx.recv().await {
        if matches!(command, SessionCommand::Shutdown) {
            if let Err(e) = actor.save() {
                warn!(error = %e, "Final save failed during shutdown");
            }
            break;
        }
        actor.handle(command);
    }
    debug!("Session actor stopped");
}

impl SessionActor {
    fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::CreateProject {
                title,
                genre,
                description,
                target_word_count,
                reply,
            } => {
                let result = self
                    .store
                    .create_project(&title, &genre, &description, target_word_count)
                    .map_err(SessionError::from)
                    .and_then(|id| {
                        self.save()?;
                        Ok(id)
                    });
                let _ = reply.send(result);
            }
            SessionCommand::ListProjects { reply } => {
                let _ = reply.send(Ok(self.store.list_projects().to_vec()));
            }
            SessionCommand::SelectProject { project_id, reply } => {
                let result = self
                    .store
                    .set_current_project(&project_id)
                    .map_err(SessionError::from)
                    .and_then(|()| self.save());
                let _ = reply.send(result);
            }
            SessionCommand::DeleteProject { project_id, reply } => {
                let result = self
                    .store
                    .delete_project(&project_id)
                    .map_err(SessionError::from)
                    .and_then(|()| self.save());
                let _ = reply.send(result);
            }
            SessionCommand::CreateDocument { title, kind, reply } => {
                let result = match self.store.current_project().map(str::to_string) {
                    Some(project_id) => self
                        .store
                        .create_document(&project_id, &title, kind)
                        .map_err(SessionError::from)
                        .and_then(|id| {
                            self.save()?;
                            Ok(id)
                        }),
                    None => Err(SessionError::Validation("no project selected".to_string())),
                };
                let _ = reply.send(result);
            }
            SessionCommand::ListDocuments { project_id, reply } => {
                let project_id = project_id.or_else(|| self.store.current_project().map(str::to_string));
                let result = match project_id {
                    Some(project_id) => Ok(self
                        .store
                        .list_documents(&project_id)
                        .into_iter()
                        .cloned()
                        .collect()),
                    None => Err(SessionError::Validation("no project selected".to_string())),
                };
                let _ = reply.send(result);
            }
            SessionCommand::OpenDocument { doc_id, reply } => {
                let result = self
                    .store
                    .set_active_document(&doc_id)
                    .map_err(SessionError::from)
                    .and_then(|()| {
                        self.save()?;
                        self.store.get_document(&doc_id).cloned().ok_or_else(|| {
                            SessionError::Store(draftstore::StoreError::NotFound(doc_id.clone()))
                        })
                    });
                let _ = reply.send(result);
            }
            SessionCommand::EditContent { doc_id, content, reply } => {
                let result = self.store.update_content(&doc_id, &content).map_err(SessionError::from);
                if result.is_ok() {
                    self.schedule_autosave();
                }
                let _ = reply.send(result);
            }
            SessionCommand::RenameDocument { doc_id, title, reply } => {
                let result = self
                    .store
                    .rename_document(&doc_id, &title)
                    .map_err(SessionError::from)
                    .and_then(|()| self.save());
                let _ = reply.send(result);
            }
            SessionCommand::SetDocumentKind { doc_id, kind, reply } => {
                let result = self
                    .store
                    .set_document_kind(&doc_id, kind)
                    .map_err(SessionError::from)
                    .and_then(|()| self.save());
                let _ = reply.send(result);
            }
            SessionCommand::Reorder {
                moved_id,
                target_id,
                insert_before,
                reply,
            } => {
                let result = match self.store.current_project().map(str::to_string) {
                    Some(project_id) => self
                        .store
                        .reorder(&project_id, &moved_id, &target_id, insert_before)
                        .map_err(SessionError::from)
                        .and_then(|moved| {
                            if moved {
                                self.save()?;
                            }
                            Ok(moved)
                        }),
                    None => Err(SessionError::Validation("no project selected".to_string())),
                };
                let _ = reply.send(result);
            }
            SessionCommand::ToggleEnabled { doc_id, reply } => {
                let result = self
                    .store
                    .toggle_enabled(&doc_id)
                    .map_err(SessionError::from)
                    .and_then(|enabled| {
                        self.save()?;
                        Ok(enabled)
                    });
                let _ = reply.send(result);
            }
            SessionCommand::DeleteDocument { doc_id, reply } => {
                let result = self
                    .store
                    .delete_document(&doc_id)
                    .map_err(SessionError::from)
                    .and_then(|()| self.save());
                let _ = reply.send(result);
            }
            SessionCommand::GetSettings { reply } => {
                let _ = reply.send(Ok(self.store.settings().clone()));
            }
            SessionCommand::UpdateSettings { patch, reply } => {
                self.apply_settings_patch(patch);
                let _ = reply.send(self.save());
            }
            SessionCommand::SetPromptOverrides { overrides, reply } => {
                let result = self
                    .store
                    .settings_mut()
                    .set_prompt_overrides(overrides)
                    .map_err(SessionError::from)
                    .and_then(|()| self.save());
                let _ = reply.send(result);
            }
            SessionCommand::ToggleFavoriteModel { model_id, reply } => {
                let favorited = self.store.settings_mut().toggle_favorite(&model_id);
                let _ = reply.send(self.save().map(|()| favorited));
            }
            SessionCommand::PreviewPrompt { kind, params, reply } => {
                let result = self.build_preview(&kind, &params).map(|(preview, _)| preview);
                let _ = reply.send(result);
            }
            SessionCommand::Generate { kind, params, reply } => {
                self.handle_generate(kind, params, reply);
            }
            SessionCommand::Save { reply } => {
                let _ = reply.send(self.save());
            }
            SessionCommand::ExportBackup { reply } => {
                let result = self
                    .gateway
                    .export_backup(&self.store.snapshot())
                    .map_err(SessionError::from);
                let _ = reply.send(result);
            }
            SessionCommand::ImportBackup { text, reply } => {
                let result = self
                    .gateway
                    .import_backup(&text)
                    .map_err(SessionError::from)
                    .and_then(|snapshot| {
                        self.store = DocumentStore::restore(snapshot);
                        self.save()
                    });
                let _ = reply.send(result);
            }
            SessionCommand::CompletionArrived { request_id, result } => {
                self.handle_completion(request_id, result);
            }
            SessionCommand::AutosaveFired { epoch } => {
                if epoch == self.autosave_epoch {
                    if let Err(e) = self.save() {
                        warn!(error = %e, "Autosave failed");
                    } else {
                        debug!(epoch, "Autosave complete");
                    }
                } else {
                    debug!(epoch, current = self.autosave_epoch, "Autosave superseded, skipping");
                }
            }
            // Consumed by actor_loop before handle() is reached
            SessionCommand::Shutdown => {}
        }
    }

    /// Persist the current state through the gateway
    fn save(&mut self) -> SessionResponse<()> {
        self.gateway.save(&self.store.snapshot())?;
        Ok(())
    }

    fn apply_settings_patch(&mut self, patch: SettingsPatch) {
        let settings = self.store.settings_mut();
        if let Some(theme) = patch.theme {
            settings.theme = theme;
        }
        if let Some(font_size) = patch.font_size {
            settings.font_size = font_size;
        }
        if let Some(interval) = patch.autosave_interval_ms {
            settings.autosave_interval_ms = interval;
        }
        if let Some(model) = patch.last_model {
            settings.last_model = Some(model);
        }
        if let Some(temperature) = patch.last_temperature {
            settings.last_temperature = temperature;
        }
        if let Some(max_tokens) = patch.last_max_tokens {
            settings.last_max_tokens = max_tokens;
        }
    }

    /// Reset the single-shot autosave timer
    ///
    /// Each edit bumps the epoch; a fired timer only saves if its epoch
    /// is still current, so a burst of edits coalesces into one save.
    fn schedule_autosave(&mut self) {
        self.autosave_epoch += 1;
        let epoch = self.autosave_epoch;
        let delay = std::time::Duration::from_millis(self.store.settings().autosave_interval_ms);
        let Some(tx) = self.tx.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SessionCommand::AutosaveFired { epoch }).await;
        });
    }

    /// Build the exact request one generation call would send
    ///
    /// Shared by preview and generate so the preview is byte-identical
    /// to the real call. Returns the preview and the target document id.
    fn build_preview(
        &mut self,
        kind: &GenerationKind,
        params: &GenerationParams,
    ) -> SessionResponse<(PromptPreview, String)> {
        let project_id = self
            .store
            .current_project()
            .map(str::to_string)
            .ok_or_else(|| SessionError::Validation("no project selected".to_string()))?;
        let active = self
            .store
            .active_document()
            .cloned()
            .ok_or_else(|| SessionError::Validation("no document open".to_string()))?;

        let char_count = active.content.chars().count();
        match kind {
            GenerationKind::ContinueFromCursor { offset } if *offset > char_count => {
                return Err(SessionError::Validation(format!(
                    "cursor offset {} is past the end of the document",
                    offset
                )));
            }
            GenerationKind::ImproveSelection { start, end } if start >= end || *end > char_count => {
                return Err(SessionError::Validation("selection range is empty or out of bounds".to_string()));
            }
            _ => {}
        }

        let entries = context::assemble(&mut self.store, &project_id, Some(&active.id));
        let documents_context = context::render(&entries);

        let settings = self.store.settings();
        let model = params
            .model
            .clone()
            .or_else(|| settings.last_model.clone())
            .unwrap_or_else(|| self.config.llm.model.clone());
        let temperature = params.temperature.unwrap_or(settings.last_temperature);
        let max_tokens = params.max_tokens.unwrap_or(settings.last_max_tokens);

        let plain = draftstore::to_plain_text(&active.content);

        let (system, user) = match kind {
            GenerationKind::ContinueFromEnd | GenerationKind::ContinueFromCursor { .. } => {
                let templates = prompts::resolve_templates(settings);
                (
                    build_system_prompt(&templates.system, max_tokens, &params.context_notes, &documents_context),
                    build_user_prompt(&templates.user, recent_window(&plain, RECENT_WINDOW_CONTINUE)),
                )
            }
            GenerationKind::ImproveSelection { start, end } => {
                let selection: String = active.content.chars().skip(*start).take(end - start).collect();
                (prompts::embedded::IMPROVE_SYSTEM.to_string(), selection)
            }
            GenerationKind::Brainstorm => {
                let system = build_system_prompt(
                    prompts::embedded::BRAINSTORM_SYSTEM,
                    max_tokens,
                    &params.context_notes,
                    &documents_context,
                );
                let user = if plain.trim().is_empty() {
                    prompts::embedded::BRAINSTORM_EMPTY_USER.to_string()
                } else {
                    build_user_prompt(
                        prompts::embedded::BRAINSTORM_USER,
                        recent_window(&plain, RECENT_WINDOW_BRAINSTORM),
                    )
                };
                (system, user)
            }
        };

        Ok((
            PromptPreview {
                model,
                system,
                user,
                temperature,
                max_tokens,
            },
            active.id,
        ))
    }

    fn handle_generate(
        &mut self,
        kind: GenerationKind,
        params: GenerationParams,
        reply: oneshot::Sender<SessionResponse<GenerationOutcome>>,
    ) {
        if self.pending.is_some() {
            let _ = reply.send(Err(SessionError::Validation(
                "a generation is already in flight".to_string(),
            )));
            return;
        }

        let (preview, document_id) = match self.build_preview(&kind, &params) {
            Ok(built) => built,
            Err(e) => {
                let _ = reply.send(Err(e));
                return;
            }
        };

        // Remember the knobs for next time
        {
            let settings = self.store.settings_mut();
            settings.last_model = Some(preview.model.clone());
            settings.last_temperature = preview.temperature;
            settings.last_max_tokens = preview.max_tokens;
        }

        let request_id = Uuid::now_v7();
        self.pending = Some(PendingGeneration {
            request_id,
            document_id,
            kind,
            reply,
        });

        let request = CompletionRequest {
            model: preview.model,
            system_prompt: preview.system,
            user_prompt: preview.user,
            temperature: preview.temperature,
            max_tokens: preview.max_tokens,
        };

        let Some(tx) = self.tx.upgrade() else {
            if let Some(pending) = self.pending.take() {
                let _ = pending.reply.send(Err(SessionError::ChannelError));
            }
            return;
        };

        debug!(%request_id, model = %request.model, "Generation dispatched");
        let llm = Arc::clone(&self.llm);
        tokio::spawn(async move {
            let result = llm.complete(request).await;
            let _ = tx.send(SessionCommand::CompletionArrived { request_id, result }).await;
        });
    }

    fn handle_completion(&mut self, request_id: Uuid, result: Result<String, LlmError>) {
        let Some(pending) = self.pending.take() else {
            warn!(%request_id, "Completion arrived with nothing pending, discarding");
            return;
        };
        if pending.request_id != request_id {
            warn!(%request_id, "Completion arrived for a different request, discarding");
            self.pending = Some(pending);
            return;
        }

        let text = match result {
            Ok(text) => text,
            Err(e) => {
                // The action is aborted and its trigger re-enabled; the
                // document is left untouched.
                info!(%request_id, error = %e, "Generation failed");
                let _ = pending.reply.send(Err(SessionError::Llm(e)));
                return;
            }
        };

        // Stale-response guard: the editor may have moved on while the
        // request was in flight. A response for a document that is no
        // longer open is discarded, never misapplied.
        let still_active = self
            .store
            .active_document()
            .map(|d| d.id == pending.document_id)
            .unwrap_or(false);
        if !still_active {
            info!(%request_id, doc_id = %pending.document_id, "Discarding stale completion");
            let _ = pending.reply.send(Ok(GenerationOutcome { text, applied: false }));
            return;
        }

        let content = self
            .store
            .get_document(&pending.document_id)
            .map(|d| d.content.clone())
            .unwrap_or_default();
        let updated = apply_generation(&content, &pending.kind, &text);

        let result = self
            .store
            .update_content(&pending.document_id, &updated)
            .map_err(SessionError::from)
            .and_then(|()| self.save())
            .map(|()| GenerationOutcome { text, applied: true });

        debug!(%request_id, "Generation applied");
        let _ = pending.reply.send(result);
    }
}

/// Byte index of a character offset, clamped to the end
fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Merge generated text into the document content
fn apply_generation(content: &str, kind: &GenerationKind, text: &str) -> String {
    match kind {
        GenerationKind::ContinueFromEnd | GenerationKind::Brainstorm => {
            if content.is_empty() {
                text.to_string()
            } else {
                format!("{}\n\n{}", content, text)
            }
        }
        GenerationKind::ContinueFromCursor { offset } => {
            let at = byte_offset(content, *offset);
            format!("{}{}{}", &content[..at], text, &content[at..])
        }
        GenerationKind::ImproveSelection { start, end } => {
            let from = byte_offset(content, *start);
            let to = byte_offset(content, (*end).max(*start));
            format!("{}{}{}", &content[..from], text, &content[to..])
        }
    }
}

#[cfg(test)]
mod splice_tests {
    use super::*;

    #[test]
    fn test_apply_continue_from_end() {
        assert_eq!(
            apply_generation("The story.", &GenerationKind::ContinueFromEnd, "It grew."),
            "The story.\n\nIt grew."
        );
        assert_eq!(apply_generation("", &GenerationKind::ContinueFromEnd, "Opening."), "Opening.");
    }

    #[test]
    fn test_apply_continue_from_cursor_splices() {
        let out = apply_generation("onetwo", &GenerationKind::ContinueFromCursor { offset: 3 }, "-");
        assert_eq!(out, "one-two");

        // Offset past the end clamps to append
        let out = apply_generation("abc", &GenerationKind::ContinueFromCursor { offset: 99 }, "!");
        assert_eq!(out, "abc!");
    }

    #[test]
    fn test_apply_improve_replaces_selection() {
        let out = apply_generation(
            "keep FIX keep",
            &GenerationKind::ImproveSelection { start: 5, end: 8 },
            "fixed",
        );
        assert_eq!(out, "keep fixed keep");
    }

    #[test]
    fn test_apply_handles_multibyte_offsets() {
        let out = apply_generation("ééé", &GenerationKind::ContinueFromCursor { offset: 1 }, "x");
        assert_eq!(out, "éxéé");
    }
}
