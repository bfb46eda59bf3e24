use std::sync::RwLock;

use tower_lsp_server::jsonrpc::{Error, Result};
use tower_lsp_server::ls_types::{
    CompletionOptions, CompletionParams, CompletionResponse, DidChangeTextDocumentParams,
    DidCloseTextDocumentParams, DidOpenTextDocumentParams, InitializeParams, InitializeResult,
    InitializedParams, MessageType, ServerCapabilities, ServerInfo, TextDocumentSyncCapability,
    TextDocumentSyncKind,
};
use tower_lsp_server::{Client, LanguageServer};

use crate::completion::{AntCompletionProcessor, TaskCatalog};
use crate::config::{self, AntSettings, SettingsEvent, SettingsEventKind};
use crate::document::{DocumentStore, PositionMapper};
use crate::error::AntLsError;
use crate::lsp::text_sync::apply_content_changes;
use crate::model::AntModel;

pub struct AntLs {
    client: Client,
    documents: DocumentStore,
    settings: RwLock<AntSettings>,
}

impl std::fmt::Debug for AntLs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AntLs")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl AntLs {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
            settings: RwLock::new(AntSettings::default()),
        }
    }

    fn settings(&self) -> AntSettings {
        self.settings
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    async fn report_settings_events(&self, events: &[SettingsEvent]) {
        for event in events {
            let message_type = match event.kind {
                SettingsEventKind::Info => MessageType::INFO,
                SettingsEventKind::Warning => MessageType::WARNING,
            };
            self.client
                .log_message(message_type, event.message.clone())
                .await;
        }
    }
}

impl LanguageServer for AntLs {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let outcome = config::load_settings(params.initialization_options.as_ref());
        self.report_settings_events(&outcome.events).await;
        if let Ok(mut guard) = self.settings.write() {
            *guard = outcome.settings;
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::INCREMENTAL,
                )),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(
                        ["<", "\"", ",", "$"].iter().map(|s| s.to_string()).collect(),
                    ),
                    ..CompletionOptions::default()
                }),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: "ant-ls".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            ..InitializeResult::default()
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "ant-ls initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        log::debug!("didOpen {}", doc.uri.as_str());
        self.documents
            .insert(doc.uri, doc.text, Some(doc.version));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let old_text = self.documents.get_text(&uri).unwrap_or_default();
        let new_text = apply_content_changes(&old_text, params.content_changes);
        self.documents
            .update(&uri, new_text, Some(params.text_document.version));
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        log::debug!("didClose {}", params.text_document.uri.as_str());
        self.documents.remove(&params.text_document.uri);
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some(text) = self.documents.get_text(&uri) else {
            let err = AntLsError::document_not_found(uri.as_str());
            self.client
                .log_message(MessageType::WARNING, err.to_string())
                .await;
            return Ok(None);
        };

        let mapper = PositionMapper::new(&text);
        let Some(offset) = mapper.position_to_byte(position) else {
            return Ok(None);
        };

        // One-shot catalog initialization; a failure here is unrecoverable.
        let catalog = TaskCatalog::global().map_err(internal_error)?;

        // The model and processor live only for this request.
        let model = AntModel::parse(&text);
        let settings = self.settings();
        let processor = AntCompletionProcessor::new(catalog, &model, &settings);
        let proposals = processor.proposals(&text, offset);

        log::debug!(
            "completion at {}:{}:{} produced {} proposals",
            uri.as_str(),
            position.line,
            position.character,
            proposals.len()
        );

        if proposals.is_empty() {
            return Ok(None);
        }
        let items = proposals
            .into_iter()
            .map(|proposal| proposal.into_completion_item())
            .collect();
        Ok(Some(CompletionResponse::Array(items)))
    }
}

fn internal_error(err: AntLsError) -> Error {
    log::error!("{err}");
    let mut rpc = Error::internal_error();
    rpc.message = err.to_string().into();
    rpc
}
