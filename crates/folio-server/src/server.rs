//! Development server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path as UrlPath, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use tokio::sync::RwLock;

use folio_markup::{ContentStore, RenderOptions};
use folio_static::assets::AssetPipeline;
use folio_static::{PageRenderer, SiteContext};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{hmr_client_script, HmrHub, HmrMessage};

const HMR_PATH: &str = "/__hmr";
const HMR_SCRIPT_PATH: &str = "/__hmr.js";

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Content TOML file with the posts
    pub content_path: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Site title
    pub title: String,

    /// Markup rendering options
    pub render: RenderOptions,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            content_path: PathBuf::from("content/posts.toml"),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
            title: "Blog".to_string(),
            render: RenderOptions::default(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// Shared server state.
struct ServerState {
    config: DevServerConfig,
    hmr: HmrHub,
    store: Arc<ContentStore>,
    pages: PageRenderer,
}

type SharedState = Arc<RwLock<ServerState>>;

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
    store: Arc<ContentStore>,
}

impl DevServer {
    /// Create a new development server over an already loaded store.
    pub fn new(config: DevServerConfig, store: Arc<ContentStore>) -> Self {
        Self { config, store }
    }

    fn router(&self) -> (Router, SharedState) {
        let pages = PageRenderer::new(
            SiteContext {
                site_title: self.config.title.clone(),
                base_url: "/".to_string(),
                scripts: vec![HMR_SCRIPT_PATH.to_string()],
            },
            self.config.render,
        );

        let state = Arc::new(RwLock::new(ServerState {
            config: self.config.clone(),
            hmr: HmrHub::new(),
            store: Arc::clone(&self.store),
            pages,
        }));

        let app = Router::new()
            .route("/", get(|| async { Redirect::temporary("/blogs/") }))
            .route("/blogs", get(index_handler))
            .route("/blogs/", get(index_handler))
            .route("/blogs/{slug}", get(post_handler))
            .route("/blogs/{slug}/", get(post_handler))
            .route("/blogs/{slug}/fragments.json", get(fragments_handler))
            .route("/assets/main.css", get(css_handler))
            .route("/assets/main.js", get(js_handler))
            .route(HMR_PATH, get(ws_handler))
            .route(HMR_SCRIPT_PATH, get(hmr_script_handler))
            .with_state(Arc::clone(&state));

        (app, state)
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr_str = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|_| ServerError::InvalidAddress(addr_str.clone()))?;

        let (app, state) = self.router();

        // Watch the directory so editors that replace the file are still seen
        let watch_dir = self
            .config
            .content_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (watcher, mut rx) =
            FileWatcher::new(&[watch_dir]).map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        tracing::info!("Starting dev server at http://{}/blogs/", addr);

        if self.config.open {
            let url = format!("http://{}/blogs/", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Check whether a watch event concerns the content file.
fn touches_content(event: &WatchEvent, content_path: &Path) -> bool {
    match event {
        WatchEvent::ContentModified(path) | WatchEvent::Created(path) => {
            path.file_name() == content_path.file_name()
        }
        WatchEvent::Deleted(_) | WatchEvent::Modified(_) => false,
    }
}

/// Handle file watch events.
async fn handle_watch_event(state: &SharedState, event: WatchEvent) {
    let content_path = state.read().await.config.content_path.clone();

    if !touches_content(&event, &content_path) {
        tracing::debug!("Ignoring change to {}", event.path().display());
        return;
    }

    tracing::info!("Content modified: {}", content_path.display());

    match ContentStore::load(&content_path) {
        Ok(store) => {
            let mut state = state.write().await;
            tracing::info!("Reloaded {} posts", store.len());
            state.store = Arc::new(store);
            state.hmr.send(HmrMessage::Reload);
        }
        Err(e) => {
            tracing::warn!("Keeping previous content: {}", e);
            let state = state.read().await;
            state.hmr.send(HmrMessage::ContentError {
                message: e.to_string(),
            });
        }
    }
}

fn not_found(slug: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(format!("<h1>Not found</h1><p>No post named {}</p>", slug)),
    )
        .into_response()
}

fn render_error(e: minijinja::Error) -> Response {
    tracing::warn!("Failed to render page: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<h1>Render error</h1>".to_string()),
    )
        .into_response()
}

/// Handler for the listing page.
async fn index_handler(State(state): State<SharedState>) -> Response {
    let state = state.read().await;

    match state.pages.render_index(&state.store) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(e),
    }
}

/// Handler for a post page.
async fn post_handler(
    UrlPath(slug): UrlPath<String>,
    State(state): State<SharedState>,
) -> Response {
    let state = state.read().await;

    let Some(post) = state.store.get(&slug) else {
        return not_found(&folio_markup::rules::escape_html(&slug));
    };

    match state.pages.render_post(post) {
        Ok(rendered) => Html(rendered.html).into_response(),
        Err(e) => render_error(e),
    }
}

/// Handler for a post's fragment JSON.
async fn fragments_handler(
    UrlPath(slug): UrlPath<String>,
    State(state): State<SharedState>,
) -> Response {
    let state = state.read().await;

    match state.store.get(&slug) {
        Some(post) => Json(post.render(state.pages.options())).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn css_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        AssetPipeline::generate_css(),
    )
}

async fn js_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        AssetPipeline::generate_js(),
    )
}

/// Handler for the HMR WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = {
        let state = state.read().await;
        state.hmr.subscribe()
    };

    if !send_message(&mut socket, &HmrMessage::Connected).await {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if !send_message(&mut socket, &msg).await {
            break;
        }
    }
}

/// Send one message; returns false once the client is gone.
async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> bool {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Failed to serialize HMR message: {}", e);
            return true;
        }
    };

    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Handler for the HMR client script.
async fn hmr_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        hmr_client_script(HMR_PATH),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = r#"
[[posts]]
slug = "hello"
title = "Hello"
content = "Hi\n```rust\nfn main() {}\n```"
"#;

    fn server() -> DevServer {
        let store = ContentStore::from_toml_str(CONTENT).unwrap();
        DevServer::new(DevServerConfig::default(), Arc::new(store))
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = server();
        assert_eq!(server.config.port, 7777);
        assert_eq!(server.config.content_path, PathBuf::from("content/posts.toml"));
    }

    #[test]
    fn only_content_file_triggers_reload() {
        let content = Path::new("content/posts.toml");

        assert!(touches_content(
            &WatchEvent::ContentModified(PathBuf::from("/abs/content/posts.toml")),
            content
        ));
        assert!(touches_content(
            &WatchEvent::Created(PathBuf::from("content/posts.toml")),
            content
        ));
        assert!(!touches_content(
            &WatchEvent::ContentModified(PathBuf::from("content/other.toml")),
            content
        ));
        assert!(!touches_content(
            &WatchEvent::Modified(PathBuf::from("content/posts.toml")),
            content
        ));
    }

    #[tokio::test]
    async fn renders_post_and_fragments() {
        let (_, state) = server().router();

        let response = post_handler(UrlPath("hello".to_string()), State(Arc::clone(&state))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response =
            fragments_handler(UrlPath("hello".to_string()), State(Arc::clone(&state))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let (_, state) = server().router();

        let response = post_handler(UrlPath("nope".to_string()), State(Arc::clone(&state))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = fragments_handler(UrlPath("nope".to_string()), State(state)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reloads_store_on_content_change() {
        let temp = tempfile::tempdir().unwrap();
        let content_path = temp.path().join("posts.toml");
        std::fs::write(&content_path, CONTENT).unwrap();

        let store = ContentStore::load(&content_path).unwrap();
        let config = DevServerConfig {
            content_path: content_path.clone(),
            ..Default::default()
        };
        let (_, state) = DevServer::new(config, Arc::new(store)).router();
        let mut rx = state.read().await.hmr.subscribe();

        std::fs::write(
            &content_path,
            "[[posts]]\nslug = \"second\"\ntitle = \"Second\"\ncontent = \"x\"\n",
        )
        .unwrap();
        handle_watch_event(&state, WatchEvent::ContentModified(content_path.clone())).await;

        assert!(state.read().await.store.get("second").is_some());
        assert_eq!(rx.try_recv().unwrap(), HmrMessage::Reload);
    }

    #[tokio::test]
    async fn keeps_store_on_invalid_content() {
        let temp = tempfile::tempdir().unwrap();
        let content_path = temp.path().join("posts.toml");
        std::fs::write(&content_path, CONTENT).unwrap();

        let store = ContentStore::load(&content_path).unwrap();
        let config = DevServerConfig {
            content_path: content_path.clone(),
            ..Default::default()
        };
        let (_, state) = DevServer::new(config, Arc::new(store)).router();
        let mut rx = state.read().await.hmr.subscribe();

        std::fs::write(&content_path, "[[posts]\n").unwrap();
        handle_watch_event(&state, WatchEvent::ContentModified(content_path.clone())).await;

        assert!(state.read().await.store.get("hello").is_some());
        assert!(matches!(
            rx.try_recv().unwrap(),
            HmrMessage::ContentError { .. }
        ));
    }
}
