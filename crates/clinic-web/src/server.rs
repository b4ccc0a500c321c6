//! Web服务器

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use clinic_core::Result;
use clinic_database::PatientRepository;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::handlers::{add_patient, delete_patient, index, view_patients};
use crate::pages::{HtmlPages, PageRenderer};

/// 请求处理共享的只读状态
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn PatientRepository>,
    pub pages: Arc<dyn PageRenderer>,
}

impl AppState {
    pub fn new(repository: Arc<dyn PatientRepository>) -> Self {
        Self {
            repository,
            pages: Arc::new(HtmlPages),
        }
    }

    /// 替换页面渲染实现
    pub fn with_pages(mut self, pages: Arc<dyn PageRenderer>) -> Self {
        self.pages = pages;
        self
    }
}

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        let app = Self::create_app(state);

        Self { addr, app }
    }

    pub fn create_app(state: AppState) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/add_patient", post(add_patient))
            .route("/view_patients", get(view_patients))
            .route("/delete_patient/:id", delete(delete_patient))
            .with_state(state)
            // 全局中间件
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(
                        CorsLayer::new()
                            .allow_origin(Any)
                            .allow_methods(Any)
                            .allow_headers(Any),
                    ),
            )
    }

    /// 运行直到 `shutdown` 完成
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Web server stopped");
        Ok(())
    }
}
