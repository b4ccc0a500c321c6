//! # Clinic Web
//!
//! 患者记录服务的HTTP层：路由、请求体解析、错误响应与页面渲染。

pub mod error;
pub mod handlers;
pub mod input;
pub mod pages;
pub mod server;

pub use error::{ApiError, MessageBody, Operation};
pub use pages::{HtmlPages, PageRenderer};
pub use server::{AppState, WebServer};
