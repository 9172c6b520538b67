/// 等待进程退出信号（SIGINT / SIGTERM）。
///
/// 供 `axum::serve(...).with_graceful_shutdown` 使用：收到信号后停止接收
/// 新连接，等待在途请求（含正在渲染的转换）自然完成。
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("监听 Ctrl+C 失败: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("监听 SIGTERM 失败: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("接收到 Ctrl+C，开始优雅退出..."),
        _ = terminate => tracing::info!("接收到 SIGTERM，开始优雅退出..."),
    }
}
