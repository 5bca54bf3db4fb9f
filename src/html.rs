use crate::bootstrap::{BootstrapError, EditorSession, LifecycleState};

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// 加载失败时替代编辑器显示的错误面板，带手动重新加载按钮
pub fn error_panel_html(err: &BootstrapError) -> String {
    format!(
        r#"<div class="editor-error" role="alert">
            <p class="editor-error-title">编辑器加载失败</p>
            <p class="editor-error-message">{message}</p>
            <button type="button" class="btn btn-secondary btn-sm" data-action="reload">重新加载</button>
        </div>"#,
        message = html_escape(&err.to_string()),
    )
}

/// 编辑器容器外层的状态占位，Ready 时为空
pub fn status_html(session: &EditorSession) -> String {
    match session.state() {
        LifecycleState::Error => session
            .error()
            .map(|e| error_panel_html(&e))
            .unwrap_or_default(),
        s if s.is_pending() => r#"<div class="editor-loading">编辑器加载中...</div>"#.to_string(),
        _ => String::new(),
    }
}
