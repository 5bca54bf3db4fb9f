//! 媒体选择器向编辑器插入内容用的 HTML 片段

use crate::active::ActiveEditor;
use crate::bootstrap::{EditorSession, Warning};
use crate::host::EditorInstance;
use crate::html::html_escape;

pub fn image_html(src: &str, alt: &str) -> String {
    format!(
        r#"<p><img src="{}" alt="{}" style="max-width:100%;"></p>"#,
        html_escape(src),
        html_escape(alt)
    )
}

pub fn video_html(src: &str, poster: Option<&str>) -> String {
    let poster = poster
        .filter(|p| !p.is_empty())
        .map(|p| format!(r#" poster="{}""#, html_escape(p)))
        .unwrap_or_default();
    format!(
        r#"<p><video src="{}"{poster} controls="controls" style="max-width:100%;"></video></p>"#,
        html_escape(src)
    )
}

pub fn link_html(href: &str, text: &str) -> String {
    let text = if text.is_empty() { href } else { text };
    format!(
        r#"<a href="{}" target="_blank">{}</a>"#,
        html_escape(href),
        html_escape(text)
    )
}

/// 追加到会话内容末尾，会话未就绪或写入失败时返回 false
pub fn insert_html(session: &EditorSession, html: &str) -> bool {
    if !session.is_ready() {
        return false;
    }
    match session.instance() {
        Some(instance) => append(instance.as_ref(), html),
        None => false,
    }
}

/// 没有会话引用时，追加到当前活动编辑器
pub fn insert_into_active(active: &ActiveEditor, html: &str) -> bool {
    let Some(instance) = active.get() else {
        tracing::warn!("没有可用的编辑器，插入内容被丢弃");
        return false;
    };
    append(instance.as_ref(), html)
}

fn append(instance: &dyn EditorInstance, html: &str) -> bool {
    let current = instance.get_content();
    match instance.set_content(&format!("{current}{html}")) {
        Ok(()) => true,
        Err(e) => {
            Warning::ContentApply(e).log();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{EditorEvent, InstanceError, Listener};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Buffer {
        content: Mutex<String>,
    }

    impl EditorInstance for Buffer {
        fn add_listener(&self, _event: EditorEvent, _listener: Listener) {}

        fn get_content(&self) -> String {
            self.content.lock().unwrap().clone()
        }

        fn set_content(&self, html: &str) -> Result<(), InstanceError> {
            *self.content.lock().unwrap() = html.to_string();
            Ok(())
        }

        fn destroy(&self) -> Result<(), InstanceError> {
            Ok(())
        }
    }

    #[test]
    fn image_attributes_are_escaped() {
        let html = image_html("/media/2024/01/a.png", r#"say "hi" & <bye>"#);
        assert_eq!(
            html,
            r#"<p><img src="/media/2024/01/a.png" alt="say &quot;hi&quot; &amp; &lt;bye&gt;" style="max-width:100%;"></p>"#
        );
    }

    #[test]
    fn video_poster_is_optional() {
        assert!(!video_html("/v.mp4", None).contains("poster"));
        assert!(!video_html("/v.mp4", Some("")).contains("poster"));
        assert!(video_html("/v.mp4", Some("/p.jpg")).contains(r#"poster="/p.jpg""#));
    }

    #[test]
    fn link_falls_back_to_href() {
        assert_eq!(
            link_html("https://example.com", ""),
            r#"<a href="https://example.com" target="_blank">https://example.com</a>"#
        );
    }

    #[test]
    fn inserts_into_active_editor() {
        let active = ActiveEditor::new();
        assert!(!insert_into_active(&active, "<p>x</p>"));

        let buffer: Arc<dyn EditorInstance> = Arc::new(Buffer::default());
        buffer.set_content("<p>A</p>").unwrap();
        assert!(active.set_if_empty(&buffer));

        assert!(insert_into_active(&active, &image_html("/a.png", "")));
        assert_eq!(
            buffer.get_content(),
            r#"<p>A</p><p><img src="/a.png" alt="" style="max-width:100%;"></p>"#
        );
    }
}
