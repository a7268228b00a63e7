use tauri::window::Color;
use tauri::{AppHandle, Manager, Runtime, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tracing::{info, warn};

use crate::{AppError, AppResult};

pub const WINDOW_CODE: &str = "WINDOW/ERROR";
pub const MAIN_LABEL: &str = "main";
pub const BACKGROUND: Color = Color(27, 38, 54, 255);

pub fn item_window_label(id: i64) -> String {
    format!("item-{id}")
}

fn window_error(err: tauri::Error, label: &str) -> AppError {
    AppError::new(WINDOW_CODE, err.to_string()).with_context("label", label.to_string())
}

fn styled<'a, R: Runtime, M: Manager<R>>(
    builder: WebviewWindowBuilder<'a, R, M>,
) -> WebviewWindowBuilder<'a, R, M> {
    let builder = builder.background_color(BACKGROUND);
    #[cfg(target_os = "macos")]
    let builder = builder.title_bar_style(tauri::TitleBarStyle::Transparent);
    builder
}

/// The list window shown at startup.
#[allow(clippy::result_large_err)]
pub fn create_main_window<R: Runtime, M: Manager<R>>(manager: &M) -> AppResult<WebviewWindow<R>> {
    let builder = WebviewWindowBuilder::new(manager, MAIN_LABEL, WebviewUrl::App("index.html".into()))
        .title("todo list")
        .inner_size(700.0, 700.0);
    styled(builder)
        .build()
        .map_err(|err| window_error(err, MAIN_LABEL))
}

/// Open the detail window for `id`, or focus it when already open.
#[allow(clippy::result_large_err)]
pub fn open_item_window<R: Runtime>(app: &AppHandle<R>, id: i64) -> AppResult<()> {
    let label = item_window_label(id);
    if let Some(window) = app.get_webview_window(&label) {
        window.set_focus().map_err(|err| window_error(err, &label))?;
        info!(target: "todo_desk", event = "item_window_focused", id);
        return Ok(());
    }

    let url = WebviewUrl::App(format!("index.html#{id}").into());
    let builder = WebviewWindowBuilder::new(app, &label, url)
        .title(id.to_string())
        .inner_size(500.0, 450.0);
    styled(builder)
        .build()
        .map_err(|err| window_error(err, &label).with_context("id", id.to_string()))?;
    info!(target: "todo_desk", event = "item_window_opened", id);
    Ok(())
}

fn focused_window<R: Runtime>(app: &AppHandle<R>) -> Option<WebviewWindow<R>> {
    app.webview_windows()
        .into_values()
        .find(|window| window.is_focused().unwrap_or(false))
}

/// Close the window named `label`, falling back to whichever window has focus.
#[allow(clippy::result_large_err)]
pub fn close_window<R: Runtime>(app: &AppHandle<R>, label: Option<&str>) -> AppResult<()> {
    let target = label
        .and_then(|label| app.get_webview_window(label))
        .or_else(|| focused_window(app));
    let Some(window) = target else {
        warn!(
            target: "todo_desk",
            event = "close_window_no_target",
            label = label.unwrap_or_default()
        );
        return Ok(());
    };
    let closing = window.label().to_string();
    window.close().map_err(|err| window_error(err, &closing))?;
    info!(target: "todo_desk", event = "window_closed", label = %closing);
    Ok(())
}
