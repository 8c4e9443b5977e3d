//! Share button: copies the canvas link and briefly confirms.
//!
//! DESIGN
//! ======
//! The copy runs through the fallback chain in `util::share_link`. The
//! revert timer is held in a local slot: a new copy replaces (and cancels)
//! the previous timer, and unmounting the button cancels whatever is pending.

use leptos::prelude::*;

use crate::util::share_link::CopyAck;

#[cfg(test)]
#[path = "share_button_test.rs"]
mod share_button_test;

fn button_class(copied: bool) -> &'static str {
    if copied { "share-button share-button--copied" } else { "share-button" }
}

/// Button that copies `{origin}/canvas/{canvas_id}` to the clipboard.
#[component]
pub fn ShareButton(#[prop(into)] canvas_id: Signal<String>) -> impl IntoView {
    let ack = RwSignal::new(CopyAck::default());

    #[cfg(feature = "hydrate")]
    let pending = StoredValue::new_local(None::<gloo_timers::callback::Timeout>);

    #[cfg(feature = "hydrate")]
    on_cleanup(move || {
        let _ = pending.try_update_value(|slot| {
            if let Some(timer) = slot.take() {
                timer.cancel();
            }
        });
    });

    let on_click = move |_ev: leptos::ev::MouseEvent| {
        #[cfg(feature = "hydrate")]
        {
            use crate::util::share_link::{ACK_DURATION_MS, LINK_UNAVAILABLE_MESSAGE, canvas_url};

            let Some(origin) = browser::location_origin() else {
                log::warn!("share: page origin unavailable");
                browser::alert(LINK_UNAVAILABLE_MESSAGE);
                return;
            };
            let url = canvas_url(&origin, &canvas_id.get_untracked());
            leptos::task::spawn_local(async move {
                let method = browser::copy_with_fallbacks(&url).await;
                if !method.shows_ack() {
                    return;
                }
                let Some(generation) = ack.try_update(CopyAck::start) else {
                    return;
                };
                let timer = gloo_timers::callback::Timeout::new(ACK_DURATION_MS, move || {
                    let _ = ack.try_update(|a| a.expire(generation));
                });
                let _ = pending.try_update_value(|slot| {
                    if let Some(previous) = slot.replace(timer) {
                        previous.cancel();
                    }
                });
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = canvas_id;
    };

    view! {
        <button
            class=move || button_class(ack.get().is_copied())
            title="Copy a link to this canvas"
            on:click=on_click
        >
            {move || ack.get().label()}
        </button>
    }
}

#[cfg(feature = "hydrate")]
mod browser {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    use crate::util::share_link::{CopyMethod, manual_copy_message};

    pub fn location_origin() -> Option<String> {
        web_sys::window()?.location().origin().ok()
    }

    /// Walk the fallback chain until one method succeeds.
    pub async fn copy_with_fallbacks(url: &str) -> CopyMethod {
        let mut method = CopyMethod::FIRST;
        loop {
            let copied = match method {
                CopyMethod::ClipboardApi => clipboard_write(url).await,
                CopyMethod::ExecCommand => exec_command_copy(url),
                CopyMethod::ManualAlert => {
                    manual_alert(url);
                    true
                }
            };
            if copied {
                return method;
            }
            log::warn!("share: {method:?} copy failed");
            match method.fallback() {
                Some(next) => method = next,
                None => return method,
            }
        }
    }

    async fn clipboard_write(url: &str) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let navigator = window.navigator();
        // Absent outside secure contexts.
        let available = js_sys::Reflect::get(&navigator, &"clipboard".into()).is_ok_and(|v| !v.is_undefined());
        if !available {
            return false;
        }
        JsFuture::from(navigator.clipboard().write_text(url))
            .await
            .is_ok()
    }

    fn exec_command_copy(url: &str) -> bool {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return false;
        };
        let Some(body) = document.body() else {
            return false;
        };
        let Some(textarea) = document
            .create_element("textarea")
            .ok()
            .and_then(|el| el.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        else {
            return false;
        };
        textarea.set_value(url);
        let _ = textarea.set_attribute("readonly", "");
        let _ = textarea.set_attribute("style", "position:fixed;top:0;left:0;opacity:0;pointer-events:none;");
        if body.append_child(&textarea).is_err() {
            return false;
        }
        textarea.select();
        let copied = document
            .dyn_ref::<web_sys::HtmlDocument>()
            .and_then(|d| d.exec_command("copy").ok())
            .unwrap_or(false);
        let _ = body.remove_child(&textarea);
        copied
    }

    fn manual_alert(url: &str) {
        alert(&manual_copy_message(url));
    }

    pub fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
