use std::time::Duration;

use dioxus::prelude::*;

use hotel_pricing_assistant::util::generate_id;

const TOAST_AUTO_DISMISS: Duration = Duration::from_secs(6);
const MAX_VISIBLE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

impl ToastKind {
    fn theme(&self) -> (&'static str, &'static str) {
        match self {
            ToastKind::Success => ("toast toast-success", "✅"),
            ToastKind::Warning => ("toast toast-warning", "⚠️"),
            ToastKind::Error => ("toast toast-error", "⛔"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: String,
    pub kind: ToastKind,
    pub text: String,
}

impl ToastMessage {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: generate_id("toast"),
            kind,
            text: text.into(),
        }
    }
}

/// Queues a toast, dropping the oldest once more than a few are visible.
pub fn push_toast(
    mut toasts: Signal<Vec<ToastMessage>>,
    kind: ToastKind,
    message: impl Into<String>,
) {
    let message = ToastMessage::new(kind, message);
    toasts.with_mut(|entries| {
        if entries.len() >= MAX_VISIBLE {
            entries.remove(0);
        }
        entries.push(message);
    });
}

#[component]
pub fn Toast() -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let messages = toasts();

    if messages.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div { class: "toast-stack",
            ul {
                for message in messages {
                    ToastCard { key: "{message.id}", message, toasts }
                }
            }
        }
    }
}

#[component]
fn ToastCard(message: ToastMessage, toasts: Signal<Vec<ToastMessage>>) -> Element {
    let toast_id = message.id.clone();
    let _auto_dismiss = use_future(move || {
        let id = toast_id.clone();
        async move {
            tokio::time::sleep(TOAST_AUTO_DISMISS).await;
            dismiss(toasts, &id);
        }
    });

    let (class, icon) = message.kind.theme();
    let id = message.id.clone();
    rsx! {
        li {
            class: "{class}",
            span { class: "toast-icon", "{icon}" }
            p { "{message.text}" }
            button {
                class: "toast-dismiss",
                onclick: move |_| dismiss(toasts, &id),
                "Dismiss"
            }
        }
    }
}

fn dismiss(mut toasts: Signal<Vec<ToastMessage>>, id: &str) {
    toasts.with_mut(|items| items.retain(|toast| toast.id != id));
}
