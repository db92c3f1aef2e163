use dioxus::prelude::*;

use hotel_pricing_assistant::{
    domain::{Phase, PresentationState},
    util::assets,
    SubmissionOrchestrator,
};

use crate::ui::{
    components::toast::{push_toast, Toast, ToastKind, ToastMessage},
    pages::{DashboardPage, QueryFormPage},
    shell::Shell,
};

#[component]
pub fn App() -> Element {
    let orchestrator = use_context::<SubmissionOrchestrator>();

    let state = use_signal({
        let orchestrator = orchestrator.clone();
        move || orchestrator.state()
    });
    use_context_provider(|| state);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    // Mirror every state machine transition into the signal the pages read.
    let _sync = use_future(move || {
        let updates = orchestrator.subscribe();
        async move { follow_state(updates, state, toasts).await }
    });

    let page = match state() {
        PresentationState::Success(payload) => rsx! {
            DashboardPage { payload: *payload }
        },
        other => rsx! {
            QueryFormPage { submitting: other.is_submitting() }
        },
    };

    rsx! {
        document::Style { "{assets::main_css()}" }
        Shell { {page} }
        Toast {}
    }
}

async fn follow_state(
    mut updates: tokio::sync::watch::Receiver<PresentationState>,
    mut state: Signal<PresentationState>,
    toasts: Signal<Vec<ToastMessage>>,
) {
    while updates.changed().await.is_ok() {
        let next = updates.borrow_and_update().clone();
        tracing::debug!(phase = %next.phase(), "presentation state changed");
        if let PresentationState::Error(_, reason) = &next {
            push_toast(toasts, ToastKind::Error, reason.user_message());
        }
        if next.phase() == Phase::Success {
            push_toast(toasts, ToastKind::Success, "Pricing insights updated.");
        }
        state.set(next);
    }
}
