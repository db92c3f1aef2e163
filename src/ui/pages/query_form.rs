use dioxus::prelude::*;

use hotel_pricing_assistant::{
    domain::{
        hour_label, Amenity, FieldValue, PresentationState, QueryDraft, QueryField, RoomType,
        ValidationError, MAX_HOUR,
    },
    SubmissionError, SubmissionOrchestrator,
};

use crate::ui::{
    components::toast::{push_toast, ToastKind, ToastMessage},
    theme,
};

#[component]
pub fn QueryFormPage(submitting: bool) -> Element {
    let orchestrator = use_context::<SubmissionOrchestrator>();
    let state = use_context::<Signal<PresentationState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    // Keep the last submitted query in the form after a failure.
    let mut draft = use_signal(|| {
        state
            .peek()
            .query()
            .map(QueryDraft::from)
            .unwrap_or_default()
    });
    let mut error = use_signal(|| None::<ValidationError>);
    // Raw text so partial entries such as "2." survive re-rendering.
    let mut distance_text = use_signal(|| draft.peek().distance_from_city_center().to_string());

    let current = draft();
    let check_in = hour_label(current.check_in_hour());
    let check_out = hour_label(current.check_out_hour());
    let room_value = current
        .room_type()
        .map(|room| room.as_str())
        .unwrap_or_default();
    let pending = error();
    let location_error = field_message(pending.as_ref(), QueryField::Location);
    let room_error = field_message(pending.as_ref(), QueryField::RoomType);
    let distance_error = field_message(pending.as_ref(), QueryField::DistanceFromCityCenter);

    let mut apply_raw = move |field: QueryField, raw: String| {
        let result = draft.with_mut(|d| d.set_raw(field.name(), &raw));
        match result {
            Ok(()) => {
                if field_message(error.peek().as_ref(), field).is_some() {
                    error.set(None);
                }
            }
            Err(err) => error.set(Some(err)),
        }
    };

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if let Some(err) = error.peek().clone() {
            push_toast(toasts, ToastKind::Warning, err.to_string());
            return;
        }
        let query = match draft.peek().finalize() {
            Ok(query) => query,
            Err(err) => {
                push_toast(toasts, ToastKind::Warning, err.to_string());
                error.set(Some(err));
                return;
            }
        };
        error.set(None);

        let orchestrator = orchestrator.clone();
        spawn(async move {
            // A failed attempt must be dismissed before the next one starts.
            if matches!(orchestrator.state(), PresentationState::Error(..)) {
                if let Err(err) = orchestrator.reset() {
                    tracing::warn!(error = %err, "could not clear previous failure");
                }
            }
            match orchestrator.submit(query).await {
                Ok(_) | Err(SubmissionError::Failed(_)) => {}
                Err(SubmissionError::Transition(err)) => {
                    push_toast(toasts, ToastKind::Warning, err.to_string());
                }
            }
        });
    };

    rsx! {
        form {
            class: "{theme::PANEL} query-form",
            onsubmit: on_submit,
            h2 { class: "{theme::PANEL_TITLE}", "Hotel Details" }

            div { class: "form-grid",
                div {
                    label { class: "{theme::LABEL}", "Hotel name" }
                    input {
                        class: "{theme::INPUT}",
                        placeholder: "Optional",
                        disabled: submitting,
                        value: "{current.hotel_name()}",
                        oninput: move |evt| draft.with_mut(|d| d.set_field(FieldValue::HotelName(evt.value()))),
                    }
                }
                div {
                    label { class: "{theme::LABEL}", "Location" }
                    input {
                        class: "{theme::INPUT}",
                        placeholder: "e.g. Jaipur",
                        disabled: submitting,
                        value: "{current.location()}",
                        oninput: move |evt| apply_raw(QueryField::Location, evt.value()),
                    }
                    if let Some(message) = location_error {
                        p { class: "field-error", "{message}" }
                    }
                }
                div {
                    label { class: "{theme::LABEL}", "Room type" }
                    select {
                        class: "{theme::INPUT}",
                        disabled: submitting,
                        value: "{room_value}",
                        onchange: move |evt| apply_raw(QueryField::RoomType, evt.value()),
                        option { value: "", "Select a room type" }
                        for room in RoomType::ALL {
                            option { value: "{room.as_str()}", "{room}" }
                        }
                    }
                    if let Some(message) = room_error {
                        p { class: "field-error", "{message}" }
                    }
                }
                div {
                    label { class: "{theme::LABEL}", "Distance from city center (km)" }
                    input {
                        class: "{theme::INPUT}",
                        r#type: "number",
                        min: "0",
                        step: "0.1",
                        disabled: submitting,
                        value: "{distance_text}",
                        oninput: move |evt| {
                            let raw = evt.value();
                            distance_text.set(raw.clone());
                            apply_raw(QueryField::DistanceFromCityCenter, raw);
                        },
                    }
                    if let Some(message) = distance_error {
                        p { class: "field-error", "{message}" }
                    }
                }
                div {
                    label { class: "{theme::LABEL}", "Check-in: {check_in}" }
                    input {
                        class: "slider",
                        r#type: "range",
                        min: "0",
                        max: "{MAX_HOUR}",
                        disabled: submitting,
                        value: "{current.check_in_hour()}",
                        oninput: move |evt| apply_raw(QueryField::CheckInHour, evt.value()),
                    }
                }
                div {
                    label { class: "{theme::LABEL}", "Check-out: {check_out}" }
                    input {
                        class: "slider",
                        r#type: "range",
                        min: "0",
                        max: "{MAX_HOUR}",
                        disabled: submitting,
                        value: "{current.check_out_hour()}",
                        oninput: move |evt| apply_raw(QueryField::CheckOutHour, evt.value()),
                    }
                }
            }

            fieldset { class: "amenities",
                legend { class: "{theme::LABEL}", "Amenities" }
                for amenity in Amenity::ALL {
                    label { class: "amenity-option",
                        input {
                            r#type: "checkbox",
                            disabled: submitting,
                            checked: current.has_amenity(amenity),
                            onchange: move |_| draft.with_mut(|d| d.toggle_amenity(amenity)),
                        }
                        span { "{amenity.label()}" }
                    }
                }
            }

            div { class: "form-actions",
                button {
                    class: "{theme::BUTTON_PRIMARY}",
                    r#type: "submit",
                    disabled: submitting,
                    if submitting { "Analyzing..." } else { "Get Insights" }
                }
            }
        }
    }
}

/// Message to show under `field`, if the pending error belongs to it.
fn field_message(error: Option<&ValidationError>, field: QueryField) -> Option<String> {
    error
        .filter(|err| err.field() == Some(field))
        .map(ValidationError::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_distance_is_reported_under_its_input() {
        let mut draft = QueryDraft::new();
        let err = draft
            .set_raw(QueryField::DistanceFromCityCenter.name(), "")
            .unwrap_err();

        assert!(field_message(Some(&err), QueryField::DistanceFromCityCenter).is_some());
        assert_eq!(field_message(Some(&err), QueryField::Location), None);
        assert_eq!(field_message(None, QueryField::DistanceFromCityCenter), None);
    }
}
