//! Dependent Select Component
//!
//! A `<select>` rendering whatever option list its field currently holds.

use leptos::prelude::*;

use super::SignalField;

#[component]
pub fn DependentSelect(
    field: SignalField,
    label: &'static str,
    on_change: impl Fn() + 'static,
) -> impl IntoView {
    view! {
        <div class="mb-3">
            <label class="form-label" for=field.id()>{label}</label>
            <select
                class="form-select"
                id=field.id()
                name=field.id()
                prop:value=move || field.value.get()
                on:change=move |ev| {
                    field.value.set(event_target_value(&ev));
                    on_change();
                }
            >
                {move || field.options.get().options().iter().map(|opt| {
                    view! { <option value=opt.value.clone()>{opt.label.clone()}</option> }
                }).collect_view()}
            </select>
        </div>
    }
}

/// "Include inactive" style checkbox
#[component]
pub fn IncludeAllToggle(
    field: SignalField,
    label: &'static str,
    on_change: impl Fn() + 'static,
) -> impl IntoView {
    view! {
        <div class="form-check mb-3">
            <input
                type="checkbox"
                class="form-check-input"
                id=field.id()
                prop:checked=move || field.checked.get()
                on:change=move |ev| {
                    field.checked.set(event_target_checked(&ev));
                    on_change();
                }
            />
            <label class="form-check-label" for=field.id()>{label}</label>
        </div>
    }
}
