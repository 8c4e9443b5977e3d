//! Bring-to-front / send-to-back button group.

use leptos::prelude::*;

use crate::util::layer_order::{LayerCommand, controls_enabled, hint};

#[cfg(test)]
#[path = "layer_order_controls_test.rs"]
mod layer_order_controls_test;

fn button_class(command: LayerCommand) -> String {
    format!("layer-order__btn layer-order__btn--{}", command.css_modifier())
}

/// Four layer-order buttons, all disabled while nothing is selected.
#[component]
pub fn LayerOrderControls(
    #[prop(into)] has_selection: Signal<bool>,
    on_bring_to_front: Callback<()>,
    on_bring_forward: Callback<()>,
    on_send_backward: Callback<()>,
    on_send_to_back: Callback<()>,
) -> impl IntoView {
    let callback_for = move |command: LayerCommand| match command {
        LayerCommand::BringToFront => on_bring_to_front,
        LayerCommand::BringForward => on_bring_forward,
        LayerCommand::SendBackward => on_send_backward,
        LayerCommand::SendToBack => on_send_to_back,
    };
    let disabled = move || !controls_enabled(has_selection.get());

    let buttons = LayerCommand::ALL
        .into_iter()
        .map(|command| {
            let on_click = move |_ev: leptos::ev::MouseEvent| {
                if controls_enabled(has_selection.get_untracked()) {
                    callback_for(command).run(());
                }
            };
            view! {
                <button
                    class=button_class(command)
                    title=command.label()
                    data-operation=command.operation()
                    disabled=disabled
                    on:click=on_click
                >
                    {command.label()}
                </button>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div class="layer-order">
            <div class="layer-order__buttons">{buttons}</div>
            {move || hint(has_selection.get()).map(|text| view! { <p class="layer-order__hint">{text}</p> })}
        </div>
    }
}
