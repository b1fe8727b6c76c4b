//! 境界レイヤーのチェックボックス

use crate::controller::AppController;
use bham311_common::view_model::BoundaryToggle;
use bham311_common::PanelEvent;
use leptos::prelude::*;

#[component]
pub fn BoundaryControls(controller: AppController) -> impl IntoView {
    let vm = controller.vm;
    let toggles = move || vm.with(|vm| vm.boundaries().to_vec());
    let select = move |visible: bool| {
        move |ev: leptos::ev::MouseEvent| {
            ev.prevent_default();
            controller.dispatch(PanelEvent::SetAllBoundaries(visible));
        }
    };

    view! {
        <div class="boundary-controls">
            <div class="group-header">"Boundaries"</div>
            <div class="select-links">
                <a href="#" on:click=select(true)>"Select all"</a>
                <a href="#" on:click=select(false)>"Select none"</a>
            </div>
            <For
                each=toggles
                key=|toggle| toggle.def.name.clone()
                children=move |toggle| view! { <BoundaryItem controller=controller toggle=toggle /> }
            />
        </div>
    }
}

#[component]
fn BoundaryItem(controller: AppController, toggle: BoundaryToggle) -> impl IntoView {
    let BoundaryToggle { def, .. } = toggle;
    let id = def.dom_id();
    let name = StoredValue::new(def.name.clone());
    let checked = move || {
        controller
            .vm
            .with(|vm| name.with_value(|name| vm.boundary_visible(name)))
    };

    view! {
        <div class="layer-item" class:indented=def.indent>
            <input
                type="checkbox"
                id=id.clone()
                prop:checked=checked
                on:change=move |ev| {
                    controller.dispatch(PanelEvent::ToggleBoundary {
                        name: name.get_value(),
                        visible: event_target_checked(&ev),
                    });
                }
            />
            <span class="boundary-swatch" style:background-color=def.color.clone()></span>
            <label for=id class="link-cursor">{def.name.clone()}</label>
        </div>
    }
}
