//! 左上の操作パネル

use super::boundary_controls::BoundaryControls;
use super::category_list::CategoryList;
use super::stats_block::StatsBlock;
use crate::controller::AppController;
use bham311_common::panel::PANEL_TITLE;
use bham311_common::PanelEvent;
use leptos::prelude::*;

#[component]
pub fn LayerPanel(controller: AppController) -> impl IntoView {
    let vm = controller.vm;
    let expanded = move || vm.with(|vm| vm.panel().expanded);
    let symbol = move || vm.with(|vm| vm.panel().toggle_symbol());
    let loaded = move || vm.with(|vm| vm.is_loaded());

    view! {
        <div class="layer-control" class:collapsed=move || !expanded()>
            <div class="layer-header" on:click=move |_| controller.dispatch(PanelEvent::TogglePanel)>
                <span class="layer-title">{PANEL_TITLE}</span>
                <span class="layer-toggle">{symbol}</span>
            </div>

            <Show when=expanded>
                <div class="layer-control-content">
                    <StatsBlock controller=controller />
                    <PhotoToggle controller=controller />
                    <BoundaryControls controller=controller />
                    <Show
                        when=loaded
                        fallback=|| view! { <p class="text-muted">"Loading..."</p> }
                    >
                        <CategoryList controller=controller />
                    </Show>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn PhotoToggle(controller: AppController) -> impl IntoView {
    let enabled = move || controller.vm.with(|vm| vm.photos_enabled());

    view! {
        <div class="layer-item photo-layer">
            <input
                type="checkbox"
                id="photo-layer-checkbox"
                prop:checked=enabled
                on:change=move |ev| {
                    controller.dispatch(PanelEvent::TogglePhotos(event_target_checked(&ev)));
                }
            />
            <label for="photo-layer-checkbox" class="link-cursor">"Photo Thumbnails"</label>
        </div>
    }
}
