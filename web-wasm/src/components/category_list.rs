//! カテゴリのチェックボックス一覧

use crate::controller::AppController;
use bham311_common::category::{CategoryConfig, CategoryGroup};
use bham311_common::format::{format_count, slug};
use bham311_common::PanelEvent;
use leptos::prelude::*;

#[component]
pub fn CategoryList(controller: AppController) -> impl IntoView {
    let vm = controller.vm;
    let top = move || vm.with(|vm| vm.groups().top.clone());
    let others = move || vm.with(|vm| vm.groups().others.clone());
    let others_expanded = move || vm.with(|vm| vm.panel().others_expanded);

    view! {
        <div class="category-list">
            <div class="group-separator"></div>
            <SelectLinks controller=controller group=CategoryGroup::Top />
            <For
                each=top
                key=|config| config.name.clone()
                children=move |config| view! { <CategoryItem controller=controller config=config /> }
            />

            <Show when=move || !others().is_empty()>
                <div class="group-spacer"></div>
                <div
                    class="group-header toggle-header"
                    class:expanded=others_expanded
                    on:click=move |_| controller.dispatch(PanelEvent::ToggleOtherGroup)
                >
                    {move || format!("Other Categories ({})", others().len())}
                </div>
                <div class="toggle-container" class:expanded=others_expanded>
                    <SelectLinks controller=controller group=CategoryGroup::Others />
                    <For
                        each=others
                        key=|config| config.name.clone()
                        children=move |config| view! { <CategoryItem controller=controller config=config /> }
                    />
                </div>
            </Show>
        </div>
    }
}

/// "Select all" / "Select none"
#[component]
fn SelectLinks(controller: AppController, group: CategoryGroup) -> impl IntoView {
    let select = move |checked: bool| {
        move |ev: leptos::ev::MouseEvent| {
            ev.prevent_default();
            controller.dispatch(PanelEvent::SelectGroup { group, checked });
        }
    };

    view! {
        <div class="select-links">
            <a href="#" on:click=select(true)>"Select all"</a>
            <a href="#" on:click=select(false)>"Select none"</a>
        </div>
    }
}

#[component]
fn CategoryItem(controller: AppController, config: CategoryConfig) -> impl IntoView {
    let id = format!("layer-{}", slug(&config.name));
    let label = format!("{} ({})", config.name, format_count(config.count as u64));
    let name = StoredValue::new(config.name);
    let checked = move || {
        controller
            .vm
            .with(|vm| name.with_value(|name| vm.category_checked(name)))
    };

    view! {
        <div class="layer-item">
            <input
                type="checkbox"
                id=id.clone()
                prop:checked=checked
                on:change=move |ev| {
                    controller.dispatch(PanelEvent::ToggleCategory {
                        name: name.get_value(),
                        checked: event_target_checked(&ev),
                    });
                }
            />
            <label for=id class="link-cursor">{label}</label>
        </div>
    }
}
