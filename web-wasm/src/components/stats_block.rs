//! 統計ブロック

use crate::controller::AppController;
use leptos::prelude::*;

#[component]
pub fn StatsBlock(controller: AppController) -> impl IntoView {
    let lines = move || controller.vm.with(|vm| vm.stats().lines());

    view! {
        <div class="stats">
            {move || {
                lines()
                    .into_iter()
                    .map(|line| view! { <div class="stats-line">{line}</div> })
                    .collect_view()
            }}
        </div>
    }
}
