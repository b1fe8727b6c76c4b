//! 集計サイドバー（ハンバーガーメニューで開閉）

use crate::controller::{AppController, Loadable};
use bham311_common::analytics::{CommunityRow, IssueTypeBlock};
use bham311_common::PanelEvent;
use leptos::prelude::*;

#[component]
pub fn Sidebar(controller: AppController) -> impl IntoView {
    let open = move || controller.vm.with(|vm| vm.panel().sidebar_open);

    view! {
        <button
            class="hamburger-menu"
            class:active=open
            aria-label="Toggle analytics"
            on:click=move |_| controller.dispatch(PanelEvent::ToggleSidebar)
        >
            <span></span>
            <span></span>
            <span></span>
        </button>
        <aside class="heatmap-sidebar" class:sidebar-open=open>
            <div class="sidebar-content">
                <h4>"Most requested issue categories"</h4>
                {move || match controller.issue_types.get() {
                    Loadable::Loading => loading("Loading community statistics...").into_any(),
                    Loadable::Failed(message) => failed(message).into_any(),
                    Loadable::Ready(blocks) if blocks.is_empty() => {
                        loading("No data available").into_any()
                    }
                    Loadable::Ready(blocks) => issue_type_list(blocks).into_any(),
                }}

                <h4>"Most requested category by community"</h4>
                {move || match controller.community_rows.get() {
                    Loadable::Loading => loading("Loading...").into_any(),
                    Loadable::Failed(message) => failed(message).into_any(),
                    Loadable::Ready(rows) if rows.is_empty() => {
                        loading("No data available").into_any()
                    }
                    Loadable::Ready(rows) => community_table(rows).into_any(),
                }}
            </div>
        </aside>
    }
}

fn loading(text: &'static str) -> impl IntoView {
    view! { <div class="sidebar-placeholder">{text}</div> }
}

fn failed(message: String) -> impl IntoView {
    view! { <div class="sidebar-placeholder sidebar-error">{message}</div> }
}

fn issue_type_list(blocks: Vec<IssueTypeBlock>) -> impl IntoView {
    blocks
        .into_iter()
        .map(|block| {
            view! {
                <div class="issue-type-block">
                    <h5>{block.heading} " " <span class="text-muted">{block.total}</span></h5>
                    <div class="community-list">
                        {block
                            .communities
                            .into_iter()
                            .map(|line| view! { <div class="community-line">{line}</div> })
                            .collect_view()}
                    </div>
                </div>
            }
        })
        .collect_view()
}

fn community_table(rows: Vec<CommunityRow>) -> impl IntoView {
    view! {
        <table class="community-table">
            <tbody>
                {rows
                    .into_iter()
                    .map(|row| {
                        view! {
                            <tr>
                                <td class="community-name">{row.community}</td>
                                <td>
                                    <div>{row.issue_type}</div>
                                    <div class="text-muted">{row.share}</div>
                                </td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}
