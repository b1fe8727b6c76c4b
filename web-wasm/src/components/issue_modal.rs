//! Issue詳細モーダル

use crate::controller::{AppController, Loadable};
use crate::time;
use bham311_common::format::NOT_AVAILABLE;
use bham311_common::timeline::{EventKind, TimelineEvent};
use bham311_common::{IssueDetail, PanelEvent};
use leptos::prelude::*;

#[component]
pub fn IssueModal(controller: AppController) -> impl IntoView {
    let close = move || controller.dispatch(PanelEvent::CloseIssue);

    move || {
        controller.detail.get().map(|state| {
            let body = match state {
                Loadable::Loading => view! {
                    <div class="modal-status">"Loading issue details..."</div>
                }
                .into_any(),
                Loadable::Failed(message) => view! {
                    <div class="modal-status">
                        <div class="modal-error-title">"Error Loading Issue"</div>
                        <div class="text-muted">{message}</div>
                        <button class="btn btn-primary" on:click=move |_| close()>"Close"</button>
                    </div>
                }
                .into_any(),
                Loadable::Ready(detail) => view! {
                    <DetailBody controller=controller detail=detail />
                }
                .into_any(),
            };

            view! {
                <div class="issue-modal" on:click=move |_| close()>
                    <div class="issue-modal-content" on:click=|ev| ev.stop_propagation()>
                        <button class="modal-close" on:click=move |_| close()>"×"</button>
                        {body}
                    </div>
                </div>
            }
        })
    }
}

#[component]
fn DetailBody(controller: AppController, detail: IssueDetail) -> impl IntoView {
    let IssueDetail {
        id,
        category,
        status,
        address,
        description,
        reporter,
        reporter_email,
        image_url,
        square_image_url,
        video_url,
        seeclickfix_url,
        timeline,
        ..
    } = detail;

    let share_id = StoredValue::new(id.clone());
    let share = move |_| controller.share(share_id.get_value());
    let share_label = move || {
        if controller.share_copied.get() {
            "✓"
        } else {
            "Copy"
        }
    };
    let initial = reporter
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();
    let last_updated = move || {
        controller
            .vm
            .with(|vm| vm.stats().footer_last_updated(time::footer_date_time))
    };
    let issue_id = if id.is_empty() { NOT_AVAILABLE.to_string() } else { id };

    view! {
        <p class="modal-kicker">
            <button class="share-button" title="Copy link to clipboard" on:click=share>
                {share_label}
            </button>
            "ISSUE ID: "
            {match seeclickfix_url {
                Some(url) => view! { <a href=url target="_blank">{issue_id}</a> }.into_any(),
                None => view! { <span>{issue_id}</span> }.into_any(),
            }}
        </p>
        <h1 class="modal-title">{category}</h1>
        <p class="modal-address">{address.headline()}</p>

        {image_url.map(|src| view! {
            <div class="modal-image">
                <img src=src alt="Full Image" />
            </div>
        })}

        <section>
            <p class="modal-label">"STATUS"</p>
            <h3>{status}</h3>
        </section>

        <section>
            <p class="modal-label">"DESCRIPTION"</p>
            <p class="modal-description">
                {description.unwrap_or_else(|| "Description not available".to_string())}
            </p>
        </section>

        <section class="reporter">
            <div class="reporter-avatar">{initial}</div>
            <div>
                <p>{reporter}</p>
                {reporter_email.map(|email| view! { <p class="text-muted">{email}</p> })}
            </div>
        </section>

        <section>
            <p class="modal-label">"LOCATION"</p>
            <p>{address.full}</p>
        </section>

        <section>
            <p class="modal-label">"TIMELINE"</p>
            {if timeline.is_empty() {
                view! { <p class="text-muted">"No timeline events available"</p> }.into_any()
            } else {
                timeline.into_iter().map(timeline_entry).collect_view().into_any()
            }}
        </section>

        {square_image_url.map(|src| view! {
            <div class="modal-image">
                <img class="square-image" src=src alt="Square Image" />
            </div>
        })}

        {video_url.map(|src| view! {
            <div class="modal-image">
                <video controls>
                    <source src=src type="video/mp4" />
                    "Your browser does not support the video tag."
                </video>
            </div>
        })}

        <footer class="modal-footer">
            <p>{format!("Current time: {}", time::now_central())}</p>
            <p>"Database last updated: " {last_updated}</p>
        </footer>
    }
}

fn timeline_entry(event: TimelineEvent) -> impl IntoView {
    let date = event
        .date
        .as_deref()
        .map(time::central_date_time)
        .unwrap_or_else(|| "Date not available".to_string());

    match event.kind {
        EventKind::Comment => view! {
            <div class="timeline-event timeline-comment">
                <div class="timeline-head">
                    <strong>{event.commenter.unwrap_or_default()}</strong>
                    <span class="text-muted">{date}</span>
                </div>
                {event.commenter_email.map(|email| view! { <div class="text-muted">{email}</div> })}
                <p>{event.description}</p>
                {event.image_full.map(|src| view! { <img class="comment-image" src=src alt="Comment image" /> })}
            </div>
        }
        .into_any(),
        EventKind::Status => {
            let text = match event.old_status {
                Some(old) => format!("{} → {}", old, event.description),
                None => event.description,
            };
            view! {
                <div class="timeline-event timeline-status">
                    <div class="timeline-head">
                        <strong>{event.title}</strong>
                        <span class="text-muted">{date}</span>
                    </div>
                    <p>{text}</p>
                </div>
            }
            .into_any()
        }
    }
}
