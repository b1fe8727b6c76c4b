//! 写真の拡大表示

use crate::controller::{AppController, PhotoView};
use crate::time;
use leptos::prelude::*;

#[component]
pub fn PhotoViewer(controller: AppController) -> impl IntoView {
    let view_state = controller.photo_view;

    move || {
        view_state.get().map(|PhotoView { image_url, caption }| {
            let caption = caption.map(|c| {
                let created = c
                    .created_at
                    .as_deref()
                    .map(time::central_date)
                    .unwrap_or_else(|| "Date not available".to_string());
                view! {
                    <div class="photo-caption">
                        <strong>{c.category}</strong>
                        <br />
                        <span class="text-muted">{c.location}</span>
                        <br />
                        <span class="text-muted">{format!("Created: {} • Status: {}", created, c.status)}</span>
                    </div>
                }
            });
            view! {
                <div class="photo-modal" on:click=move |_| controller.close_photo()>
                    <span class="photo-close">"×"</span>
                    <img class="photo-modal-image" src=image_url alt="Issue photo" />
                    {caption}
                </div>
            }
        })
    }
}
