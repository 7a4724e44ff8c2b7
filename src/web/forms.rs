use axum::{
    extract::{Form, State},
    response::Html,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    records::{CastingApplication, ContactMessage, Submission, timestamp_now},
    web::{
        AppState,
        responses::{PageError, server_error},
        templates::{PageLayout, render_page, render_success_page},
    },
};

#[derive(Deserialize)]
pub struct CastingForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub profile_link: String,
}

#[derive(Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

pub async fn casting_page() -> Html<String> {
    let body = r#"        <section class="panel">
            <h1>Casting</h1>
            <p class="lead">We are always looking for fresh faces. Tell us a little about yourself.</p>
            <form method="post" action="/casting">
                <label for="name">Full name</label>
                <input id="name" name="name">
                <label for="age">Age</label>
                <input id="age" name="age">
                <label for="city">City</label>
                <input id="city" name="city">
                <label for="experience">Acting experience</label>
                <textarea id="experience" name="experience"></textarea>
                <label for="profile_link">Showreel or profile link</label>
                <input id="profile_link" type="url" name="profile_link">
                <button type="submit">Apply</button>
            </form>
        </section>"#;

    Html(render_page(PageLayout::new("Casting", body).active("/casting")))
}

pub async fn submit_casting(
    State(state): State<AppState>,
    Form(form): Form<CastingForm>,
) -> Result<Html<String>, PageError> {
    let submission = Submission::Casting(CastingApplication {
        created_at: timestamp_now(),
        name: form.name,
        age: form.age,
        city: form.city,
        experience: form.experience,
        profile_link: form.profile_link,
    });

    state.records().append(&submission).await.map_err(|err| {
        error!(?err, "failed to record casting application");
        server_error()
    })?;
    info!("casting application accepted");

    Ok(Html(render_success_page(
        "Casting Application Received",
        "Thank you! Your casting application has been received.",
    )))
}

pub async fn contact_page() -> Html<String> {
    let body = r#"        <section class="panel">
            <h1>Contact</h1>
            <p class="lead">Questions, collaborations or feedback on our films? Drop us a line.</p>
            <form method="post" action="/contact">
                <label for="name">Name</label>
                <input id="name" name="name">
                <label for="email">Email</label>
                <input id="email" type="email" name="email">
                <label for="message">Message</label>
                <textarea id="message" name="message"></textarea>
                <button type="submit">Send message</button>
            </form>
        </section>"#;

    Html(render_page(PageLayout::new("Contact", body).active("/contact")))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<Html<String>, PageError> {
    let submission = Submission::Contact(ContactMessage {
        created_at: timestamp_now(),
        name: form.name,
        email: form.email,
        message: form.message,
    });

    state.records().append(&submission).await.map_err(|err| {
        error!(?err, "failed to record contact message");
        server_error()
    })?;
    info!("contact message accepted");

    Ok(Html(render_success_page(
        "Message Sent",
        "Thank you! Your message has been received.",
    )))
}
