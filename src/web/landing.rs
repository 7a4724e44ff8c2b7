use axum::response::Html;

use crate::web::templates::{PageLayout, escape_html, render_page};

struct FeaturedFilm {
    title: &'static str,
    url: &'static str,
    thumb: &'static str,
}

const LATEST_FILM: FeaturedFilm = FeaturedFilm {
    title: "Lamhey",
    url: "https://www.youtube.com/watch?v=H0Oi7bGxHS4",
    thumb: "https://img.youtube.com/vi/H0Oi7bGxHS4/maxresdefault.jpg",
};

pub async fn home_page() -> Html<String> {
    let film = &LATEST_FILM;
    let body = format!(
        r#"        <section class="panel">
            <h1>Stories that stay with you</h1>
            <p class="lead">We are an independent film house telling small, honest stories about families, friendships and the moments in between.</p>
        </section>
        <section class="panel">
            <h2>Latest film</h2>
            <a class="card" href="{url}" target="_blank" rel="noopener">
                <img src="{thumb}" alt="{title} thumbnail" style="width: 100%; border-radius: 10px;">
                <h3>{title}</h3>
                <span>Watch on YouTube →</span>
            </a>
        </section>
        <section class="card-grid">
            <a class="card" href="/stories"><h3>Share your story</h3><p>Send us a script or story idea as PDF, DOC or DOCX.</p></a>
            <a class="card" href="/casting"><h3>Casting calls</h3><p>Want to act in our next short film? Apply here.</p></a>
            <a class="card" href="/contact"><h3>Get in touch</h3><p>Collaborations, screenings or just a hello.</p></a>
        </section>"#,
        url = escape_html(film.url),
        thumb = escape_html(film.thumb),
        title = escape_html(film.title),
    );

    Html(render_page(PageLayout::new("Home", body).active("/")))
}

pub async fn about_page() -> Html<String> {
    let body = r#"        <section class="panel">
            <h1>About us</h1>
            <p class="lead">CineArtist Productions began as a group of friends with a borrowed camera and a notebook full of everyday stories.</p>
            <p class="lead">Today we write, shoot and edit short films that explore family, work, memory and the quiet heroes around us. We work with new writers and first-time actors whenever we can.</p>
        </section>"#;

    Html(render_page(PageLayout::new("About", body).active("/about")))
}

pub async fn films_page() -> Html<String> {
    let film = &LATEST_FILM;
    let body = format!(
        r#"        <section class="panel">
            <h1>Films</h1>
            <p class="lead">Our short films are released on YouTube.</p>
            <div class="card-grid">
                <a class="card" href="{url}" target="_blank" rel="noopener">
                    <img src="{thumb}" alt="{title} thumbnail" style="width: 100%; border-radius: 10px;">
                    <h3>{title}</h3>
                    <span>Watch now →</span>
                </a>
            </div>
        </section>"#,
        url = escape_html(film.url),
        thumb = escape_html(film.thumb),
        title = escape_html(film.title),
    );

    Html(render_page(PageLayout::new("Films", body).active("/films")))
}
