//! Command-line walk through a Bookmarker session.
//!
//! Usage: `demo-bookmarker [PATH]` where PATH is a client route such as
//! `/app/` (the default) or a shared link like `/https://example.com/`.
//! Credentials come from `BOOKMARKER_EMAIL` and `BOOKMARKER_PASSWORD`.

use bookmarker::{
    Bookmarker, BookmarkerError, Credentials, Filters, NavigationOutcome, NewBookmark, Route,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("bookmarker=debug,{}=debug,info", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn credentials_from_env() -> Option<Credentials> {
    let email = std::env::var("BOOKMARKER_EMAIL").ok()?;
    let password = std::env::var("BOOKMARKER_PASSWORD").ok()?;
    Some(Credentials::new(email, password))
}

async fn run(app: &mut Bookmarker, target: String) -> Result<(), BookmarkerError> {
    let mut outcome: NavigationOutcome = app.navigate(target).await?;
    tracing::info!("Navigated to {}", outcome.location);

    if matches!(outcome.route, Route::Login) {
        let Some(credentials) = credentials_from_env() else {
            tracing::info!("Login required; set BOOKMARKER_EMAIL and BOOKMARKER_PASSWORD");
            return Ok(());
        };
        outcome = app.login(&credentials).await?;
        tracing::info!("Logged in, now at {}", outcome.location);
    }

    match outcome.route {
        Route::Library => {
            app.update_lists().await?;
            let filters = match outcome.location.query_value("list") {
                Some(list) => match list.parse() {
                    Ok(id) => Filters::default().list(id),
                    Err(_) => Filters::default(),
                },
                None => Filters::default(),
            };
            app.update_bookmarks(filters).await?;

            for list in &app.library().lists {
                println!("[list {}] {}", list.id, list.name);
            }
            for bookmark in &app.library().bookmarks {
                let marker = if bookmark.unread { "*" } else { " " };
                println!("{} {} <{}>", marker, bookmark.name, bookmark.url);
            }
        }
        Route::CreateBookmark => {
            if let Some(url) = outcome.location.query_value("save") {
                let created = app.create_bookmark(&NewBookmark::new(url, url)).await?;
                println!("Saved bookmark {} <{}>", created.id, created.url);
            }
        }
        Route::Confirm => {
            let email = app.auth().user_data.as_ref().map_or("?", |u| u.email.as_str());
            println!("Account for {email} is not confirmed yet");
        }
        other => println!("Nothing to do at {:?}", other),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let target = std::env::args().nth(1).unwrap_or_else(|| "/app/".to_string());
    let mut app = Bookmarker::from_env().await?;

    if let Err(e) = run(&mut app, target).await {
        let e = e.log();
        if let Some(message) = e.user_message() {
            eprintln!("{message}");
        }
        return Err(e.into());
    }
    Ok(())
}
