use {
    crate::{
        content::SiteContent,
        countdown::{CountdownClock, TimeRemaining, TICK},
        error::{error_handlers, Error},
        model::{Meal, RsvpParams},
        rsvp::{RsvpFlow, SubmitError},
        state::AppState,
    },
    actix_web::{
        http::header::CACHE_CONTROL,
        web::{self, Bytes},
        Error as ActixError, HttpResponse, Result,
    },
    chrono::Utc,
    futures_util::{stream, Stream},
    log::info,
    serde_json::{json, Value},
    std::convert::Infallible,
};

static TRANSPORT_ERROR_MESSAGE: &str =
    "There was an error submitting your RSVP. Please try again.";

pub fn app_config(config: &mut web::ServiceConfig) {
    config.service(
        web::scope("")
            .service(web::resource("/").route(web::get().to(index)))
            .service(
                web::resource("/rsvp")
                    .route(web::get().to(index))
                    .route(web::post().to(handle_rsvp)),
            )
            .service(web::resource("/rsvp/new").route(web::get().to(index)))
            .service(web::resource("/countdown").route(web::get().to(countdown)))
            .service(web::resource("/countdown/stream").route(web::get().to(countdown_stream)))
            .default_service(web::to(|| async { HttpResponse::NotFound().finish() }))
            .wrap(error_handlers()),
    );
}

fn meal_options(menu: &[Meal], form: &RsvpParams) -> Vec<Value> {
    menu.iter()
        .map(|meal| {
            json!({
                "slug": meal.slug(),
                "label": meal.label(),
                "selected": form.meal_selection == Some(*meal),
                "plus_one_selected": form.plus_one_meal_selection == Some(*meal),
            })
        })
        .collect()
}

/// Everything `index.html` needs, with the form showing `form` and `error`
fn page_context(content: &SiteContent, form: &RsvpParams, error: Option<&SubmitError>) -> Value {
    let (message, field) = match error {
        Some(SubmitError::Validation(error)) => (error.to_string(), error.field()),
        Some(SubmitError::Transport(_)) => (TRANSPORT_ERROR_MESSAGE.to_string(), ""),
        Some(other) => (other.to_string(), ""),
        None => (String::new(), ""),
    };
    json!({
        "content": content,
        "first": content.couple[0],
        "second": content.couple[1],
        "countdown": TimeRemaining::until(content.wedding_date),
        "form": {
            "name": form.name,
            "email": form.email,
            "phone": form.phone,
            "attending": form.is_attending(),
            "declining": !form.is_attending(),
            "plus_one_requested": form.plus_one_requested,
            "plus_one_name": form.plus_one_name,
            "dietary_restrictions": form.dietary_restrictions,
            "message": form.message,
        },
        "meals": meal_options(&content.menu, form),
        "has_error": error.is_some(),
        "error": message,
        "field_errors": {
            "name": field == "name",
            "email": field == "email",
            "attendance": field == "attendance",
            "meal_selection": field == "meal_selection",
            "plus_one_name": field == "plus_one_name",
            "plus_one_meal_selection": field == "plus_one_meal_selection",
        },
    })
}

fn render_index(state: &AppState<'_>, flow: &RsvpFlow) -> Result<HttpResponse> {
    let ctx = page_context(&state.content, flow.form(), flow.error());
    let body = state.tt.render("index.html", &ctx).map_err(Error::from)?;
    Ok(HttpResponse::Ok().content_type("text/html").body(body))
}

/// Return the main page with a fresh RSVP form.
///
/// Also serves `/rsvp/new`: every request starts its own flow, so
/// submitting another RSVP is simply a new default form.
async fn index(state: web::Data<AppState<'static>>) -> Result<HttpResponse> {
    render_index(&state, &RsvpFlow::default())
}

/// Current countdown as JSON
async fn countdown(state: web::Data<AppState<'static>>) -> HttpResponse {
    HttpResponse::Ok().json(TimeRemaining::until(state.content.wedding_date))
}

/// Server-sent events, one per tick, for as long as the client listens
async fn countdown_stream(state: web::Data<AppState<'static>>) -> HttpResponse {
    let clock = CountdownClock::start(state.content.wedding_date, TICK);
    HttpResponse::Ok()
        .insert_header((CACHE_CONTROL, "no-cache"))
        .content_type("text/event-stream")
        .streaming(Box::pin(countdown_events(clock)))
}

/// The stream owns the clock, so the timer stops when the client goes away
pub fn countdown_events(clock: CountdownClock) -> impl Stream<Item = Result<Bytes, Infallible>> {
    stream::unfold(clock, |mut clock| async move {
        let remaining = clock.next_tick().await?;
        let data = serde_json::to_string(&remaining).ok()?;
        Some((Ok(Bytes::from(format!("data: {}\n\n", data))), clock))
    })
}

/// Validate an RSVP and forward it to the spreadsheet
async fn handle_rsvp(
    state: web::Data<AppState<'static>>,
    params: web::Form<RsvpParams>,
) -> Result<HttpResponse, ActixError> {
    let mut flow = RsvpFlow::new(params.into_inner());
    info!("New RSVP! {:?}", flow.form());
    if flow.submit(&*state.submitter, Utc::now()).await.is_ok() {
        let form = flow.form();
        let ctx = json!({
            "name": form.name.trim(),
            "email": form.email.trim(),
            "attending": form.is_attending(),
            "first": state.content.couple[0],
            "second": state.content.couple[1],
            "registry_url": state.content.registry_url,
        });
        let body = state.tt.render("confirm.html", &ctx).map_err(Error::from)?;
        Ok(HttpResponse::Ok().content_type("text/html").body(body))
    } else {
        render_index(&state, &flow)
    }
}
