use {
    crate::state::AppState,
    actix_web::{
        body::MessageBody,
        dev::ServiceResponse,
        http::{
            header::{HeaderValue, CONTENT_TYPE},
            StatusCode,
        },
        middleware::{ErrorHandlerResponse, ErrorHandlers},
        web, HttpResponse, ResponseError, Result,
    },
    derive_more::Display,
    log::error,
    serde_json::{json, Error as JsonError},
    std::io::Error as IoError,
    tinytemplate::error::Error as TemplateError,
};

static NOT_FOUND_MESSAGE: &str = "Sorry, that page doesn't exist.";
static SERVER_ERROR_MESSAGE: &str = "Something went wrong on our end, please try again later.";

#[derive(Debug, Display)]
pub enum Error {
    #[display(fmt = "Error with io: {}", _0)]
    Io(IoError),
    #[display(fmt = "Error with json: {}", _0)]
    Json(JsonError),
    #[display(fmt = "Error with template: {}", _0)]
    Template(TemplateError),
}

impl std::error::Error for Error {}

impl From<IoError> for Error {
    fn from(error: IoError) -> Self {
        Self::Io(error)
    }
}

impl From<JsonError> for Error {
    fn from(error: JsonError) -> Self {
        Self::Json(error)
    }
}

impl From<TemplateError> for Error {
    fn from(error: TemplateError) -> Self {
        Self::Template(error)
    }
}

impl From<Error> for IoError {
    fn from(error: Error) -> Self {
        match error {
            Error::Io(error) => error,
            other => IoError::new(std::io::ErrorKind::Other, other.to_string()),
        }
    }
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        error!("{}", self);
        HttpResponse::InternalServerError().finish()
    }
}

/// Replace bare 404 and 500 responses with the rendered error page
pub fn error_handlers<B: MessageBody + 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, not_found)
        .handler(StatusCode::INTERNAL_SERVER_ERROR, internal_error)
}

fn not_found<B: MessageBody + 'static>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    Ok(ErrorHandlerResponse::Response(error_page(res, NOT_FOUND_MESSAGE)))
}

fn internal_error<B: MessageBody + 'static>(
    res: ServiceResponse<B>,
) -> Result<ErrorHandlerResponse<B>> {
    Ok(ErrorHandlerResponse::Response(error_page(res, SERVER_ERROR_MESSAGE)))
}

fn error_page<B: MessageBody + 'static>(
    res: ServiceResponse<B>,
    message: &str,
) -> ServiceResponse<actix_web::body::EitherBody<B>> {
    let body = res
        .request()
        .app_data::<web::Data<AppState<'static>>>()
        .and_then(|state| {
            state
                .tt
                .render("error.html", &json!({ "error": message }))
                .map_err(|e| error!("Could not render error page: {}", e))
                .ok()
        });
    match body {
        Some(body) => {
            let (req, res) = res.into_parts();
            let mut res = res.set_body(body);
            res.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));
            ServiceResponse::new(req, res)
                .map_into_boxed_body()
                .map_into_right_body()
        }
        None => res.map_into_left_body(),
    }
}
