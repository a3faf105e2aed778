use crate::http::{AUTHORS_PATH, AppState};
use crate::models::{
    Author, AuthorId, AuthorIdError, AuthorName, BirthDate, CreateAuthorError, CreateAuthorRequest,
    DeleteAuthorError, DeleteAuthorRequest, FindAuthorError, FindAuthorRequest, Nationality,
    SearchAuthorsError, SearchAuthorsRequest, UpdateAuthorError, UpdateAuthorRequest,
};
use crate::repositories::AuthorRepository;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<T>);

impl<T: Serialize> ApiSuccess<T> {
    pub const fn new(status: StatusCode, data: T) -> Self {
        Self(status, Json(data))
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> axum::response::Response {
        (self.0, self.1).into_response()
    }
}

/// Body of every non-404 error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    status: u16,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl ErrorResponse {
    fn new(status: StatusCode, message: String, errors: Vec<FieldError>) -> Self {
        Self {
            status: status.as_u16(),
            message,
            errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    field: &'static str,
    message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    Conflict(String),
    UnprocessableEntity(Vec<FieldError>),
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, errors) = match self {
            Self::NotFound => return StatusCode::NOT_FOUND.into_response(),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            Self::UnprocessableEntity(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                errors,
            ),
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, Vec::new()),
        };
        (status, Json(ErrorResponse::new(status, message, errors))).into_response()
    }
}

impl ApiError {
    fn internal(cause: &anyhow::Error) -> Self {
        tracing::error!(error = ?cause, "Request failed");
        Self::InternalServerError("Internal server error".to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<AuthorIdError> for ApiError {
    fn from(err: AuthorIdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ParseAuthorHttpRequestError> for ApiError {
    fn from(err: ParseAuthorHttpRequestError) -> Self {
        Self::UnprocessableEntity(err.0)
    }
}

impl From<CreateAuthorError> for ApiError {
    fn from(err: CreateAuthorError) -> Self {
        let message = err.to_string();
        match err {
            CreateAuthorError::Duplicate { .. } => Self::Conflict(message),
            CreateAuthorError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<FindAuthorError> for ApiError {
    fn from(err: FindAuthorError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<SearchAuthorsError> for ApiError {
    fn from(err: SearchAuthorsError) -> Self {
        Self::internal(&err.0)
    }
}

impl From<UpdateAuthorError> for ApiError {
    fn from(err: UpdateAuthorError) -> Self {
        let message = err.to_string();
        match err {
            UpdateAuthorError::NotFound { .. } => Self::NotFound,
            UpdateAuthorError::Duplicate { .. } => Self::Conflict(message),
            UpdateAuthorError::Other(cause) => Self::internal(&cause),
        }
    }
}

impl From<DeleteAuthorError> for ApiError {
    fn from(err: DeleteAuthorError) -> Self {
        match err {
            DeleteAuthorError::NotFound { .. } => Self::NotFound,
            DeleteAuthorError::Other(cause) => Self::internal(&cause),
        }
    }
}

/// Request body of create and update. Legacy Portuguese field names are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorHttpRequest {
    #[serde(alias = "nome")]
    name: Option<String>,
    #[serde(alias = "dataNascimento")]
    birth_date: Option<String>,
    #[serde(alias = "nacionalidade")]
    nationality: Option<String>,
}

#[derive(Error, Debug)]
#[error("Validation failed")]
pub struct ParseAuthorHttpRequestError(Vec<FieldError>);

impl AuthorHttpRequest {
    /// Validates every field, reporting all failures at once.
    fn parse(
        self,
        today: NaiveDate,
    ) -> Result<(AuthorName, BirthDate, Nationality), ParseAuthorHttpRequestError> {
        let mut errors = Vec::new();

        let name = required(
            "name",
            self.name.as_deref().map(AuthorName::new),
            &mut errors,
        );
        let birth_date = required(
            "birthDate",
            self.birth_date.as_deref().map(|raw| BirthDate::parse(raw, today)),
            &mut errors,
        );
        let nationality = required(
            "nationality",
            self.nationality.as_deref().map(Nationality::new),
            &mut errors,
        );

        match (name, birth_date, nationality) {
            (Some(name), Some(birth_date), Some(nationality)) => {
                Ok((name, birth_date, nationality))
            }
            _ => Err(ParseAuthorHttpRequestError(errors)),
        }
    }
}

fn required<T, E: std::fmt::Display>(
    field: &'static str,
    value: Option<Result<T, E>>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    match value {
        Some(Ok(value)) => Some(value),
        Some(Err(err)) => {
            errors.push(FieldError::new(field, err.to_string()));
            None
        }
        None => {
            errors.push(FieldError::new(field, format!("{field} is required")));
            None
        }
    }
}

impl TryFrom<AuthorHttpRequest> for CreateAuthorRequest {
    type Error = ParseAuthorHttpRequestError;

    fn try_from(value: AuthorHttpRequest) -> Result<Self, Self::Error> {
        let (name, birth_date, nationality) = value.parse(Utc::now().date_naive())?;
        Ok(Self::new(name, birth_date, nationality))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorHttpResponse {
    id: Uuid,
    name: String,
    birth_date: NaiveDate,
    nationality: String,
}

impl From<Author> for AuthorHttpResponse {
    fn from(value: Author) -> Self {
        Self {
            id: value.id().as_uuid(),
            name: value.name().to_string(),
            birth_date: value.birth_date().as_date(),
            nationality: value.nationality().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchAuthorsHttpQuery {
    #[serde(rename = "nome")]
    name: Option<String>,
    #[serde(rename = "nacionalidade")]
    nationality: Option<String>,
}

impl From<SearchAuthorsHttpQuery> for SearchAuthorsRequest {
    fn from(value: SearchAuthorsHttpQuery) -> Self {
        Self::new(value.name, value.nationality)
    }
}

pub async fn create_author<AR: AuthorRepository>(
    State(state): State<AppState<AR>>,
    body: Result<Json<AuthorHttpRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let req = CreateAuthorRequest::try_from(body)?;
    let author = state.author_repo.create_author(&req).await?;

    tracing::info!(id = %author.id(), "Author created");
    let location = format!("{AUTHORS_PATH}/{}", author.id());
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

pub async fn find_author<AR: AuthorRepository>(
    State(state): State<AppState<AR>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<ApiSuccess<AuthorHttpResponse>, ApiError> {
    let Path(id) = path?;
    let id: AuthorId = id.parse()?;
    state
        .author_repo
        .find_author(&FindAuthorRequest::new(id))
        .await?
        .map(|author| ApiSuccess::new(StatusCode::OK, author.into()))
        .ok_or(ApiError::NotFound)
}

pub async fn delete_author<AR: AuthorRepository>(
    State(state): State<AppState<AR>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let id: AuthorId = id.parse()?;
    state
        .author_repo
        .delete_author(&DeleteAuthorRequest::new(id))
        .await?;

    tracing::info!(%id, "Author deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search_authors<AR: AuthorRepository>(
    State(state): State<AppState<AR>>,
    query: Result<Query<SearchAuthorsHttpQuery>, QueryRejection>,
) -> Result<ApiSuccess<Vec<AuthorHttpResponse>>, ApiError> {
    let Query(query) = query?;
    let req = SearchAuthorsRequest::from(query);
    let authors = state.author_repo.search_authors(&req).await?;
    Ok(ApiSuccess::new(
        StatusCode::OK,
        authors.into_iter().map(AuthorHttpResponse::from).collect(),
    ))
}

pub async fn update_author<AR: AuthorRepository>(
    State(state): State<AppState<AR>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<AuthorHttpRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = path?;
    let id: AuthorId = id.parse()?;
    let Json(body) = body?;
    let (name, birth_date, nationality) = body.parse(Utc::now().date_naive())?;
    let req = UpdateAuthorRequest::new(id, name, birth_date, nationality);
    state.author_repo.update_author(&req).await?;

    tracing::info!(%id, "Author updated");
    Ok(StatusCode::NO_CONTENT)
}
